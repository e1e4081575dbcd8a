use serde::Serialize;

use crate::widget::Widget;

/// The configuration form of one card instance.
///
/// # Sending
/// - Send this widget when the host opens the configuration dialog,
///   and again after every applied form change.
/// - Rendering is deferred until the host's form toolkit handle is
///   available; the hidden widget is sent in the meantime.
#[derive(Serialize, Debug)]
pub struct EditorWidget<'a> {
    /// The station sensors offered by the entity picker.
    pub entities: Vec<&'a str>,

    /// The currently selected entity, or empty.
    pub entity: &'a str,

    /// The current name override, or empty.
    pub name: &'a str,

    /// One labelled switch per visibility flag.
    pub toggles: Vec<ToggleField>,
}

impl Widget for EditorWidget<'_> {
    const FILE: &'static str = "editor.j2";
    const ID: &'static str = "railcard-editor";
}

/// A labelled on/off switch bound to one configuration key.
#[derive(Serialize, Debug)]
pub struct ToggleField {
    /// The configuration key the switch binds to, f.e. "show_status".
    pub key: &'static str,

    /// The switch label, stating whether activating it turns the
    /// feature on or off.
    pub label: String,

    /// The switch position: the flag's value, defaulting to shown.
    pub checked: bool,
}
