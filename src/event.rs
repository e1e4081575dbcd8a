use serde_json::Value;

use crate::action::Gesture;

/// This data type is introduced to complement host `Callback`s,
/// and to make it easier to understand the panel flow.
/// Every variant leads to at most one re-render of the affected
/// panels.
#[derive(Debug)]
pub enum PanelEvent<'a> {
    /// Signals that the host replaced an entity's state snapshot.
    /// Panels displaying this entity re-derive all presentation facts.
    NewSnapshot {
        entity_id: &'a str,

        /// Set when the entity was not in the store before. New
        /// sensors change the editor's entity picker, so open editors
        /// are re-rendered.
        first_seen: bool,
    },

    /// Signals that the host pushed a saved configuration into a
    /// display panel, either on dashboard load or after an edit.
    NewCardConfig { card: &'a str },

    /// Signals that the configuration dialog of a card instance was
    /// opened.
    EditorOpened { card: &'a str },

    /// Signals a form control change in an open configuration dialog.
    EditorChange {
        card: &'a str,
        field: &'a str,
        value: &'a Value,
    },

    /// Signals a user gesture on a rendered panel.
    IssuedGesture { card: &'a str, gesture: Gesture },

    /// Signals that a card instance was removed from its dashboard.
    CardGone { card: &'a str },
}
