use serde::Deserialize;
use serde_json::Value;

use crate::api::EntityState;

/// Events pushed by the dashboard host.
///
/// Cards never poll: every update arrives through one of these
/// variants, and a card re-renders in response.
#[derive(Deserialize, Debug)]
#[serde(tag = "event_type", content = "data", rename_all = "snake_case")]
pub enum Callback {
    /// Sent whenever an entity in the host state store is replaced
    /// with a new snapshot. Also sent once per entity right after
    /// subscribing.
    StateChanged {
        entity_id: String,
        new_state: EntityState,
    },

    /// Sent when the host pushes a saved configuration into a card
    /// instance: on dashboard load, and whenever the configuration
    /// was edited.
    ///
    /// The configuration is kept opaque here; cards parse it into
    /// their own record type.
    CardConfigured { card: String, config: Value },

    /// Sent when the host opens the configuration dialog for a card
    /// instance, carrying the currently saved configuration.
    EditorOpened { card: String, config: Value },

    /// Sent when the user changes a form control in rendered editor
    /// markup. `field` is the control's declared config key; `value`
    /// is a string for text/select controls and a boolean for
    /// switches.
    EditorInput {
        card: String,
        field: String,
        value: Value,
    },

    /// Sent when the user performs a gesture on rendered card markup,
    /// f.e. "tap", "hold" or "double_tap".
    CardAction { card: String, gesture: String },

    /// Sent when a card instance is removed from a dashboard.
    CardRemoved { card: String },
}
