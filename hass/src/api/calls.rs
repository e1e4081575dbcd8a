use async_trait::async_trait;
use serde_json::Value;

use crate::api::*;

pub type Result<T> = std::result::Result<T, Fault>;

/// Remote procedure calls on the dashboard host.
///
/// Every call might panic if the connection to the host was
/// interrupted.
#[async_trait]
pub trait Calls: Send + Sync {
    /// Present a long-lived access token to the host.
    ///
    /// This function should be called right after establishing a
    /// connection, to ensure that other calls will work.
    ///
    /// Calls method:
    ///     auth
    async fn authenticate(&self, access_token: &str);

    /// Has to be called in order to receive `Callback`s.
    ///
    /// The host replays the current state of every entity as
    /// `StateChanged` events right after subscribing.
    ///
    /// Calls method:
    ///     subscribe_events
    async fn subscribe_events(&self);

    /// Fetch a snapshot of the host's entire state store.
    ///
    /// Calls method:
    ///     get_states
    async fn states(&self) -> Vec<EntityState>;

    /// Append a card descriptor to the host's card-picker registry.
    ///
    /// Registering the same card type twice is accepted by the host,
    /// which keeps only the first descriptor.
    ///
    /// Calls method:
    ///     register_card
    async fn register_card(&self, descriptor: &CardDescriptor);

    /// Remove all rendered markup of the given card type, for every
    /// card instance on every dashboard.
    ///
    /// This function can be called right after establishing a
    /// connection, to remove leftover renders of a previous controller
    /// run.
    ///
    /// Calls method:
    ///     clear_cards
    async fn clear_cards(&self, card_type: &str);

    /// Request the helper handle of the host's form toolkit.
    ///
    /// Faults until the toolkit has finished loading; editors are
    /// expected to retry on their next configuration push.
    ///
    /// Calls method:
    ///     get_card_helpers
    async fn card_helpers(&self) -> Result<CardHelpers>;

    /// Replace the rendered markup of one card instance.
    ///
    /// Faults with "CardId unknown." when the instance was removed
    /// since the triggering event.
    ///
    /// Calls method:
    ///     render_card
    async fn render_card(&self, card: &str, markup: &str) -> Result<()>;

    /// Replace the rendered markup of one card instance's
    /// configuration dialog.
    ///
    /// Faults with "CardId unknown." when the dialog was closed
    /// since the triggering event.
    ///
    /// Calls method:
    ///     render_editor
    async fn render_editor(&self, card: &str, markup: &str) -> Result<()>;

    /// Forward a user gesture to the host's generic action handler,
    /// together with the card's configuration. The host resolves the
    /// gesture into a navigation or service-call action; cards never
    /// interpret action semantics themselves.
    ///
    /// Calls method:
    ///     dispatch_action
    async fn dispatch_action(&self, card: &str, gesture: &str, config: &Value);

    /// Dispatch a `config-changed` event from a card's editor to its
    /// host container, carrying the full updated configuration.
    ///
    /// Calls method:
    ///     config_changed
    async fn config_changed(&self, card: &str, config: &Value);

    /// Ask the host to enter or leave dashboard edit mode.
    ///
    /// Calls method:
    ///     set_edit_mode
    async fn set_edit_mode(&self, enable: bool);
}
