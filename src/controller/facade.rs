use std::sync::Arc;

use hass::{Callback, Calls};

use crate::action::Gesture;
use crate::config::CardConfig;
use crate::controller::*;
use crate::event::PanelEvent;

/// This facade hides the specific controllers behind one interface
/// that can react to host events.
#[derive(Clone)]
pub struct Controller {
    states: StateController,
    display: DisplayController,
    editor: EditorController,
}

impl Controller {
    pub async fn init(host: Arc<dyn Calls>) -> Controller {
        // Controllers are up-casted to Live* traits, so that panels
        // can read cached data without write access. This facade
        // retains write access to update controller state when
        // receiving host events.

        let init_states = host.states().await;
        let states = StateController::init(init_states);
        let live_states = Arc::new(states.clone()) as Arc<dyn LiveStates>;

        let display = DisplayController::init(&host, &live_states);
        let editor = EditorController::init(&host, &live_states);

        Controller {
            states,
            display,
            editor,
        }
    }

    /// Host callbacks are converted to panel events with the help of
    /// one or more controllers.
    pub async fn on_host_event(&self, event: Callback) {
        log::debug!("{:?}", &event);
        match event {
            Callback::StateChanged {
                entity_id,
                new_state,
            } => {
                let first_seen = self.states.set(new_state).await;
                let ev = PanelEvent::NewSnapshot {
                    entity_id: &entity_id,
                    first_seen,
                };
                self.on_panel_event(ev).await;
            }

            Callback::CardConfigured { card, config } => match CardConfig::from_value(config) {
                Ok(config) => {
                    self.display.set_config(&card, config).await;
                    let ev = PanelEvent::NewCardConfig { card: &card };
                    self.on_panel_event(ev).await;
                }
                Err(err) => {
                    // Surfacing this is the host error boundary's job.
                    log::warn!("rejected configuration for card {}: {}", card, err);
                }
            },

            Callback::EditorOpened { card, config } => match CardConfig::from_value(config) {
                Ok(config) => {
                    self.editor.set_config(&card, config).await;
                    let ev = PanelEvent::EditorOpened { card: &card };
                    self.on_panel_event(ev).await;
                }
                Err(err) => {
                    log::warn!("rejected configuration for editor {}: {}", card, err);
                }
            },

            Callback::EditorInput { card, field, value } => {
                let ev = PanelEvent::EditorChange {
                    card: &card,
                    field: &field,
                    value: &value,
                };
                self.on_panel_event(ev).await;
            }

            Callback::CardAction { card, gesture } => {
                let ev = PanelEvent::IssuedGesture {
                    card: &card,
                    gesture: Gesture::from_name(&gesture),
                };
                self.on_panel_event(ev).await;
            }

            Callback::CardRemoved { card } => {
                let ev = PanelEvent::CardGone { card: &card };
                self.on_panel_event(ev).await;
            }
        }
    }

    async fn on_panel_event(&self, event: PanelEvent<'_>) {
        log::debug!("{:?}", &event);
        match event {
            PanelEvent::NewSnapshot {
                entity_id,
                first_seen,
            } => {
                self.display.refresh_entity(entity_id).await;
                if first_seen {
                    self.editor.refresh_all().await;
                }
            }

            PanelEvent::NewCardConfig { card } => {
                self.display.refresh_card(card).await;
            }

            PanelEvent::EditorOpened { card } => {
                self.editor.refresh_card(card).await;
            }

            PanelEvent::EditorChange { card, field, value } => {
                if self.editor.apply_change(card, field, value).await {
                    self.editor.refresh_card(card).await;
                }
            }

            PanelEvent::IssuedGesture { card, gesture } => {
                self.display.issue_gesture(card, gesture).await;
            }

            PanelEvent::CardGone { card } => {
                self.display.remove_card(card).await;
                self.editor.remove_card(card).await;
            }
        }
    }
}
