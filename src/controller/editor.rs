use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use hass::{Calls, CardHelpers};

use crate::config::CardConfig;
use crate::constants::SENSOR_PREFIX;
use crate::controller::{check_send_res, LiveStates};
use crate::widget::{EditorWidget, ToggleField, Widget};

/// One open configuration dialog.
struct EditorSession {
    config: CardConfig,

    /// The host toolkit handle; rendering is deferred until set.
    helpers: Option<CardHelpers>,
}

/// This controller tracks open configuration dialogs, renders their
/// forms, and funnels every form change through a single handler that
/// emits updated configurations back to the host.
///
/// The editor never mutates configuration fields from internal logic;
/// `apply_change` is the sole mutation path.
#[derive(Clone)]
pub struct EditorController {
    sessions: Arc<RwLock<HashMap<String, EditorSession>>>,
    host: Arc<dyn Calls>,
    live_states: Arc<dyn LiveStates>,
}

impl EditorController {
    pub fn init(host: &Arc<dyn Calls>, live_states: &Arc<dyn LiveStates>) -> Self {
        EditorController {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            host: host.clone(),
            live_states: live_states.clone(),
        }
    }

    /// Store the saved configuration of an opened dialog, and request
    /// the toolkit handle if this session does not hold one yet.
    ///
    /// A failed helper request leaves the session unrendered; the next
    /// configuration push retries it.
    pub async fn set_config(&self, card: &str, config: CardConfig) {
        let needs_helpers = {
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(card) {
                Some(session) => {
                    session.config = config;
                    session.helpers.is_none()
                }
                None => {
                    sessions.insert(
                        card.to_string(),
                        EditorSession {
                            config,
                            helpers: None,
                        },
                    );
                    true
                }
            }
        };

        if !needs_helpers {
            return;
        }

        match self.host.card_helpers().await {
            Ok(helpers) => {
                let mut sessions = self.sessions.write().await;
                if let Some(session) = sessions.get_mut(card) {
                    session.helpers = Some(helpers);
                }
            }
            Err(fault) => log::warn!("card helpers not available: {}", fault),
        }
    }

    /// Drop the session of a closed dialog or removed card.
    pub async fn remove_card(&self, card: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(card);
    }

    /// Funnel one form control change into the session's
    /// configuration.
    ///
    /// Returns `false` without emitting anything when the new value
    /// equals the field's current derived value. Clearing a field
    /// removes its key entirely; any other value is stored as the
    /// control's checked-state or raw text. Every applied change
    /// dispatches a `config-changed` event carrying the full updated
    /// configuration.
    pub async fn apply_change(&self, card: &str, field: &str, value: &Value) -> bool {
        if !is_form_field(field) {
            log::debug!("ignoring unknown editor field: {}", field);
            return false;
        }

        let updated = {
            let mut sessions = self.sessions.write().await;
            let session = match sessions.get_mut(card) {
                Some(session) => session,
                None => return false,
            };

            if derived_value(&session.config, field) == *value {
                return false;
            }

            let mut config = session.config.clone();
            if value == &Value::String(String::new()) {
                clear_field(&mut config, field);
            } else {
                set_field(&mut config, field, value);
            }

            session.config = config;
            session.config.to_value()
        };

        self.host.config_changed(card, &updated).await;
        true
    }

    /// Re-render one dialog's form.
    pub async fn refresh_card(&self, card: &str) {
        self.show_for(card).await;
    }

    /// Re-render every open dialog, f.e. after the entity picker's
    /// options changed.
    pub async fn refresh_all(&self) {
        let cards: Vec<String> = {
            let sessions = self.sessions.read().await;
            sessions.keys().cloned().collect()
        };

        for card in cards {
            self.show_for(&card).await;
        }
    }

    async fn show_for(&self, card: &str) {
        let markup = {
            let sessions = self.sessions.read().await;
            let session = match sessions.get(card) {
                Some(session) => session,
                None => return,
            };

            match &session.helpers {
                Some(_helpers) => {
                    let entities = self.live_states.entity_ids(SENSOR_PREFIX).await;
                    assemble_form(&session.config, &entities).render()
                }
                // Toolkit not ready; render an empty result.
                None => EditorWidget::hidden(),
            }
        };

        let res = self.host.render_editor(card, &markup).await;
        check_send_res(res);
    }
}

/// Build the editor form for one dialog.
pub fn assemble_form<'a>(config: &'a CardConfig, entities: &'a [String]) -> EditorWidget<'a> {
    let toggles = vec![
        toggle("show_warning", "station messages", config.shows_warning()),
        toggle("show_error", "error", config.shows_error()),
        toggle(
            "show_via_destination",
            "Via Destination",
            config.shows_via_destination(),
        ),
        toggle("show_status", "Train Status", config.shows_status()),
        toggle(
            "show_arrival_time",
            "Train Arrival Time",
            config.shows_arrival_time(),
        ),
        toggle(
            "show_departure_time",
            "Train Departure Time",
            config.shows_departure_time(),
        ),
        toggle(
            "show_callingpoints",
            "calling points",
            config.shows_calling_points(),
        ),
    ];

    EditorWidget {
        entities: entities.iter().map(String::as_str).collect(),
        entity: config.entity.as_deref().unwrap_or_default(),
        name: config.name.as_deref().unwrap_or_default(),
        toggles,
    }
}

fn toggle(key: &'static str, feature: &str, checked: bool) -> ToggleField {
    ToggleField {
        key,
        label: format!("Toggle {} {}", feature, if checked { "off" } else { "on" }),
        checked,
    }
}

fn is_form_field(field: &str) -> bool {
    matches!(
        field,
        "entity"
            | "name"
            | "show_warning"
            | "show_error"
            | "show_via_destination"
            | "show_callingpoints"
            | "show_status"
            | "show_arrival_time"
            | "show_departure_time"
    )
}

/// The current derived value of a form field: text fields fall back to
/// empty, visibility flags to "shown".
fn derived_value(config: &CardConfig, field: &str) -> Value {
    match field {
        "entity" => Value::String(config.entity.clone().unwrap_or_default()),
        "name" => Value::String(config.name.clone().unwrap_or_default()),
        "show_warning" => Value::Bool(config.shows_warning()),
        "show_error" => Value::Bool(config.shows_error()),
        "show_via_destination" => Value::Bool(config.shows_via_destination()),
        "show_callingpoints" => Value::Bool(config.shows_calling_points()),
        "show_status" => Value::Bool(config.shows_status()),
        "show_arrival_time" => Value::Bool(config.shows_arrival_time()),
        "show_departure_time" => Value::Bool(config.shows_departure_time()),
        _ => Value::Null,
    }
}

fn clear_field(config: &mut CardConfig, field: &str) {
    match field {
        "entity" => config.entity = None,
        "name" => config.name = None,
        "show_warning" => config.show_warning = None,
        "show_error" => config.show_error = None,
        "show_via_destination" => config.show_via_destination = None,
        "show_callingpoints" => config.show_callingpoints = None,
        "show_status" => config.show_status = None,
        "show_arrival_time" => config.show_arrival_time = None,
        "show_departure_time" => config.show_departure_time = None,
        _ => {}
    }
}

fn set_field(config: &mut CardConfig, field: &str, value: &Value) {
    let checked = value.as_bool();
    let text = value.as_str().map(String::from);
    match field {
        "entity" => config.entity = text,
        "name" => config.name = text,
        "show_warning" => config.show_warning = checked,
        "show_error" => config.show_error = checked,
        "show_via_destination" => config.show_via_destination = checked,
        "show_callingpoints" => config.show_callingpoints = checked,
        "show_status" => config.show_status = checked,
        "show_arrival_time" => config.show_arrival_time = checked,
        "show_departure_time" => config.show_departure_time = checked,
        _ => {}
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_toggle_labels_state_the_effect() {
        let shown = toggle("show_status", "Train Status", true);
        assert_eq!("Toggle Train Status off", shown.label);

        let hidden = toggle("show_status", "Train Status", false);
        assert_eq!("Toggle Train Status on", hidden.label);
    }

    #[test]
    fn test_form_lists_entities_in_order() {
        let config = CardConfig {
            entity: Some("sensor.national_rail_ashford".to_string()),
            ..Default::default()
        };
        let entities = vec![
            "sensor.national_rail_ashford".to_string(),
            "sensor.national_rail_tonbridge".to_string(),
        ];

        let form = assemble_form(&config, &entities);

        assert_eq!(
            vec![
                "sensor.national_rail_ashford",
                "sensor.national_rail_tonbridge"
            ],
            form.entities
        );
        assert_eq!("sensor.national_rail_ashford", form.entity);
        assert_eq!("", form.name);
        assert_eq!(7, form.toggles.len());
    }
}
