use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use futures::future::join_all;
use tokio::sync::RwLock;

use hass::{Calls, EntityState};

use crate::action::Gesture;
use crate::board;
use crate::config::CardConfig;
use crate::constants::{FALLBACK_TITLE, NO_ENTITY_LABEL};
use crate::controller::{check_send_res, LiveStates};
use crate::widget::*;

/// This controller tracks the configuration of every display-panel
/// instance, and builds & sends their widgets whenever configuration
/// or sensor state changes.
#[derive(Clone)]
pub struct DisplayController {
    configs: Arc<RwLock<HashMap<String, CardConfig>>>,
    host: Arc<dyn Calls>,
    live_states: Arc<dyn LiveStates>,
}

impl DisplayController {
    pub fn init(host: &Arc<dyn Calls>, live_states: &Arc<dyn LiveStates>) -> Self {
        DisplayController {
            configs: Arc::new(RwLock::new(HashMap::new())),
            host: host.clone(),
            live_states: live_states.clone(),
        }
    }

    /// Replace a panel's configuration wholesale.
    pub async fn set_config(&self, card: &str, config: CardConfig) {
        if config.test_gui == Some(true) {
            self.host.set_edit_mode(true).await;
        }

        let mut configs = self.configs.write().await;
        configs.insert(card.to_string(), config);
    }

    /// Drop a removed panel's configuration.
    pub async fn remove_card(&self, card: &str) {
        let mut configs = self.configs.write().await;
        configs.remove(card);
    }

    /// Re-render one panel.
    pub async fn refresh_card(&self, card: &str) {
        self.show_for(card).await;
    }

    /// Re-render every panel that displays the given entity.
    pub async fn refresh_entity(&self, entity_id: &str) {
        let cards: Vec<String> = {
            let configs = self.configs.read().await;
            configs
                .iter()
                .filter(|(_, config)| config.entity.as_deref() == Some(entity_id))
                .map(|(card, _)| card.clone())
                .collect()
        };

        join_all(cards.iter().map(|card| self.show_for(card))).await;
    }

    /// Forward a gesture to the host's action handler, together with
    /// the panel's configuration. Gestures on unconfigured panels are
    /// dropped.
    pub async fn issue_gesture(&self, card: &str, gesture: Gesture) {
        let config = {
            let configs = self.configs.read().await;
            match configs.get(card) {
                Some(config) => config.to_value(),
                None => return,
            }
        };
        self.host
            .dispatch_action(card, gesture.as_str(), &config)
            .await;
    }

    async fn show_for(&self, card: &str) {
        let configs = self.configs.read().await;
        let config = match configs.get(card) {
            // Not configured yet; the panel declines to render.
            Some(config) => config,
            None => return,
        };

        let entity = match &config.entity {
            Some(entity_id) => self.live_states.entity(entity_id).await,
            None => None,
        };

        let markup = assemble(config, entity.as_ref()).render();
        let res = self.host.render_card(card, &markup).await;
        check_send_res(res);
    }
}

/// Build the display widget for one panel: a pure derivation of
/// presentation facts from the configuration and the latest snapshot.
///
/// A missing entity yields the bare card shell.
pub fn assemble<'a>(
    config: &'a CardConfig,
    entity: Option<&'a EntityState>,
) -> DeparturesWidget<'a> {
    let title = config
        .name
        .as_deref()
        .or_else(|| entity.and_then(|e| e.attributes.friendly_name.as_deref()))
        .unwrap_or(FALLBACK_TITLE);

    let label = format!(
        "{}: {}",
        FALLBACK_TITLE,
        config.entity.as_deref().unwrap_or(NO_ENTITY_LABEL)
    );

    let has_hold = config.hold_action.is_some();
    let has_double_tap = config.double_tap_action.is_some();

    let entity = match entity {
        Some(entity) => entity,
        None => {
            return DeparturesWidget {
                title,
                label,
                via_destination: None,
                message: None,
                status: None,
                times: None,
                calling_points: None,
                last_updated: None,
                has_hold,
                has_double_tap,
            };
        }
    };
    let snapshot = &entity.attributes;

    let cancelled = board::is_cancelled(snapshot);
    let delayed = snapshot
        .service
        .as_ref()
        .map(board::is_delayed)
        .unwrap_or(false);

    let via_destination = if config.shows_via_destination() {
        snapshot.service.as_ref().and_then(board::destination_via)
    } else {
        None
    };

    let message = if config.shows_warning() {
        board::station_message(snapshot)
    } else {
        None
    };

    let status = if config.shows_status() {
        Some(StatusBadge {
            severity: board::severity(snapshot),
            scheduled: if delayed {
                snapshot
                    .service
                    .as_ref()
                    .and_then(|s| s.std.as_deref())
                    .map(board::format_time)
            } else {
                None
            },
            text: if delayed {
                None
            } else {
                snapshot.service.as_ref().and_then(|s| s.etd.as_deref())
            },
        })
    } else {
        None
    };

    let times = if cancelled {
        None
    } else {
        let departure = if config.shows_departure_time() {
            Some(TimeColumn {
                time: board::departure_time(snapshot),
            })
        } else {
            None
        };
        let arrival = if config.shows_arrival_time() {
            Some(TimeColumn {
                time: board::arrival_time(snapshot),
            })
        } else {
            None
        };

        if departure.is_some() || arrival.is_some() {
            Some(ServiceTimes { departure, arrival })
        } else {
            None
        }
    };

    let calling_points = if !cancelled && config.shows_calling_points() {
        snapshot.calling_points.as_ref().map(|stops| {
            stops
                .iter()
                .map(|stop| CallingPointEntry {
                    name: &stop.location_name,
                    time: &stop.st,
                })
                .collect()
        })
    } else {
        None
    };

    let last_updated = Some(
        entity
            .last_updated
            .with_timezone(&Local)
            .format("%c")
            .to_string(),
    );

    DeparturesWidget {
        title,
        label,
        via_destination,
        message,
        status,
        times,
        calling_points,
        last_updated,
        has_hold,
        has_double_tap,
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use serde_json::json;

    use hass::{CallingPoint, StationBoard, TrainService};

    use super::*;

    fn entity(etd: &str, calling_points: Option<Vec<CallingPoint>>) -> EntityState {
        EntityState {
            entity_id: "sensor.national_rail_ashford".to_string(),
            state: "10_00".to_string(),
            attributes: StationBoard {
                station_name: Some("Ashford".to_string()),
                friendly_name: Some("Ashford Departures".to_string()),
                service: Some(TrainService {
                    std: Some("10_00".to_string()),
                    etd: Some(etd.to_string()),
                    destination: None,
                }),
                calling_points,
                message: None,
            },
            last_updated: Utc::now(),
        }
    }

    fn config(entity: &str) -> CardConfig {
        CardConfig {
            entity: Some(entity.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_entity_renders_shell_only() {
        let config = config("sensor.national_rail_ashford");
        let widget = assemble(&config, None);

        assert_eq!(FALLBACK_TITLE, widget.title);
        assert_eq!(
            "National Rail: sensor.national_rail_ashford",
            widget.label
        );
        assert!(widget.status.is_none());
        assert!(widget.times.is_none());
        assert!(widget.calling_points.is_none());
        assert!(widget.last_updated.is_none());
    }

    #[test]
    fn test_title_precedence() {
        let entity = entity("On Time", None);

        let named = CardConfig {
            name: Some("My Station".to_string()),
            ..config("sensor.national_rail_ashford")
        };
        assert_eq!("My Station", assemble(&named, Some(&entity)).title);

        let unnamed = config("sensor.national_rail_ashford");
        assert_eq!(
            "Ashford Departures",
            assemble(&unnamed, Some(&entity)).title
        );

        assert_eq!(FALLBACK_TITLE, assemble(&unnamed, None).title);
    }

    #[test]
    fn test_cancelled_status_is_not_suppressed() {
        // The status reads "Cancelled", but without calling points the
        // board does not count as cancelled: the times block renders
        // with the scheduled departure and an empty arrival.
        let entity = entity("Cancelled", None);
        let config = config("sensor.national_rail_ashford");

        let widget = assemble(&config, Some(&entity));

        let times = widget.times.expect("times should render");
        assert_eq!(
            Some("10:00"),
            times.departure.as_ref().unwrap().time.as_deref()
        );
        assert_eq!(None, times.arrival.as_ref().unwrap().time);

        let status = widget.status.expect("status should render");
        assert_eq!(Some("Cancelled"), status.text);
        assert_eq!(None, status.scheduled);
    }

    #[test]
    fn test_withdrawn_service_suppresses_times() {
        let entity = entity("On Time", None);
        let config = config("sensor.national_rail_ashford");

        let widget = assemble(&config, Some(&entity));

        assert!(widget.times.is_none());
        assert!(widget.calling_points.is_none());
    }

    #[test]
    fn test_delayed_badge_strikes_through_schedule() {
        let entity = entity(
            "10_45",
            Some(vec![CallingPoint {
                location_name: "Tonbridge".to_string(),
                st: "11_05".to_string(),
            }]),
        );
        let config = config("sensor.national_rail_ashford");

        let widget = assemble(&config, Some(&entity));

        let status = widget.status.expect("status should render");
        assert_eq!(Some("10:00".to_string()), status.scheduled);
        assert_eq!(None, status.text);

        let times = widget.times.expect("times should render");
        assert_eq!(
            Some("10:45"),
            times.departure.as_ref().unwrap().time.as_deref()
        );
        assert_eq!(
            Some("11:05"),
            times.arrival.as_ref().unwrap().time.as_deref()
        );
    }

    #[test]
    fn test_visibility_flags_hide_blocks() {
        let entity = entity(
            "On Time",
            Some(vec![CallingPoint {
                location_name: "Tonbridge".to_string(),
                st: "11_05".to_string(),
            }]),
        );
        let config = CardConfig {
            show_status: Some(false),
            show_callingpoints: Some(false),
            show_departure_time: Some(false),
            show_arrival_time: Some(false),
            ..config("sensor.national_rail_ashford")
        };

        let widget = assemble(&config, Some(&entity));

        assert!(widget.status.is_none());
        assert!(widget.times.is_none());
        assert!(widget.calling_points.is_none());
    }

    #[test]
    fn test_gesture_arming_follows_config() {
        let config = CardConfig {
            hold_action: Some(json!({ "action": "more-info" })),
            ..config("sensor.national_rail_ashford")
        };
        let widget = assemble(&config, None);

        assert!(widget.has_hold);
        assert!(!widget.has_double_tap);
    }
}
