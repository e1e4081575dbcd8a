use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Controller config.
#[derive(Deserialize)]
pub struct Config {
    /// The address of the dashboard host's card-API port,
    /// f.e. "127.0.0.1:8123".
    pub host_address: String,

    /// A long-lived access token, created in the host's user profile.
    pub access_token: String,
}

impl Config {
    /// Read the config file listed in the `RAILCARD_CONFIG` environment variable.
    ///
    /// # Panics
    /// - when `RAILCARD_CONFIG` is not set
    /// - when `RAILCARD_CONFIG` does not point to a valid TOML config
    /// - when an assertion on one or more values fails
    pub fn read_from_env() -> Config {
        const CONFIG_ENV_VAR: &str = "RAILCARD_CONFIG";

        fn parse_file(f: PathBuf) -> anyhow::Result<Config> {
            let f_str = std::fs::read_to_string(f)?;
            let config: Config = toml::from_str(&f_str)?;
            Ok(config)
        }

        let env_file = match std::env::var(CONFIG_ENV_VAR) {
            Ok(f) => Some(PathBuf::from(f)).filter(|p| p.is_file()),
            Err(_) => None,
        };

        if let Some(f) = env_file {
            let cfg = parse_file(f).expect("failed to parse config file");
            check_config(&cfg);
            return cfg;
        }

        panic!("cannot locate config: use the '{}' env var", CONFIG_ENV_VAR)
    }
}

/// Try to catch configuration errors early.
fn check_config(config: &Config) {
    assert!(
        !config.host_address.is_empty(),
        "config: 'host_address' must not be empty!"
    );
    assert!(
        !config.access_token.is_empty(),
        "config: 'access_token' must not be empty!"
    );
}

/// Failure modes of a card configuration pushed by the host. The
/// host's card-error boundary is expected to surface these.
#[derive(Error, Debug)]
pub enum CardError {
    /// The pushed configuration does not match the card's record.
    #[error("Invalid configuration")]
    InvalidConfiguration(#[from] serde_json::Error),
}

/// The saved configuration of one card instance.
///
/// Every field is optional: absent visibility flags mean "shown", and
/// clearing a field in the editor removes its key instead of storing
/// an empty value. The record is replaced wholesale on every change,
/// never mutated in place.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CardConfig {
    /// The card type key, f.e. "custom:railcard". Stored by the host;
    /// carried along so that emitted configurations stay complete.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    /// The station sensor backing the panel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    /// Overrides the header title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Show the station message, if the sensor carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_warning: Option<bool>,

    /// Reserved error display; the panel does not currently render it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_error: Option<bool>,

    /// Show the service's alternate destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_via_destination: Option<bool>,

    /// Show the ordered list of calling points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_callingpoints: Option<bool>,

    /// Show the status badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_status: Option<bool>,

    /// Show the "Arrives" column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_arrival_time: Option<bool>,

    /// Show the "Departs" column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_departure_time: Option<bool>,

    /// Opaque gesture action, resolved by the host. Its presence arms
    /// the tap gesture in rendered markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap_action: Option<Value>,

    /// See `tap_action`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_action: Option<Value>,

    /// See `tap_action`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_tap_action: Option<Value>,

    /// Debug flag: ask the host to enter edit mode at configuration
    /// time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_gui: Option<bool>,
}

impl CardConfig {
    /// Parse a configuration pushed by the host.
    pub fn from_value(value: Value) -> Result<CardConfig, CardError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The full configuration as it is dispatched back to the host.
    /// Cleared keys are absent from the result.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("failed to serialize card config")
    }

    pub fn shows_warning(&self) -> bool {
        self.show_warning.unwrap_or(true)
    }

    pub fn shows_error(&self) -> bool {
        self.show_error.unwrap_or(true)
    }

    pub fn shows_via_destination(&self) -> bool {
        self.show_via_destination.unwrap_or(true)
    }

    pub fn shows_calling_points(&self) -> bool {
        self.show_callingpoints.unwrap_or(true)
    }

    pub fn shows_status(&self) -> bool {
        self.show_status.unwrap_or(true)
    }

    pub fn shows_arrival_time(&self) -> bool {
        self.show_arrival_time.unwrap_or(true)
    }

    pub fn shows_departure_time(&self) -> bool {
        self.show_departure_time.unwrap_or(true)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_absent_flags_mean_shown() {
        let config = CardConfig::default();
        assert!(config.shows_warning());
        assert!(config.shows_error());
        assert!(config.shows_via_destination());
        assert!(config.shows_calling_points());
        assert!(config.shows_status());
        assert!(config.shows_arrival_time());
        assert!(config.shows_departure_time());
    }

    #[test]
    fn test_parse_config() {
        let config = CardConfig::from_value(json!({
            "type": "custom:railcard",
            "entity": "sensor.national_rail_ashford",
            "show_status": false,
        }))
        .unwrap();
        assert_eq!(
            Some("sensor.national_rail_ashford"),
            config.entity.as_deref()
        );
        assert!(!config.shows_status());
        assert!(config.shows_warning());
    }

    #[test]
    fn test_rejects_malformed_config() {
        let res = CardConfig::from_value(json!({ "entity": 7 }));
        assert!(res.is_err());
        assert_eq!(
            "Invalid configuration",
            res.unwrap_err().to_string()
        );
    }

    #[test]
    fn test_cleared_keys_are_absent() {
        let mut config = CardConfig {
            entity: Some("sensor.national_rail_ashford".to_string()),
            name: Some("Ashford".to_string()),
            ..Default::default()
        };
        config.name = None;

        let value = config.to_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(vec!["entity"], keys);
    }
}
