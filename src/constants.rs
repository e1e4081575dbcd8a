/// Controller version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The card type key stored in saved dashboard configurations, and
/// announced to the host's card picker.
pub const CARD_TYPE: &str = "railcard";

/// The display name offered in the host's card picker.
pub const CARD_NAME: &str = "Rail Departures Card";

/// The description offered in the host's card picker.
pub const CARD_DESCRIPTION: &str =
    "Presents departure details from a configured station sensor of the National Rail integration";

/// The namespace of the rail integration's sensors. The editor's
/// entity picker only offers entities carrying this prefix.
pub const SENSOR_PREFIX: &str = "sensor.national_rail_";

/// Header title used when neither a configured name nor the sensor's
/// friendly name is available.
pub const FALLBACK_TITLE: &str = "National Rail";

/// Accessibility label fragment used when no entity is configured.
pub const NO_ENTITY_LABEL: &str = "No Entity Defined";
