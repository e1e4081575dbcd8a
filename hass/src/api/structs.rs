use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The state of one entity in the host's state store.
///
/// The host replaces this object wholesale on every sensor update;
/// it is never mutated in place, neither by the host nor by a card.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EntityState {
    /// f.e. "sensor.national_rail_ashford"
    pub entity_id: String,

    /// The raw state value, f.e. the next departure time.
    pub state: String,

    /// The station board snapshot computed by the rail integration.
    pub attributes: StationBoard,

    /// The moment the integration last replaced this state.
    pub last_updated: DateTime<Utc>,
}

/// The attributes of a station sensor: everything the rail integration
/// knows about the next service from the configured station.
///
/// All fields are optional on the wire; sensors of other integrations
/// share the same state store and carry none of them.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StationBoard {
    /// The display name of the departure station, f.e. "Ashford".
    pub station_name: Option<String>,

    /// The friendly name the user gave the sensor, if any.
    pub friendly_name: Option<String>,

    /// Details of the next scheduled service.
    pub service: Option<TrainService>,

    /// The stops the service calls at after departing, in order.
    /// Absent (not empty) when the integration reports none.
    pub calling_points: Option<Vec<CallingPoint>>,

    /// A free-text message about conditions at the station.
    pub message: Option<String>,
}

/// Departure details of a single rail service.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TrainService {
    /// Scheduled time of departure, f.e. "10_45".
    ///
    /// Time strings use an underscore separator on the wire.
    pub std: Option<String>,

    /// Estimated time of departure. Either a time string like `std`,
    /// or a status word such as "On Time" or "Cancelled".
    pub etd: Option<String>,

    /// The destination of the service.
    pub destination: Option<Destination>,
}

/// The destination of a service, as reported by the rail integration.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Destination {
    pub location: Option<DestinationLocation>,
}

/// The location record nested inside a destination.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DestinationLocation {
    /// An alternate destination reached through the service's route,
    /// f.e. "via Maidstone East".
    pub via: Option<String>,
}

/// One intermediate stop on a service's route.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CallingPoint {
    /// The stop's display name, f.e. "Paddock Wood".
    #[serde(rename = "locationName")]
    pub location_name: String,

    /// Scheduled time at this stop, in underscore form, f.e. "11_05".
    pub st: String,
}

/// A static descriptor announced to the host so that its card-picker
/// dialog can offer the card.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CardDescriptor {
    /// The card type key used in saved dashboard configurations.
    #[serde(rename = "type")]
    pub card_type: String,

    /// The display name shown in the picker.
    pub name: String,

    /// The one-line description shown in the picker.
    pub description: String,
}

/// The helper handle the host hands out once its form toolkit is ready.
///
/// Editors defer rendering until they hold one of these.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CardHelpers {
    /// The form element tags the host toolkit has registered,
    /// f.e. "ha-select", "ha-switch".
    pub elements: Vec<String>,
}

/// A failure signalled by the host in response to a call.
#[derive(Deserialize, Debug, Clone)]
pub struct Fault {
    pub code: i32,

    #[serde(rename = "message")]
    pub msg: String,
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "host fault {}: {}", self.code, self.msg)
    }
}
