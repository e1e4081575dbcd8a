use serde::Serialize;

use crate::board::Severity;
use crate::widget::{ser, Widget};

/// The display panel of one card instance: a station's next departure,
/// derived from the latest snapshot of the configured sensor.
///
/// # Sending
/// - Send this widget when the host pushes a configuration into a card
///   instance, and again whenever the configured entity's snapshot is
///   replaced.
/// - All fields are derived anew on every render; nothing is cached
///   between snapshots.
/// - When the configured entity is missing from the host state store,
///   only the card shell (title & label) is filled in.
#[derive(Serialize, Debug)]
pub struct DeparturesWidget<'a> {
    /// The header title: the configured name, else the sensor's
    /// friendly name, else a fixed fallback.
    pub title: &'a str,

    /// Accessibility label naming the configured entity.
    pub label: String,

    /// The service's alternate destination, f.e. "via Maidstone East".
    pub via_destination: Option<&'a str>,

    /// The station message, with "this station" already substituted.
    pub message: Option<String>,

    /// The status badge, or `None` when disabled.
    pub status: Option<StatusBadge<'a>>,

    /// The departure/arrival columns, or `None` when the service is
    /// cancelled or both columns are disabled.
    pub times: Option<ServiceTimes>,

    /// The stops the service calls at, in order. `None` when the
    /// service is cancelled or the list is disabled.
    pub calling_points: Option<Vec<CallingPointEntry<'a>>>,

    /// The formatted moment the sensor last updated.
    pub last_updated: Option<String>,

    /// Whether hold gestures are armed in the markup.
    pub has_hold: bool,

    /// Whether double-tap gestures are armed in the markup.
    pub has_double_tap: bool,
}

impl Widget for DeparturesWidget<'_> {
    const FILE: &'static str = "departures.j2";
    const ID: &'static str = "railcard-departures";
}

/// The service status badge.
#[derive(Serialize, Debug)]
pub struct StatusBadge<'a> {
    /// Selects the badge's icon colors and alert type.
    #[serde(serialize_with = "ser::format_severity")]
    pub severity: Severity,

    /// The superseded scheduled time, struck through next to the
    /// estimate. Only set for delayed services.
    pub scheduled: Option<String>,

    /// The raw status text, f.e. "On Time". Only set for services
    /// that are not delayed.
    pub text: Option<&'a str>,
}

/// The departure/arrival block of the panel.
#[derive(Serialize, Debug)]
pub struct ServiceTimes {
    /// The "Departs" column, or `None` when disabled.
    pub departure: Option<TimeColumn>,

    /// The "Arrives" column, or `None` when disabled.
    pub arrival: Option<TimeColumn>,
}

/// One labelled clock time.
#[derive(Serialize, Debug)]
pub struct TimeColumn {
    /// The clock time, or nothing when the board does not provide one.
    pub time: Option<String>,
}

/// One stop in the horizontal calling-points list.
#[derive(Serialize, Debug)]
pub struct CallingPointEntry<'a> {
    /// The stop's display name.
    pub name: &'a str,

    /// The scheduled time at this stop, shown in parentheses in its
    /// raw underscore form.
    pub time: &'a str,
}
