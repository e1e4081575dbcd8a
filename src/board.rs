use chrono::NaiveTime;

use hass::{StationBoard, TrainService};

/// Derived severity of a board, displayed as the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Whether the board's service counts as cancelled: its status is not
/// the literal "Cancelled", and the board carries no calling points.
pub fn is_cancelled(board: &StationBoard) -> bool {
    let status = board.service.as_ref().and_then(|s| s.etd.as_deref());
    status != Some("Cancelled") && board.calling_points.is_none()
}

/// Whether a service is delayed. On-time services report a status word
/// such as "On Time" as their estimate; any digit in the estimate
/// means an updated time.
pub fn is_delayed(service: &TrainService) -> bool {
    service
        .etd
        .as_deref()
        .unwrap_or("")
        .chars()
        .any(|c| c.is_ascii_digit())
}

/// Turn an underscore time into a readable clock time,
/// f.e. "10:45" for "10_45".
pub fn format_time(time: &str) -> String {
    time.replacen('_', ":", 1)
}

/// The elapsed minutes from one clock time to another, both in
/// "HH:MM" form. A `to` earlier than `from` is assumed to fall on the
/// following day.
///
/// # Panics
/// Panics if either string is not a well-formed clock time.
pub fn minutes_between(from: &str, to: &str) -> i64 {
    let from = NaiveTime::parse_from_str(from, "%H:%M").expect("failed to parse clock time");
    let to = NaiveTime::parse_from_str(to, "%H:%M").expect("failed to parse clock time");

    let diff = to.signed_duration_since(from);
    if diff < chrono::Duration::zero() {
        diff.num_minutes() + 24 * 60
    } else {
        diff.num_minutes()
    }
}

/// The departure time to display: the estimate when delayed, the
/// scheduled time otherwise. `None` for cancelled services.
pub fn departure_time(board: &StationBoard) -> Option<String> {
    if is_cancelled(board) {
        return None;
    }

    let service = board.service.as_ref()?;
    let time = if is_delayed(service) {
        service.etd.as_deref()
    } else {
        service.std.as_deref()
    };
    time.map(format_time)
}

/// The arrival time at the service's final calling point. `None` for
/// cancelled services, and for boards without calling points.
pub fn arrival_time(board: &StationBoard) -> Option<String> {
    if is_cancelled(board) {
        return None;
    }

    let last_stop = board.calling_points.as_ref()?.last()?;
    Some(format_time(&last_stop.st))
}

/// The alternate destination reached through the service's route, if
/// the integration reports one.
pub fn destination_via(service: &TrainService) -> Option<&str> {
    service.destination.as_ref()?.location.as_ref()?.via.as_deref()
}

/// The station message with the literal "this station" replaced by the
/// station's display name.
pub fn station_message(board: &StationBoard) -> Option<String> {
    let message = board.message.as_deref()?;
    let station = board.station_name.as_deref().unwrap_or_default();
    Some(message.replacen("this station", &format!("{} station", station), 1))
}

/// The severity of the status badge: error for cancelled services,
/// warning for delayed ones, success otherwise.
pub fn severity(board: &StationBoard) -> Severity {
    if is_cancelled(board) {
        Severity::Error
    } else if board.service.as_ref().map(is_delayed).unwrap_or(false) {
        Severity::Warning
    } else {
        Severity::Success
    }
}

#[cfg(test)]
mod test {
    use hass::{CallingPoint, Destination, DestinationLocation};

    use super::*;

    fn service(std: &str, etd: &str) -> TrainService {
        TrainService {
            std: Some(std.to_string()),
            etd: Some(etd.to_string()),
            destination: None,
        }
    }

    fn stop(name: &str, st: &str) -> CallingPoint {
        CallingPoint {
            location_name: name.to_string(),
            st: st.to_string(),
        }
    }

    fn board(etd: &str, calling_points: Option<Vec<CallingPoint>>) -> StationBoard {
        StationBoard {
            service: Some(service("10_00", etd)),
            calling_points,
            ..Default::default()
        }
    }

    #[test]
    fn test_cancellation_table() {
        // All four combinations of status/calling points. Only a board
        // that does not say "Cancelled" and has no calling points
        // counts as cancelled.
        assert!(!is_cancelled(&board("Cancelled", Some(vec![stop("Tonbridge", "10_30")]))));
        assert!(!is_cancelled(&board("Cancelled", None)));
        assert!(!is_cancelled(&board("On Time", Some(vec![stop("Tonbridge", "10_30")]))));
        assert!(is_cancelled(&board("On Time", None)));
    }

    #[test]
    fn test_cancelled_status_still_departs() {
        // A board whose status reads "Cancelled" but carries no calling
        // points is not suppressed: the scheduled time still renders.
        let board = board("Cancelled", None);
        assert!(!is_cancelled(&board));
        assert_eq!(Some("10:00".to_string()), departure_time(&board));
        assert_eq!(None, arrival_time(&board));
    }

    #[test]
    fn test_delay_is_any_digit() {
        assert!(!is_delayed(&service("10_00", "On Time")));
        assert!(!is_delayed(&service("10_00", "Cancelled")));
        assert!(is_delayed(&service("10_00", "10_45")));
        assert!(!is_delayed(&TrainService::default()));
    }

    #[test]
    fn test_format_time() {
        assert_eq!("10:45", format_time("10_45"));
        assert_eq!("10:45", format_time("10:45"));
    }

    #[test]
    fn test_minutes_between() {
        assert_eq!(30, minutes_between("10:00", "10:30"));
        assert_eq!(20, minutes_between("23:50", "00:10")); // next day
        assert_eq!(0, minutes_between("10:00", "10:00"));
    }

    #[test]
    fn test_departure_prefers_estimate_when_delayed() {
        let delayed = board("10_45", Some(vec![stop("Tonbridge", "11_05")]));
        assert_eq!(Some("10:45".to_string()), departure_time(&delayed));

        let on_time = board("On Time", Some(vec![stop("Tonbridge", "11_05")]));
        assert_eq!(Some("10:00".to_string()), departure_time(&on_time));
    }

    #[test]
    fn test_arrival_is_last_stop() {
        let empty = board("On Time", Some(vec![]));
        assert_eq!(None, arrival_time(&empty));

        let one = board("On Time", Some(vec![stop("Tonbridge", "11_05")]));
        assert_eq!(Some("11:05".to_string()), arrival_time(&one));

        let many = board(
            "On Time",
            Some(vec![stop("Paddock Wood", "10_30"), stop("Tonbridge", "11_05")]),
        );
        assert_eq!(Some("11:05".to_string()), arrival_time(&many));
    }

    #[test]
    fn test_destination_via_nesting() {
        assert_eq!(None, destination_via(&service("10_00", "On Time")));

        let mut with_via = service("10_00", "On Time");
        with_via.destination = Some(Destination { location: None });
        assert_eq!(None, destination_via(&with_via));

        with_via.destination = Some(Destination {
            location: Some(DestinationLocation {
                via: Some("via Maidstone East".to_string()),
            }),
        });
        assert_eq!(Some("via Maidstone East"), destination_via(&with_via));
    }

    #[test]
    fn test_station_message_substitution() {
        let board = StationBoard {
            station_name: Some("Ashford".to_string()),
            message: Some("Delays at this station".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Some("Delays at Ashford station".to_string()),
            station_message(&board)
        );
    }

    #[test]
    fn test_severity() {
        assert_eq!(Severity::Error, severity(&board("On Time", None)));
        assert_eq!(
            Severity::Warning,
            severity(&board("10_45", Some(vec![stop("Tonbridge", "11_05")])))
        );
        assert_eq!(
            Severity::Success,
            severity(&board("On Time", Some(vec![stop("Tonbridge", "11_05")])))
        );
    }
}
