use serde::Deserialize;

/// Gestures are triggered within rendered card markup and allow the
/// user to interact with the dashboard.
///
/// Cards never interpret gesture semantics: each gesture is forwarded
/// verbatim to the host's generic action handler, together with the
/// card's configuration.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// A short tap or click on the card.
    Tap,

    /// A press that is held down.
    Hold,

    /// Two taps in quick succession.
    DoubleTap,
}

impl Gesture {
    /// Parse a gesture name sent by the host.
    ///
    /// # Panics
    /// Panics if the given name is not a known gesture.
    pub fn from_name(name: &str) -> Gesture {
        serde_json::from_value(serde_json::Value::String(name.to_string()))
            .expect("failed to deserialize gesture")
    }

    /// The gesture name as it is forwarded to the host's action
    /// handler.
    pub fn as_str(&self) -> &'static str {
        use Gesture::*;
        match self {
            Tap => "tap",
            Hold => "hold",
            DoubleTap => "double_tap",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_gesture() {
        assert_eq!(Gesture::DoubleTap, Gesture::from_name("double_tap"));
        assert_eq!("double_tap", Gesture::from_name("double_tap").as_str());
    }
}
