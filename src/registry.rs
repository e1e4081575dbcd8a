use std::sync::Mutex;

use lazy_static::lazy_static;

use hass::CardDescriptor;

use crate::config::CardConfig;
use crate::constants::{CARD_DESCRIPTION, CARD_NAME, CARD_TYPE};

lazy_static! {
    /// The process-wide card registry. Every descriptor in here is
    /// announced to the host at startup, so that its picker dialog
    /// can offer the card.
    static ref CARD_REGISTRY: Mutex<Vec<CardDescriptor>> = Mutex::new(vec![]);
}

/// Append this card's descriptor to the process-wide registry.
///
/// Registration happens once per process; repeated calls are no-ops.
pub fn register() {
    let mut registry = CARD_REGISTRY.lock().expect("card registry poisoned");
    if registry.iter().any(|d| d.card_type == CARD_TYPE) {
        return;
    }
    registry.push(CardDescriptor {
        card_type: CARD_TYPE.to_string(),
        name: CARD_NAME.to_string(),
        description: CARD_DESCRIPTION.to_string(),
    });
}

/// The descriptors registered in this process.
pub fn descriptors() -> Vec<CardDescriptor> {
    CARD_REGISTRY
        .lock()
        .expect("card registry poisoned")
        .clone()
}

/// The configuration a newly picked card starts out with.
pub fn stub_config() -> CardConfig {
    CardConfig::default()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_registration_is_idempotent() {
        register();
        register();

        let descriptors = descriptors();
        assert_eq!(1, descriptors.len());
        assert_eq!(CARD_TYPE, descriptors[0].card_type);
    }

    #[test]
    fn test_stub_config_is_empty() {
        let keys = stub_config().to_value();
        assert!(keys.as_object().unwrap().is_empty());
    }
}
