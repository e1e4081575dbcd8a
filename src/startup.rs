use std::sync::Arc;

use hass::{Calls, CARD_API_VERSION};

use crate::config::Config;
use crate::constants::{CARD_TYPE, VERSION};
use crate::registry;

/// Runs everything that needs to run at startup.
pub async fn on_startup(host: &Arc<dyn Calls>, config: &Config) {
    log::debug!("using railcard version '{}'", VERSION);
    log::debug!("using card API version '{}'", CARD_API_VERSION);

    // Authenticate, enable callbacks.
    prepare_rpc(host, config).await;

    // Put this card into the host's picker dialog.
    registry::register();
    for descriptor in registry::descriptors() {
        host.register_card(&descriptor).await;
    }

    // Whenever the controller is shut down, it won't remove rendered
    // markup for dashboards, so it's best to clear it here. Especially
    // helpful during development.
    host.clear_cards(CARD_TYPE).await;
}

/// Make sure that we can make host calls, and receive host callbacks.
async fn prepare_rpc(host: &Arc<dyn Calls>, config: &Config) {
    host.authenticate(&config.access_token).await;
    host.subscribe_events().await;
}
