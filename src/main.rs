/// The card controller's entry-point.
///
/// If no dashboard host is running, this function will periodically
/// try to connect. Whenever the host stops, this function will panic.
#[tokio::main]
async fn main() {
    use std::sync::Arc;
    use std::time::Duration;

    use dotenv::dotenv;
    use tokio::time::sleep;

    use hass::{Calls, HostConnection};
    use railcard::config::Config;
    use railcard::controller::Controller;
    use railcard::startup;

    // Read environment variables from an '.env' file in the working directory.
    // We use these env vars:
    //  - RUST_LOG
    //  - RAILCARD_CONFIG
    let using_env_file = dotenv().is_ok();

    env_logger::init(); // Use log::* to write to stderr

    if using_env_file {
        log::info!("using .env file")
    }

    let config = Config::read_from_env();

    let retry_after = Duration::from_secs(1);

    log::info!("waiting for dashboard host connection...");
    let mut conn = loop {
        match HostConnection::new(&config.host_address).await {
            None => {
                sleep(retry_after).await;
                log::debug!("waiting for dashboard host connection...");
            }
            Some(conn) => break conn,
        }
    };
    log::info!("got dashboard host connection");

    let host = Arc::new(conn.client.clone()) as Arc<dyn Calls>;

    startup::on_startup(&host, &config).await;

    let controller = Controller::init(host).await;

    log::info!("running callback loop...");
    loop {
        let next_callback = conn
            .callbacks
            .recv()
            .await
            .expect("callback receiver disconnected");
        controller.on_host_event(next_callback).await;
    }

    // Here we don't care about explicitly joining the read loop
    // ('conn.read_handle') or msg loop ('conn.msg_handle'), and simply
    // run the callback loop in the main task until something breaks.
}
