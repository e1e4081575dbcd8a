pub use display::*;
pub use editor::*;
pub use facade::Controller;
pub use state::*;

use hass::Fault;

mod display;
mod editor;
mod facade;
mod state;

/// A render call may fault when the target card instance disappeared
/// between the triggering event and the call; that race is benign.
fn check_send_res(res: Result<(), Fault>) {
    match res {
        Ok(_) => {}
        Err(Fault { ref msg, .. }) if msg == "CardId unknown." => {}
        _ => res.expect("failed to send widget"),
    }
}
