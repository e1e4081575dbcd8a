pub use callbacks::*;
pub use calls::*;
pub use structs::*;

mod callbacks;
mod calls;
pub mod structs;

/// The supported card-API version of the dashboard host.
///
/// Call and event signatures may differ across versions; the host
/// announces its own version in the connection greeting.
pub const CARD_API_VERSION: &str = "1";
