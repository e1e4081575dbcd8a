pub use api::*;
pub use client::*;

mod api;
mod client;
