mod client;
mod error;
mod types;

pub use client::TrackerClient;
pub use types::*;
