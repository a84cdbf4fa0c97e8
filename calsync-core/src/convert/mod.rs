//! Outgoing payloads: canonical events in each store's native format.

mod to_google;
mod to_ics;

pub use to_google::to_google;
pub use to_ics::{new_uid, to_ics};
