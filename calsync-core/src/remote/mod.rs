pub mod protocol;
pub mod provider;
#[allow(clippy::module_inception)]
mod remote;

pub use protocol::CalendarInfo;
pub use provider::Provider;
pub use remote::{Remote, RemoteConfig};
