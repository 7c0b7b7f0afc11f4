//! Service registry, its clock, and the background tasks that maintain it.

mod clock;
mod service;
mod sweeper;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use service::{InstanceView, ServiceRegistry};
pub use sweeper::{spawn_self_registration, spawn_sweeper};
