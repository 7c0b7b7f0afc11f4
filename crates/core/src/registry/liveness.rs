//! Heartbeat liveness arithmetic.
//!
//! Time is always passed in, so callers decide what "now" means and the
//! rules stay testable without sleeping.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::ServiceInstance;

/// Routability of an instance at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    Active,
    Expired,
}

/// Returns true if the instance heartbeated within `window` of `now`.
///
/// An instance whose last heartbeat is exactly `window` old is still live.
/// A heartbeat timestamp in the future (clock skew) counts as live.
pub fn is_live(instance: &ServiceInstance, now: DateTime<Utc>, window: Duration) -> bool {
    match (now - instance.last_heartbeat_at).to_std() {
        Ok(age) => age <= window,
        Err(_) => true,
    }
}

/// Classifies an instance at `now`.
pub fn instance_state(
    instance: &ServiceInstance,
    now: DateTime<Utc>,
    window: Duration,
) -> InstanceState {
    if is_live(instance, now, window) {
        InstanceState::Active
    } else {
        InstanceState::Expired
    }
}

/// IDs of all instances that are past the liveness window at `now`.
pub fn expired_ids<'a, I>(instances: I, now: DateTime<Utc>, window: Duration) -> Vec<Uuid>
where
    I: IntoIterator<Item = &'a ServiceInstance>,
{
    instances
        .into_iter()
        .filter(|instance| !is_live(instance, now, window))
        .map(|instance| instance.service_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ServiceDescriptor;

    const WINDOW: Duration = Duration::from_secs(90);

    fn instance_at(heartbeat: DateTime<Utc>) -> ServiceInstance {
        ServiceInstance::from_descriptor(
            ServiceDescriptor::new("order_service", "10.0.0.5", 4000),
            Uuid::new_v4(),
            heartbeat,
        )
        .unwrap()
    }

    #[test]
    fn test_live_within_window() {
        let start = Utc::now();
        let instance = instance_at(start);
        assert!(is_live(&instance, start, WINDOW));
        assert!(is_live(&instance, start + chrono::Duration::seconds(89), WINDOW));
    }

    #[test]
    fn test_boundary_is_live() {
        let start = Utc::now();
        let instance = instance_at(start);
        assert!(is_live(&instance, start + chrono::Duration::seconds(90), WINDOW));
    }

    #[test]
    fn test_expired_after_window() {
        let start = Utc::now();
        let instance = instance_at(start);
        let later = start + chrono::Duration::seconds(91);
        assert!(!is_live(&instance, later, WINDOW));
        assert_eq!(instance_state(&instance, later, WINDOW), InstanceState::Expired);
    }

    #[test]
    fn test_future_heartbeat_is_live() {
        let now = Utc::now();
        let instance = instance_at(now + chrono::Duration::seconds(5));
        assert_eq!(instance_state(&instance, now, WINDOW), InstanceState::Active);
    }

    #[test]
    fn test_expired_ids() {
        let now = Utc::now();
        let fresh = instance_at(now);
        let stale = instance_at(now - chrono::Duration::seconds(300));

        let expired = expired_ids([&fresh, &stale], now, WINDOW);

        assert_eq!(expired, vec![stale.service_id]);
    }
}
