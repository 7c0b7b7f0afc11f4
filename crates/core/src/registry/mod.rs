mod error;
mod liveness;
mod selection;
mod types;

pub use error::{RegistryError, Result};
pub use liveness::{expired_ids, instance_state, is_live, InstanceState};
pub use selection::{select_index, SelectionPolicy};
pub use types::{
    HeartbeatResponse, RegisterResponse, ServiceDescriptor, ServiceInstance, UnregisterResponse,
};
