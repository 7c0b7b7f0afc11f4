//! Forwarding of `/api/...` requests to registered services.

mod dispatcher;
mod upstream;

pub use dispatcher::Dispatcher;
pub use upstream::{strip_hop_by_hop, ForwardRequest, ForwardResponse, HttpUpstream, Upstream};
