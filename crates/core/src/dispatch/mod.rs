mod error;
mod retry;
mod routes;

pub use error::{dispatch_error_to_status_code, DispatchError, Result};
pub use retry::{RetryPolicy, TransportFailure};
pub use routes::{AuthContext, RouteTable};
