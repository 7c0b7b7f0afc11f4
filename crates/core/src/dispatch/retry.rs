use std::fmt;

/// A failure to get any HTTP response out of an upstream instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    ConnectionRefused(String),
    Timeout(String),
    /// Connection dropped or the request could not be written.
    Connection(String),
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::ConnectionRefused(detail) => {
                write!(f, "connection refused: {detail}")
            }
            TransportFailure::Timeout(detail) => write!(f, "timed out: {detail}"),
            TransportFailure::Connection(detail) => write!(f, "connection error: {detail}"),
        }
    }
}

/// Bounded retry of transport failures against alternate instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one. Each must target a different instance.
    pub max_retries: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 1 }
    }
}

impl RetryPolicy {
    /// Whether another attempt should be made after `attempts` failed ones.
    ///
    /// `untried_instances` is the number of live instances not yet attempted.
    pub fn should_retry(&self, attempts: usize, untried_instances: usize) -> bool {
        attempts <= self.max_retries && untried_instances > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_one_retry() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(1, 1));
        assert!(!policy.should_retry(2, 3));
    }

    #[test]
    fn test_no_retry_without_alternate() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(1, 0));
    }

    #[test]
    fn test_zero_retries() {
        let policy = RetryPolicy { max_retries: 0 };
        assert!(!policy.should_retry(1, 5));
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(
            TransportFailure::Timeout("10.0.0.5:4000".to_string()).to_string(),
            "timed out: 10.0.0.5:4000"
        );
    }
}
