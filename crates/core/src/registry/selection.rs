use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RegistryError;

/// How `resolve` picks one instance out of the live set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Rotate through live instances on successive calls.
    #[default]
    RoundRobin,
    /// Always pick the longest-registered live instance.
    FirstMatch,
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::RoundRobin => f.write_str("round_robin"),
            SelectionPolicy::FirstMatch => f.write_str("first_match"),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "round_robin" => Ok(SelectionPolicy::RoundRobin),
            "first_match" | "first" => Ok(SelectionPolicy::FirstMatch),
            _ => Err(RegistryError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Picks an index into a candidate list of length `len`.
///
/// `ticket` is a per-service counter value; it is ignored by `FirstMatch`.
/// Returns `None` when there are no candidates.
pub fn select_index(policy: SelectionPolicy, len: usize, ticket: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match policy {
        SelectionPolicy::RoundRobin => Some(ticket % len),
        SelectionPolicy::FirstMatch => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_cycles() {
        let picks: Vec<usize> = (0..5)
            .filter_map(|t| select_index(SelectionPolicy::RoundRobin, 3, t))
            .collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_first_match_is_stable() {
        assert_eq!(select_index(SelectionPolicy::FirstMatch, 3, 7), Some(0));
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(select_index(SelectionPolicy::RoundRobin, 0, 4), None);
        assert_eq!(select_index(SelectionPolicy::FirstMatch, 0, 0), None);
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!(
            "round-robin".parse::<SelectionPolicy>().unwrap(),
            SelectionPolicy::RoundRobin
        );
        assert_eq!(
            "FIRST_MATCH".parse::<SelectionPolicy>().unwrap(),
            SelectionPolicy::FirstMatch
        );
        assert_eq!(
            "random".parse::<SelectionPolicy>(),
            Err(RegistryError::UnknownPolicy("random".to_string()))
        );
        assert_eq!(SelectionPolicy::FirstMatch.to_string(), "first_match");
    }
}
