use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a team. Ordered so that every per-team map iterates the same way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TeamId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_equality() {
        let a = TeamId::from("Team A");
        let b = TeamId::new("Team A");
        let c = TeamId::from("Team B");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn team_ids_sort_by_name() {
        let mut ids = vec![TeamId::from("Team C"), TeamId::from("Team A")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "Team A");
    }

    #[test]
    fn team_id_displays_its_name() {
        assert_eq!(TeamId::from("Team D").to_string(), "Team D");
    }
}
