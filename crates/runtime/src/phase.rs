//! Lifecycle phases that scope session sharing and bulk teardown.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stage of the run lifecycle a session was created in.
///
/// Sessions created in [`Phase::BeforeSuite`] are visible to every worker;
/// sessions from all other phases are scoped to their owning worker.
/// [`Phase::All`] is the bulk-teardown wildcard and never appears on a
/// registered session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    BeforeSuite,
    BeforeClass,
    BeforeMethod,
    Method,
    AfterMethod,
    AfterClass,
    AfterSuite,
    All,
}

impl Phase {
    /// Returns true for the phase whose sessions are shared across workers.
    pub fn is_global(self) -> bool {
        matches!(self, Phase::BeforeSuite)
    }

    /// Returns true for the bulk-teardown wildcard.
    pub fn is_wildcard(self) -> bool {
        matches!(self, Phase::All)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::BeforeSuite => "before-suite",
            Phase::BeforeClass => "before-class",
            Phase::BeforeMethod => "before-method",
            Phase::Method => "method",
            Phase::AfterMethod => "after-method",
            Phase::AfterClass => "after-class",
            Phase::AfterSuite => "after-suite",
            Phase::All => "all",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_before_suite_is_global() {
        assert!(Phase::BeforeSuite.is_global());
        for phase in [
            Phase::BeforeClass,
            Phase::BeforeMethod,
            Phase::Method,
            Phase::AfterMethod,
            Phase::AfterClass,
            Phase::AfterSuite,
            Phase::All,
        ] {
            assert!(!phase.is_global(), "{phase} must not be global");
        }
    }

    #[test]
    fn display_matches_serde_names() {
        let json = serde_json::to_string(&Phase::BeforeMethod).unwrap();
        assert_eq!(json, format!("\"{}\"", Phase::BeforeMethod));
    }
}
