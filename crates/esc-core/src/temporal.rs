//! # Timestamps
//!
//! Bookkeeping time for off-chain artifacts: when a draft was built, when an
//! escrow moved between lifecycle states. Neither script reads a clock, so
//! nothing here influences a verdict. Values are UTC with whole seconds and
//! render as `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EscError;

/// UTC instant with whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current time, sub-seconds dropped.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(0))
    }

    /// Parse RFC 3339 in UTC (`Z` suffix required).
    pub fn parse(s: &str) -> Result<Self, EscError> {
        if !s.ends_with('Z') {
            return Err(EscError::InvalidTimestamp(format!("{s:?} is not in UTC (Z suffix)")));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc).trunc_subsecs(0)))
            .map_err(|e| EscError::InvalidTimestamp(format!("{s:?}: {e}")))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}
