/*!
 * Scheduling Policies
 * Policy selector and the shared selection result type
 */

use super::policies;
use crate::core::errors::{PmError, PmResult};
use crate::core::types::Pid;
use crate::hal::RandomSource;
use crate::process::ProcessTable;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Algorithm the dispatcher uses to pick the next process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchedulingPolicy {
    /// Next READY slot after the current one, wrapping around
    RoundRobin,
    /// Uniform draw among READY processes
    Random,
    /// Priority-weighted ticket draw
    #[default]
    Lottery,
    /// Most urgent priority, least CPU time on ties
    Priority,
    /// Longest-waiting process (highest aging counter)
    Aging,
}

impl SchedulingPolicy {
    pub const ALL: [SchedulingPolicy; 5] = [
        SchedulingPolicy::RoundRobin,
        SchedulingPolicy::Random,
        SchedulingPolicy::Lottery,
        SchedulingPolicy::Priority,
        SchedulingPolicy::Aging,
    ];

    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round_robin",
            Self::Random => "random",
            Self::Lottery => "lottery",
            Self::Priority => "priority",
            Self::Aging => "aging",
        }
    }

    /// Pick the next process to run
    ///
    /// Never fails: with nothing READY the selection is IDLE.
    pub fn select(&self, table: &ProcessTable, current: Pid, rng: &dyn RandomSource) -> Selection {
        match self {
            Self::RoundRobin => policies::round_robin(table, current),
            Self::Random => policies::random(table, rng),
            Self::Lottery => policies::lottery(table, rng),
            Self::Priority => policies::priority(table),
            Self::Aging => policies::aging(table),
        }
    }
}

impl FromStr for SchedulingPolicy {
    type Err = PmError;

    fn from_str(s: &str) -> PmResult<Self> {
        match s.to_lowercase().as_str() {
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            "random" | "rand" => Ok(Self::Random),
            "lottery" => Ok(Self::Lottery),
            "priority" | "prio" => Ok(Self::Priority),
            "aging" | "default" => Ok(Self::Aging),
            _ => Err(PmError::invalid(format!(
                "policy '{}' (valid: round_robin, random, lottery, priority, aging)",
                s
            ))),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// What a policy decided
///
/// Policies only read the table. The aging they want applied is returned in
/// `aged` and committed by the dispatcher; IDLE never appears there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub next: Pid,
    pub aged: Vec<Pid>,
}

impl Selection {
    pub(crate) fn new(next: Pid, aged: Vec<Pid>) -> Self {
        Self { next, aged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("rr".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::RoundRobin);
        assert_eq!("LOTTERY".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Lottery);
        assert_eq!("prio".parse::<SchedulingPolicy>().unwrap(), SchedulingPolicy::Priority);
        assert!("fifo".parse::<SchedulingPolicy>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&SchedulingPolicy::RoundRobin).unwrap();
        assert_eq!(json, "\"round_robin\"");
        let back: SchedulingPolicy = serde_json::from_str("\"aging\"").unwrap();
        assert_eq!(back, SchedulingPolicy::Aging);
        assert!(serde_json::from_str::<SchedulingPolicy>("\"cfs\"").is_err());
    }

    #[test]
    fn test_default_is_lottery() {
        assert_eq!(SchedulingPolicy::default(), SchedulingPolicy::Lottery);
    }
}
