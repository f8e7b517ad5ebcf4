/*!
 * Semaphore Types
 * Semaphore entries and control commands
 */

use crate::core::errors::{PmError, PmResult};
use crate::core::limits::{GETVAL, IPC_RMID, SETVAL};
use crate::core::types::SemKey;
use serde::{Deserialize, Serialize};

/// Semaphore table entry
///
/// `counter >= 0` is the number of available units; a negative value means
/// `-counter` processes are blocked on the entry's chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semaphore {
    pub valid: bool,
    pub key: SemKey,
    pub counter: i32,
}

/// `semctl` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemCommand {
    GetVal,
    SetVal,
    Remove,
}

impl TryFrom<i32> for SemCommand {
    type Error = PmError;

    fn try_from(cmd: i32) -> PmResult<Self> {
        match cmd {
            GETVAL => Ok(SemCommand::GetVal),
            SETVAL => Ok(SemCommand::SetVal),
            IPC_RMID => Ok(SemCommand::Remove),
            _ => Err(PmError::invalid(format!("semctl command {}", cmd))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_raw() {
        assert_eq!(SemCommand::try_from(GETVAL).unwrap(), SemCommand::GetVal);
        assert_eq!(SemCommand::try_from(SETVAL).unwrap(), SemCommand::SetVal);
        assert_eq!(SemCommand::try_from(IPC_RMID).unwrap(), SemCommand::Remove);
        assert!(SemCommand::try_from(99).is_err());
    }
}
