use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a lookup did not produce a record. Expected outcome, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailure {
    #[error("invalid registration number or pin")]
    InvalidCredentials,
}

impl LookupFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
        }
    }
}

pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "Invalid Registration Number or PIN. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    LoggedOut,
    Checking,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while session is {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: SessionPhase,
    },
    #[error("lookup task was cancelled before it produced an outcome")]
    LookupAborted,
}
