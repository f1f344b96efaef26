use serde::{Deserialize, Serialize};

use crate::{domain::StudentRecord, error::LookupFailure};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum LookupOutcome {
    Success(StudentRecord),
    Failure { reason: LookupFailure },
}

impl LookupOutcome {
    pub fn invalid_credentials() -> Self {
        Self::Failure {
            reason: LookupFailure::InvalidCredentials,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_reason_tag() {
        let value = serde_json::to_value(LookupOutcome::invalid_credentials()).expect("json");
        assert_eq!(value["type"], "failure");
        assert_eq!(value["payload"]["reason"], "invalid_credentials");
    }
}
