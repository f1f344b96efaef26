use std::{collections::HashSet, fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::Serialize;
use shared::domain::{Dataset, StudentRecord};
use thiserror::Error;
use tracing::info;

mod sample;

pub use sample::sample_records;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("duplicate registration number '{registration_number}' in dataset")]
    DuplicateRegistration { registration_number: String },
    #[error("unsupported dataset format '{extension}'; expected .json or .toml")]
    UnsupportedFormat { extension: String },
}

/// Read-only set of student records. Cloning shares the same records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[StudentRecord]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyIssue {
    BlankCredentials {
        registration_number: String,
    },
    AverageOutOfRange {
        registration_number: String,
        average: f64,
    },
    TotalMismatch {
        registration_number: String,
        subject: String,
        expected: f64,
        actual: f64,
    },
}

impl std::fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCredentials {
                registration_number,
            } => write!(
                f,
                "record '{registration_number}' has a blank registration number or pin"
            ),
            Self::AverageOutOfRange {
                registration_number,
                average,
            } => write!(
                f,
                "record '{registration_number}' has average {average} outside 0-100"
            ),
            Self::TotalMismatch {
                registration_number,
                subject,
                expected,
                actual,
            } => write!(
                f,
                "record '{registration_number}' subject '{subject}' total is {actual}, ca + exam is {expected}"
            ),
        }
    }
}

impl RecordStore {
    pub fn from_records(records: Vec<StudentRecord>) -> Result<Self, StorageError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.registration_number.as_str()) {
                return Err(StorageError::DuplicateRegistration {
                    registration_number: record.registration_number.clone(),
                });
            }
        }

        Ok(Self {
            records: records.into(),
        })
    }

    pub fn sample() -> Self {
        Self {
            records: sample_records().into(),
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Result<Self, StorageError> {
        Self::from_records(dataset.students)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset '{}'", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let dataset: Dataset = match extension.as_str() {
            "json" => serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse JSON dataset '{}'", path.display()))?,
            "toml" => toml::from_str(&raw)
                .with_context(|| format!("failed to parse TOML dataset '{}'", path.display()))?,
            _ => return Err(StorageError::UnsupportedFormat { extension }.into()),
        };

        let store = Self::from_dataset(dataset)
            .with_context(|| format!("dataset '{}' failed integrity check", path.display()))?;
        info!(path = %path.display(), records = store.len(), "loaded student records");
        Ok(store)
    }

    /// Exact, case-sensitive match on both registration number and pin.
    pub fn find_by_credentials(&self, registration_number: &str, pin: &str) -> Option<&StudentRecord> {
        self.records
            .iter()
            .find(|record| record.matches(registration_number, pin))
    }

    /// Lookup by key alone. For tooling; never an authentication path.
    pub fn find_by_registration(&self, registration_number: &str) -> Option<&StudentRecord> {
        self.records
            .iter()
            .find(|record| record.registration_number == registration_number)
    }

    pub fn records(&self) -> impl Iterator<Item = &StudentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            students: self.records.to_vec(),
        }
    }

    /// Reports derived-field and credential problems without rewriting anything.
    pub fn audit(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();
        for record in self.records.iter() {
            if record.registration_number.trim().is_empty() || record.pin.trim().is_empty() {
                issues.push(ConsistencyIssue::BlankCredentials {
                    registration_number: record.registration_number.clone(),
                });
            }
            if !(0.0..=100.0).contains(&record.average) {
                issues.push(ConsistencyIssue::AverageOutOfRange {
                    registration_number: record.registration_number.clone(),
                    average: record.average,
                });
            }
            for subject in &record.subjects {
                if !subject.is_consistent() {
                    issues.push(ConsistencyIssue::TotalMismatch {
                        registration_number: record.registration_number.clone(),
                        subject: subject.name.clone(),
                        expected: subject.expected_total(),
                        actual: subject.total,
                    });
                }
            }
        }
        issues
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::sample()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
