use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(alias = "regNo")]
    pub registration_number: String,
    pub pin: String,
    pub name: String,
    #[serde(alias = "class")]
    pub class_name: String,
    pub term: String,
    pub session: String,
    pub position: String,
    pub average: f64,
    pub remarks: String,
    #[serde(default)]
    pub subjects: Vec<SubjectScore>,
}

impl StudentRecord {
    pub fn matches(&self, registration_number: &str, pin: &str) -> bool {
        self.registration_number == registration_number && self.pin == pin
    }
}

impl fmt::Debug for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentRecord")
            .field("registration_number", &self.registration_number)
            .field("pin", &"<redacted>")
            .field("name", &self.name)
            .field("class_name", &self.class_name)
            .field("term", &self.term)
            .field("session", &self.session)
            .field("position", &self.position)
            .field("average", &self.average)
            .field("remarks", &self.remarks)
            .field("subjects", &self.subjects)
            .finish()
    }
}

const TOTAL_TOLERANCE: f64 = 1e-9;

/// One row of the report card. `total` and `grade` are carried as supplied;
/// see `SubjectScore::expected_total` for the consistency check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectScore {
    pub name: String,
    #[serde(alias = "ca")]
    pub continuous_assessment: f64,
    #[serde(alias = "exam")]
    pub exam_score: f64,
    pub total: f64,
    pub grade: String,
}

impl SubjectScore {
    pub fn expected_total(&self) -> f64 {
        self.continuous_assessment + self.exam_score
    }

    /// Compares within a tolerance scaled to the magnitude of the total, so
    /// fractional scores such as 38.7 + 55.6 = 94.3 still agree.
    pub fn is_consistent(&self) -> bool {
        let tolerance = TOTAL_TOLERANCE * self.total.abs().max(1.0);
        (self.total - self.expected_total()).abs() <= tolerance
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub registration_number: String,
    pub pin: String,
}

impl Credentials {
    pub fn new(registration_number: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            registration_number: registration_number.into(),
            pin: pin.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("registration_number", &self.registration_number)
            .field("pin", &"<redacted>")
            .finish()
    }
}

/// Container shape of a dataset file: `{ "students": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_field_names_from_legacy_datasets() {
        let raw = serde_json::json!({
            "regNo": "STU/2024/009",
            "pin": "111111",
            "name": "Test Student",
            "class": "JSS 1",
            "term": "First Term",
            "session": "2024/2025",
            "position": "3rd",
            "average": 61.0,
            "remarks": "Fair.",
            "subjects": [
                { "name": "Mathematics", "ca": 20, "exam": 41, "total": 61, "grade": "B" }
            ]
        });

        let record: StudentRecord = serde_json::from_value(raw).expect("record");
        assert_eq!(record.registration_number, "STU/2024/009");
        assert_eq!(record.class_name, "JSS 1");
        assert_eq!(record.subjects[0].continuous_assessment, 20.0);
        assert_eq!(record.subjects[0].exam_score, 41.0);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let credentials = Credentials::new("STU/2024/001", "123456");
        let value = serde_json::to_value(&credentials).expect("json");
        assert_eq!(value["registrationNumber"], "STU/2024/001");
        assert_eq!(value["pin"], "123456");
    }

    #[test]
    fn debug_output_never_contains_pin() {
        let credentials = Credentials::new("STU/2024/001", "123456");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("STU/2024/001"));
        assert!(!rendered.contains("123456"));
    }

    #[test]
    fn toml_dataset_uses_students_tables() {
        let raw = r#"
            [[students]]
            registrationNumber = "STU/2024/010"
            pin = "222222"
            name = "Toml Student"
            className = "SSS 1"
            term = "Third Term"
            session = "2024/2025"
            position = "2nd"
            average = 70.5
            remarks = "Good."

            [[students.subjects]]
            name = "Biology"
            continuousAssessment = 30
            examScore = 40
            total = 70
            grade = "B"
        "#;

        let dataset: Dataset = toml::from_str(raw).expect("toml");
        assert_eq!(dataset.students.len(), 1);
        assert_eq!(dataset.students[0].subjects.len(), 1);
        assert!(dataset.students[0].subjects[0].is_consistent());
    }

    #[test]
    fn flags_total_that_disagrees_with_components() {
        let score = SubjectScore {
            name: "Physics".into(),
            continuous_assessment: 20.0,
            exam_score: 35.0,
            total: 60.0,
            grade: "C".into(),
        };
        assert_eq!(score.expected_total(), 55.0);
        assert!(!score.is_consistent());
    }

    #[test]
    fn fractional_scores_with_matching_total_are_consistent() {
        let score = SubjectScore {
            name: "Chemistry".into(),
            continuous_assessment: 38.7,
            exam_score: 55.6,
            total: 94.3,
            grade: "A".into(),
        };
        assert_ne!(score.expected_total(), score.total);
        assert!(score.is_consistent());

        let off_by_a_tenth = SubjectScore {
            total: 94.4,
            ..score
        };
        assert!(!off_by_a_tenth.is_consistent());
    }

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        let record = StudentRecord {
            registration_number: "STU/2024/001".into(),
            pin: "123456".into(),
            name: "x".into(),
            class_name: "x".into(),
            term: "x".into(),
            session: "x".into(),
            position: "x".into(),
            average: 0.0,
            remarks: String::new(),
            subjects: Vec::new(),
        };
        assert!(record.matches("STU/2024/001", "123456"));
        assert!(!record.matches("stu/2024/001", "123456"));
        assert!(!record.matches("STU/2024/001 ", "123456"));
        assert!(!record.matches("STU/2024/001", "123457"));
    }
}
