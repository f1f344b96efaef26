//! Built-in demo dataset: two senior secondary students, second term 2023/2024.

use shared::domain::{StudentRecord, SubjectScore};

fn subject(name: &str, ca: f64, exam: f64, total: f64, grade: &str) -> SubjectScore {
    SubjectScore {
        name: name.to_string(),
        continuous_assessment: ca,
        exam_score: exam,
        total,
        grade: grade.to_string(),
    }
}

pub fn sample_records() -> Vec<StudentRecord> {
    vec![
        StudentRecord {
            registration_number: "STU/2024/001".into(),
            pin: "123456".into(),
            name: "Ibrahim Musa".into(),
            class_name: "SSS 3".into(),
            term: "Second Term".into(),
            session: "2023/2024".into(),
            position: "1st".into(),
            average: 88.5,
            remarks: "An excellent performance. Keep it up!".into(),
            subjects: vec![
                subject("Mathematics", 38.0, 55.0, 93.0, "A"),
                subject("English Language", 35.0, 50.0, 85.0, "A"),
                subject("Physics", 32.0, 48.0, 80.0, "A"),
                subject("Chemistry", 30.0, 52.0, 82.0, "A"),
                subject("Biology", 36.0, 45.0, 81.0, "A"),
                subject("Civic Education", 40.0, 58.0, 98.0, "A+"),
            ],
        },
        StudentRecord {
            registration_number: "STU/2024/002".into(),
            pin: "654321".into(),
            name: "Chioma Okeke".into(),
            class_name: "SSS 3".into(),
            term: "Second Term".into(),
            session: "2023/2024".into(),
            position: "5th".into(),
            average: 72.3,
            remarks: "A good result, but there is room for improvement in Sciences.".into(),
            subjects: vec![
                subject("Mathematics", 25.0, 40.0, 65.0, "B"),
                subject("English Language", 35.0, 45.0, 80.0, "A"),
                subject("Physics", 20.0, 35.0, 55.0, "C"),
                subject("Chemistry", 28.0, 42.0, 70.0, "B"),
                subject("Biology", 30.0, 40.0, 70.0, "B"),
                subject("Economics", 38.0, 56.0, 94.0, "A"),
            ],
        },
    ]
}
