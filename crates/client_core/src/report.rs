//! Plain-text rendering of the printable report card.

use std::fmt;

use chrono::NaiveDate;
use shared::domain::StudentRecord;

const WIDTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolHeader {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl Default for SchoolHeader {
    fn default() -> Self {
        Self {
            name: "Global Excellence Academy".into(),
            address: "123 Education Close, Knowledge City, State.".into(),
            contact: "Tel: +234 800 123 4567 | Email: info@gea.edu.ng".into(),
        }
    }
}

pub struct ReportCard<'a> {
    pub school: &'a SchoolHeader,
    pub record: &'a StudentRecord,
    pub printed_on: NaiveDate,
}

impl fmt::Display for ReportCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        let rule = "=".repeat(WIDTH);
        let thin = "-".repeat(WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "{:^width$}", self.school.name.to_uppercase(), width = WIDTH)?;
        writeln!(f, "{:^width$}", self.school.address, width = WIDTH)?;
        writeln!(f, "{:^width$}", self.school.contact, width = WIDTH)?;
        writeln!(f, "{:^width$}", "STUDENT REPORT CARD", width = WIDTH)?;
        writeln!(f, "{rule}")?;

        writeln!(f, "{:<20}{}", "Student Name:", record.name)?;
        writeln!(f, "{:<20}{}", "Admission Number:", record.registration_number)?;
        writeln!(f, "{:<20}{}", "Class:", record.class_name)?;
        writeln!(f, "{:<20}{}", "Academic Session:", record.session)?;
        writeln!(f, "{:<20}{}", "Term:", record.term)?;
        writeln!(f, "{:<20}{}", "Date Printed:", self.printed_on.format("%Y-%m-%d"))?;
        writeln!(f, "{thin}")?;

        writeln!(
            f,
            "{:<22}{:>8}{:>11}{:>13}{:>8}",
            "Subject", "C.A (40)", "Exam (60)", "Total (100)", "Grade"
        )?;
        for subject in &record.subjects {
            writeln!(
                f,
                "{:<22}{:>8}{:>11}{:>13}{:>8}",
                subject.name,
                subject.continuous_assessment,
                subject.exam_score,
                subject.total,
                subject.grade
            )?;
        }
        writeln!(f, "{thin}")?;

        writeln!(
            f,
            "Overall Average: {:.1}%   Class Position: {}   Subjects: {}",
            record.average,
            record.position,
            record.subjects.len()
        )?;
        writeln!(f, "Principal's Remark: \"{}\"", record.remarks)?;
        write!(f, "{rule}")
    }
}

pub fn render_report_card(
    school: &SchoolHeader,
    record: &StudentRecord,
    printed_on: NaiveDate,
) -> String {
    ReportCard {
        school,
        record,
        printed_on,
    }
    .to_string()
}
