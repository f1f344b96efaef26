//! Line-oriented presentation of the login and result views.

use std::{io::Write, sync::Arc};

use anyhow::Result;
use chrono::NaiveDate;
use client_core::{
    report::{render_report_card, SchoolHeader},
    FormField, SessionController, SessionSnapshot, Submission, View,
};
use shared::protocol::LookupOutcome;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

pub struct Terminal<R, W> {
    session: Arc<SessionController>,
    school: SchoolHeader,
    printed_on: NaiveDate,
    input: Lines<R>,
    output: W,
}

enum ResultCommand {
    Print,
    Logout,
    Quit,
    Unknown,
}

impl ResultCommand {
    fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "print" => Self::Print,
            "l" | "logout" | "b" | "back" => Self::Logout,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown,
        }
    }
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        session: Arc<SessionController>,
        school: SchoolHeader,
        printed_on: NaiveDate,
        input: R,
        output: W,
    ) -> Self {
        Self {
            session,
            school,
            printed_on,
            input: input.lines(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Submits one pair of credentials and shows the outcome. Returns whether
    /// the session ended up authenticated.
    pub async fn check_once(&mut self, registration_number: &str, pin: &str) -> Result<bool> {
        self.session
            .update_field(FormField::RegistrationNumber, registration_number)
            .await?;
        self.session.update_field(FormField::Pin, pin).await?;

        writeln!(self.output, "Checking Database...")?;
        match self.session.submit_credentials().await? {
            Submission::Completed(LookupOutcome::Success(_)) => {
                self.print_report().await?;
                Ok(true)
            }
            Submission::Completed(LookupOutcome::Failure { .. }) => {
                let snapshot = self.session.snapshot().await;
                self.print_error(&snapshot)?;
                Ok(false)
            }
            Submission::Ignored => {
                debug!("submission ignored while a lookup is pending");
                Ok(false)
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Student Portal")?;
        writeln!(self.output, "Check your academic results securely")?;

        loop {
            let snapshot = self.session.snapshot().await;
            match snapshot.view {
                View::Login => {
                    let Some(registration_number) =
                        self.prompt_required("Registration Number").await?
                    else {
                        return Ok(());
                    };
                    let Some(pin) = self.prompt_required("Scratch Card PIN").await? else {
                        return Ok(());
                    };
                    self.check_once(&registration_number, &pin).await?;
                }
                View::Result => {
                    write!(self.output, "[p]rint again, [l]ogout, [q]uit: ")?;
                    self.output.flush()?;
                    let Some(line) = self.input.next_line().await? else {
                        return Ok(());
                    };
                    match ResultCommand::parse(&line) {
                        ResultCommand::Print => self.print_report().await?,
                        ResultCommand::Logout => {
                            self.session.logout().await?;
                            writeln!(self.output, "Back to search.")?;
                        }
                        ResultCommand::Quit => return Ok(()),
                        ResultCommand::Unknown => {
                            writeln!(self.output, "Unknown command '{}'.", line.trim())?;
                        }
                    }
                }
            }
        }
    }

    async fn prompt_required(&mut self, label: &str) -> Result<Option<String>> {
        loop {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;
            let Some(line) = self.input.next_line().await? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                writeln!(self.output, "{label} is required.")?;
                continue;
            }
            return Ok(Some(line));
        }
    }

    async fn print_report(&mut self) -> Result<()> {
        let snapshot = self.session.snapshot().await;
        if let Some(record) = &snapshot.record {
            let card = render_report_card(&self.school, record, self.printed_on);
            writeln!(self.output, "{card}")?;
        }
        Ok(())
    }

    fn print_error(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(error) = &snapshot.error {
            writeln!(self.output, "{error}")?;
        }
        Ok(())
    }
}
