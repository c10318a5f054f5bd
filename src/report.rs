// src/report.rs

use serde::Serialize;
use std::fmt;

use crate::record::StudentRecord;
use crate::score::Sgpa;

/// A scored result, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    record: StudentRecord,
    sgpa: Sgpa,
}

impl Report {
    pub fn new(record: StudentRecord, sgpa: Sgpa) -> Self {
        Self { record, sgpa }
    }

    pub fn record(&self) -> &StudentRecord {
        &self.record
    }

    pub fn sgpa(&self) -> &Sgpa {
        &self.sgpa
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name : {}", self.record.name())?;
        writeln!(f, "USN  : {}", self.record.usn())?;
        writeln!(f)?;

        let width = self
            .sgpa
            .subjects()
            .iter()
            .map(|s| s.code.len())
            .max()
            .unwrap_or(0)
            .max("Subject".len());
        writeln!(f, "{:<width$}  Grade  Credits  Points", "Subject")?;
        for s in self.sgpa.subjects() {
            writeln!(
                f,
                "{:<width$}  {:<5}  {:>7}  {:>6}",
                s.code, s.grade, s.credits, s.grade_point
            )?;
        }
        writeln!(f)?;
        write!(
            f,
            "SGPA : {:.2} ({} / {} credits)",
            self.sgpa.value(),
            self.sgpa.earned_credits(),
            self.sgpa.total_credits()
        )
    }
}
