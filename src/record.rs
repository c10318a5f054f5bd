// src/record.rs

use serde::Serialize;

use crate::error::ResultError;
use crate::usn::Usn;

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectGrade {
    pub code: String,
    pub grade: String,
}

impl SubjectGrade {
    pub fn new(code: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            grade: grade.into(),
        }
    }
}

/// A parsed result page. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    usn: Usn,
    name: String,
    grades: Vec<SubjectGrade>,
}

impl StudentRecord {
    pub fn usn(&self) -> &Usn {
        &self.usn
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subject grades in table row order.
    pub fn grades(&self) -> &[SubjectGrade] {
        &self.grades
    }

    /// Grade for `code`, if the page listed it.
    pub fn grade(&self, code: &str) -> Option<&str> {
        self.grades
            .iter()
            .find(|g| g.code == code)
            .map(|g| g.grade.as_str())
    }
}

/// Accumulates the pieces of a [`StudentRecord`] during a parse pass.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    name: Option<String>,
    grades: Vec<SubjectGrade>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Append a row. Blank codes or grades are ignored; a repeated code
    /// takes the new grade but keeps its original position.
    pub fn grade(&mut self, code: &str, grade: &str) -> &mut Self {
        let (code, grade) = (code.trim(), grade.trim());
        if code.is_empty() || grade.is_empty() {
            return self;
        }
        match self.grades.iter_mut().find(|g| g.code == code) {
            Some(existing) => existing.grade = grade.to_string(),
            None => self.grades.push(SubjectGrade::new(code, grade)),
        }
        self
    }

    pub fn build(self, usn: Usn) -> Result<StudentRecord, ResultError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ResultError::Parse("student name missing".to_string()))?;
        Ok(StudentRecord {
            usn,
            name,
            grades: self.grades,
        })
    }
}
