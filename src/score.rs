// src/score.rs

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::ResultError;
use crate::record::SubjectGrade;

/// Letter grades from best to worst. `S` is worth 10, each step down one less.
pub const GRADE_SCALE: [&str; 6] = ["S", "A", "B", "C", "D", "E"];

/// A substring of the subject code and the credits it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditRule {
    pub pattern: &'static str,
    pub credits: u32,
}

/// Checked in order, first match wins. Lab codes (`L`) are tested before
/// `CS`, so `15CSL57` is a 2-credit lab.
///
/// Any code containing an `L` for another reason is counted as a lab too.
pub const CREDIT_RULES: &[CreditRule] = &[
    CreditRule {
        pattern: "L",
        credits: 2,
    },
    CreditRule {
        pattern: "CS",
        credits: 4,
    },
];

/// 10 for `S` down to 5 for `E`; 0 for anything off the scale.
pub fn grade_point(grade: &str) -> u32 {
    GRADE_SCALE
        .iter()
        .position(|g| *g == grade.trim())
        .map_or(0, |idx| 10 - idx as u32)
}

/// Credits for a subject code per [`CREDIT_RULES`]; 0 when nothing matches.
pub fn credit_weight(code: &str) -> u32 {
    CREDIT_RULES
        .iter()
        .find(|rule| code.contains(rule.pattern))
        .map_or(0, |rule| rule.credits)
}

/// One subject with the numbers that went into the average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredSubject {
    pub code: String,
    pub grade: String,
    pub grade_point: u32,
    pub credits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sgpa {
    value: f64,
    earned_credits: u32,
    total_credits: u32,
    subjects: Vec<ScoredSubject>,
}

impl Sgpa {
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Σ credits × grade point.
    pub fn earned_credits(&self) -> u32 {
        self.earned_credits
    }

    pub fn total_credits(&self) -> u32 {
        self.total_credits
    }

    /// Every input subject in input order, zero-credit ones included.
    pub fn subjects(&self) -> &[ScoredSubject] {
        &self.subjects
    }
}

/// Credit-weighted average of grade points.
///
/// Fails with [`ResultError::DivisionByZero`] when no subject earns credits.
pub fn score(grades: &[SubjectGrade]) -> Result<Sgpa, ResultError> {
    let mut total_credits = 0u32;
    let mut earned_credits = 0u32;
    let mut subjects = Vec::with_capacity(grades.len());

    for g in grades {
        let credits = credit_weight(&g.code);
        let gp = grade_point(&g.grade);
        trace!(code = %g.code, grade = %g.grade, credits, gp, "scored subject");
        total_credits += credits;
        earned_credits += credits * gp;
        subjects.push(ScoredSubject {
            code: g.code.clone(),
            grade: g.grade.clone(),
            grade_point: gp,
            credits,
        });
    }

    if total_credits == 0 {
        debug!(subjects = grades.len(), "no creditable subjects");
        return Err(ResultError::DivisionByZero);
    }

    let value = f64::from(earned_credits) / f64::from(total_credits);
    debug!(earned_credits, total_credits, value, "computed SGPA");
    Ok(Sgpa {
        value,
        earned_credits,
        total_credits,
        subjects,
    })
}
