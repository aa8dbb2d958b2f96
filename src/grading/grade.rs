// src/grading/grade.rs
//! Score to letter-grade mapping

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Minimum score accepted when applying to a company
pub const APPLY_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    C,
    B,
    BPlus,
    A,
    APlus,
}

impl Grade {
    /// Total over every input; NaN and anything below 60 land on `C`.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::APlus
        } else if score >= 80.0 {
            Self::A
        } else if score >= 70.0 {
            Self::BPlus
        } else if score >= 60.0 {
            Self::B
        } else {
            Self::C
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::C => "C",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::APlus => "Excellent! Your CV is in the top percentile.",
            Self::A => "Great! Your CV is very competitive.",
            Self::BPlus => "Good! Your CV is above average.",
            Self::B => "Fair. Consider improving your CV.",
            Self::C => "Needs improvement. Consider revising your CV.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Clamp a service score into `[0, 100]`; non-finite scores become 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(MIN_SCORE, MAX_SCORE)
    } else {
        MIN_SCORE
    }
}
