//! Structured judge verdicts.
//!
//! A verdict is always total: every field holds a value even when the judge's
//! text was malformed. Fields that fell back to a default are listed in
//! `defaulted_fields` so callers can flag low confidence.

use serde::{Deserialize, Serialize};

/// The judge's overall grounding decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Pass,
    Fail,
    InsufficientData,
    /// The judge could not be consulted at all.
    Unknown,
}

impl ValidationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Pass => "PASS",
            ValidationStatus::Fail => "FAIL",
            ValidationStatus::InsufficientData => "INSUFFICIENT_DATA",
            ValidationStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the judge recommends doing with the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Approve,
    Regenerate,
    ManualReview,
    /// Recommendation of an externally produced verdict that named none of the above.
    Unknown,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::Regenerate => "REGENERATE",
            Recommendation::ManualReview => "MANUAL_REVIEW",
            Recommendation::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The labeled fields of a judge response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictField {
    TrustworthinessScore,
    ValidationStatus,
    RegenerationRequired,
    RegenerationInstructions,
    Recommendation,
}

impl VerdictField {
    /// All fields, in the order the judge is asked to emit them.
    pub const ALL: [VerdictField; 5] = [
        VerdictField::TrustworthinessScore,
        VerdictField::ValidationStatus,
        VerdictField::RegenerationRequired,
        VerdictField::RegenerationInstructions,
        VerdictField::Recommendation,
    ];

    /// Returns the label the judge writes for this field.
    pub fn label(self) -> &'static str {
        match self {
            VerdictField::TrustworthinessScore => "TRUSTWORTHINESS_SCORE",
            VerdictField::ValidationStatus => "VALIDATION_STATUS",
            VerdictField::RegenerationRequired => "REGENERATION_REQUIRED",
            VerdictField::RegenerationInstructions => "REGENERATION_INSTRUCTIONS",
            VerdictField::Recommendation => "RECOMMENDATION",
        }
    }
}

/// Coarse trust indicator derived from the trustworthiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    High,
    Medium,
    Low,
}

impl TrustLevel {
    /// 8–10 is high, 5–7 medium, anything lower is low.
    pub fn from_score(score: u8) -> Self {
        match score {
            8.. => TrustLevel::High,
            5..=7 => TrustLevel::Medium,
            _ => TrustLevel::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrustLevel::High => "HIGH",
            TrustLevel::Medium => "MEDIUM",
            TrustLevel::Low => "LOW",
        }
    }
}

/// Structured result of one judge evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub status: ValidationStatus,

    /// Trustworthiness score, always within `1..=10`.
    pub trust_score: u8,

    pub regeneration_required: bool,

    /// Corrective guidance for the next draft. Empty when none was given.
    pub regeneration_instructions: String,

    pub recommendation: Recommendation,

    /// Free text the judge listed under `ISSUES_FOUND`, if any.
    #[serde(default)]
    pub issues_found: String,

    /// Fields that were missing or unparsable and fell back to defaults.
    #[serde(default)]
    pub defaulted_fields: Vec<VerdictField>,
}

impl JudgeVerdict {
    pub const DEFAULT_TRUST_SCORE: u8 = 5;
    pub const MIN_TRUST_SCORE: u8 = 1;
    pub const MAX_TRUST_SCORE: u8 = 10;

    /// Verdict used when the judge collaborator itself failed.
    ///
    /// Retrying is never requested: a broken judge must not hold the report back.
    pub fn judge_unavailable(reason: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Unknown,
            trust_score: Self::DEFAULT_TRUST_SCORE,
            regeneration_required: false,
            regeneration_instructions: String::new(),
            recommendation: Recommendation::ManualReview,
            issues_found: format!("Judge unavailable: {}", reason.into()),
            defaulted_fields: VerdictField::ALL.to_vec(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == ValidationStatus::Pass
    }

    pub fn trust_level(&self) -> TrustLevel {
        TrustLevel::from_score(self.trust_score)
    }

    /// Returns true if any field had to be defaulted.
    pub fn is_degraded(&self) -> bool {
        !self.defaulted_fields.is_empty()
    }
}
