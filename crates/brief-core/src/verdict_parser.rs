//! Judge response parsing.
//!
//! Parses the judge's semi-structured free text into a total [`JudgeVerdict`]:
//! ```text
//! TRUSTWORTHINESS_SCORE: 8
//! VALIDATION_STATUS: FAIL
//! ISSUES_FOUND:
//! - Report claims AWS-7 is done; inventory says In Progress.
//! REGENERATION_REQUIRED: YES
//! REGENERATION_INSTRUCTIONS: Report AWS-7 as in progress.
//! RECOMMENDATION: REGENERATE
//! ```
//!
//! Each field is parsed independently. A missing or unreadable field falls
//! back to the conservative default and is recorded in
//! `JudgeVerdict::defaulted_fields`; parsing never fails.

use brief_proto::{JudgeVerdict, Recommendation, ValidationStatus, VerdictField};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Labels recognized at the start of a line, optionally decorated with list
/// markers or markdown emphasis, and followed by `:` or `=`.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t>*#\-\d.)]*(TRUSTWORTHINESS[_ ]SCORE|VALIDATION[_ ]STATUS|REGENERATION[_ ]REQUIRED|REGENERATION[_ ]INSTRUCTIONS|RECOMMENDATION|ISSUES[_ ]FOUND)[ \t*]*[:=]",
    )
    .expect("label pattern is valid")
});

static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(INSUFFICIENT[_ ]DATA|PASS(?:ED)?|FAIL(?:ED|URE)?)\b")
        .expect("status pattern is valid")
});

static YES_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(YES|NO|TRUE|FALSE)\b").expect("yes/no pattern is valid"));

static RECOMMENDATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(APPROVED?|REGENERATE|MANUAL[_ ]REVIEW)\b")
        .expect("recommendation pattern is valid")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("number pattern is valid"));

/// Strips ANSI escape sequences from a string.
///
/// Handles CSI sequences (\x1b[...m), OSC sequences (\x1b]...\x07),
/// and simple escape sequences (\x1b followed by a single char).
fn strip_ansi(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != 0x1b {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        i += 1;
        if i >= bytes.len() {
            break;
        }

        match bytes[i] {
            b'[' => {
                // CSI: ESC [ ... final byte in 0x40-0x7E
                i += 1;
                while i < bytes.len() && !(0x40..=0x7E).contains(&bytes[i]) {
                    i += 1;
                }
                if i < bytes.len() {
                    i += 1;
                }
            }
            b']' => {
                // OSC: ESC ] ... terminated by BEL or ST
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && i + 1 < bytes.len() && bytes[i + 1] == b'\\' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    String::from_utf8_lossy(&result).into_owned()
}

/// Text regions following each recognized label.
#[derive(Debug, Default)]
struct LabeledSections<'a> {
    score: Option<&'a str>,
    status: Option<&'a str>,
    regeneration_required: Option<&'a str>,
    instructions: Option<&'a str>,
    recommendation: Option<&'a str>,
    issues: Option<&'a str>,
}

impl<'a> LabeledSections<'a> {
    /// Splits `text` at recognized labels. The first occurrence of a label wins;
    /// its section runs to the next recognized label or the end of text.
    fn split(text: &'a str) -> Self {
        let matches: Vec<(String, usize, usize)> = LABEL_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let label = caps.get(1)?;
                let normalized = label.as_str().to_ascii_uppercase().replace(' ', "_");
                Some((normalized, whole.start(), whole.end()))
            })
            .collect();

        let mut sections = Self::default();
        for (idx, (label, _, value_start)) in matches.iter().enumerate() {
            let value_end = matches
                .get(idx + 1)
                .map_or(text.len(), |(_, next_start, _)| *next_start);
            let region = &text[*value_start..value_end];

            let slot = match label.as_str() {
                "TRUSTWORTHINESS_SCORE" => &mut sections.score,
                "VALIDATION_STATUS" => &mut sections.status,
                "REGENERATION_REQUIRED" => &mut sections.regeneration_required,
                "REGENERATION_INSTRUCTIONS" => &mut sections.instructions,
                "RECOMMENDATION" => &mut sections.recommendation,
                "ISSUES_FOUND" => &mut sections.issues,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(region);
            }
        }

        sections
    }
}

/// Parser for judge responses.
#[derive(Debug, Default)]
pub struct VerdictParser;

impl VerdictParser {
    /// Parses judge text into a verdict. Never fails.
    pub fn parse(judge_text: &str) -> JudgeVerdict {
        let clean = strip_ansi(judge_text);
        let sections = LabeledSections::split(&clean);
        let mut defaulted = Vec::new();

        let trust_score = sections
            .score
            .and_then(Self::parse_score)
            .unwrap_or_else(|| {
                defaulted.push(VerdictField::TrustworthinessScore);
                JudgeVerdict::DEFAULT_TRUST_SCORE
            });

        // Fail closed: unrecognized output is never a pass.
        let status = sections
            .status
            .and_then(Self::parse_status)
            .unwrap_or_else(|| {
                defaulted.push(VerdictField::ValidationStatus);
                ValidationStatus::Fail
            });

        // Default keyed to status: anything short of PASS asks for a retry.
        let regeneration_required = sections
            .regeneration_required
            .and_then(Self::parse_yes_no)
            .unwrap_or_else(|| {
                defaulted.push(VerdictField::RegenerationRequired);
                status != ValidationStatus::Pass
            });

        let regeneration_instructions = match sections.instructions {
            Some(region) => Self::clean_block(region),
            None => {
                defaulted.push(VerdictField::RegenerationInstructions);
                String::new()
            }
        };

        let recommendation = sections
            .recommendation
            .and_then(Self::parse_recommendation)
            .unwrap_or_else(|| {
                defaulted.push(VerdictField::Recommendation);
                Recommendation::ManualReview
            });

        let issues_found = sections.issues.map(Self::clean_block).unwrap_or_default();

        if defaulted.contains(&VerdictField::ValidationStatus) {
            warn!(
                defaulted = ?defaulted,
                "Judge response had no readable VALIDATION_STATUS - treating as FAIL"
            );
        } else if !defaulted.is_empty() {
            debug!(defaulted = ?defaulted, "Judge response fields defaulted");
        }

        JudgeVerdict {
            status,
            trust_score,
            regeneration_required,
            regeneration_instructions,
            recommendation,
            issues_found,
            defaulted_fields: defaulted,
        }
    }

    /// Returns the first non-empty line of a section, stripped of markup.
    fn first_line(region: &str) -> Option<&str> {
        region
            .lines()
            .map(|line| line.trim().trim_matches(|c| c == '*' || c == '`' || c == '"').trim())
            .find(|line| !line.is_empty())
    }

    fn parse_score(region: &str) -> Option<u8> {
        let line = Self::first_line(region)?;
        let token = NUMBER_RE.find(line)?.as_str();
        // A sign and digits matched, so a parse failure means overflow.
        let value = match token.parse::<i64>() {
            Ok(n) => n,
            Err(_) if token.starts_with('-') => i64::MIN,
            Err(_) => i64::MAX,
        };
        let clamped = value.clamp(
            i64::from(JudgeVerdict::MIN_TRUST_SCORE),
            i64::from(JudgeVerdict::MAX_TRUST_SCORE),
        );
        u8::try_from(clamped).ok()
    }

    /// Reads the one keyword a value line opens with.
    ///
    /// A line that opens with anything else (`Does not pass`) or names a
    /// second alternative (`<PASS | FAIL>`) has no keyword.
    fn leading_keyword<T: PartialEq>(
        region: &str,
        pattern: &Regex,
        classify: fn(&str) -> T,
    ) -> Option<T> {
        let line = Self::first_line(region)?;
        let value = line.trim_start_matches(|c: char| {
            matches!(c, '<' | '[' | '(' | '\'') || c.is_whitespace()
        });
        let mut found = pattern.find_iter(value);
        let first = found.next().filter(|m| m.start() == 0)?;
        let keyword = classify(first.as_str());
        if found.any(|m| classify(m.as_str()) != keyword) {
            return None;
        }
        Some(keyword)
    }

    fn parse_status(region: &str) -> Option<ValidationStatus> {
        Self::leading_keyword(region, &STATUS_RE, |token| {
            let token = token.to_ascii_uppercase();
            if token.starts_with("INSUFFICIENT") {
                ValidationStatus::InsufficientData
            } else if token.starts_with("PASS") {
                ValidationStatus::Pass
            } else {
                ValidationStatus::Fail
            }
        })
    }

    fn parse_yes_no(region: &str) -> Option<bool> {
        Self::leading_keyword(region, &YES_NO_RE, |token| {
            matches!(token.to_ascii_uppercase().as_str(), "YES" | "TRUE")
        })
    }

    fn parse_recommendation(region: &str) -> Option<Recommendation> {
        Self::leading_keyword(region, &RECOMMENDATION_RE, |token| {
            let token = token.to_ascii_uppercase();
            if token.starts_with("APPROVE") {
                Recommendation::Approve
            } else if token == "REGENERATE" {
                Recommendation::Regenerate
            } else {
                Recommendation::ManualReview
            }
        })
    }

    /// Cleans a free-text section. Placeholder values such as `N/A` become empty.
    fn clean_block(region: &str) -> String {
        let trimmed = region
            .trim()
            .trim_start_matches(|c: char| c == '*' || c.is_whitespace())
            .trim_end();

        match trimmed.to_ascii_lowercase().as_str() {
            "n/a" | "na" | "none" | "-" | "none." | "n/a." => String::new(),
            _ => trimmed.to_string(),
        }
    }
}
