//! Spam types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which a submission is classified as spam. This is
/// also the floor of the `medium` severity band for classified spam.
pub const SPAM_THRESHOLD: u32 = 50;

/// Score at or above which severity is `high`.
pub const HIGH_THRESHOLD: u32 = 100;

/// Score at or above which severity is raised to `medium` without the
/// submission being classified as spam on its own.
pub const ELEVATED_THRESHOLD: u32 = 25;

/// A normalized contact-form submission.
///
/// All text fields are expected to be trimmed at construction time;
/// the record is never mutated after that.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Hidden form field; humans never see it, so any value is suspect.
    pub honeypot: Option<String>,
    /// Client-reported form render time, epoch milliseconds.
    pub form_time: Option<String>,
    pub recaptcha_token: Option<String>,
}

impl Submission {
    /// True when the honeypot field carries a non-whitespace value.
    pub fn honeypot_filled(&self) -> bool {
        self.honeypot
            .as_deref()
            .map_or(false, |v| !v.trim().is_empty())
    }
}

/// One scored observation from a single heuristic rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicFinding {
    /// Score contribution, always non-negative.
    pub score: u32,
    /// Human-readable reason, for server-side diagnostics only.
    pub reason: String,
}

impl HeuristicFinding {
    pub fn new(score: u32, reason: impl Into<String>) -> Self {
        Self {
            score,
            reason: reason.into(),
        }
    }
}

/// Coarse risk band derived from a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Band a total score. Non-overlapping and ordered: `high` at or
    /// above [`HIGH_THRESHOLD`], `medium` at or above
    /// [`ELEVATED_THRESHOLD`], `low` below.
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_THRESHOLD {
            Severity::High
        } else if score >= ELEVATED_THRESHOLD {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Aggregate spam analysis for one submission.
///
/// Immutable once built; combining two partial analyses produces a new
/// merged instance rather than mutating either input.
#[derive(Debug, Clone, Serialize)]
pub struct SpamAnalysis {
    /// Sum of all finding scores.
    pub score: u32,
    /// True iff `score` crossed [`SPAM_THRESHOLD`], or a constituent
    /// analysis already declared spam.
    pub is_spam: bool,
    pub severity: Severity,
    /// Reasons in evaluation order; diagnostic only.
    pub reasons: Vec<String>,
}

impl SpamAnalysis {
    /// An empty analysis contributing nothing to a merge.
    pub fn clean() -> Self {
        Self {
            score: 0,
            is_spam: false,
            severity: Severity::Low,
            reasons: Vec::new(),
        }
    }

    /// Fold a list of findings into one analysis. Score is the sum of
    /// the finding scores, never derived from the verdict.
    pub fn from_findings(findings: Vec<HeuristicFinding>) -> Self {
        let score = findings.iter().map(|f| f.score).sum();
        let reasons = findings.into_iter().map(|f| f.reason).collect();
        Self {
            score,
            is_spam: score >= SPAM_THRESHOLD,
            severity: Severity::from_score(score),
            reasons,
        }
    }

    /// Merge two partial analyses (e.g. local heuristics and the
    /// external verification signal) into a new one.
    ///
    /// Scores add, reasons concatenate, and the verdict is the logical
    /// OR of the constituents and the merged score's own banding. The
    /// merged severity is never lower than any constituent's.
    pub fn merge(&self, other: &SpamAnalysis) -> SpamAnalysis {
        let score = self.score + other.score;
        let mut reasons = Vec::with_capacity(self.reasons.len() + other.reasons.len());
        reasons.extend_from_slice(&self.reasons);
        reasons.extend_from_slice(&other.reasons);

        SpamAnalysis {
            score,
            is_spam: self.is_spam || other.is_spam || score >= SPAM_THRESHOLD,
            severity: Severity::from_score(score)
                .max(self.severity)
                .max(other.severity),
            reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(score: u32) -> SpamAnalysis {
        SpamAnalysis::from_findings(vec![HeuristicFinding::new(score, "test")])
    }

    #[test]
    fn test_severity_banding() {
        assert_eq!(Severity::from_score(0), Severity::Low);
        assert_eq!(Severity::from_score(24), Severity::Low);
        assert_eq!(Severity::from_score(25), Severity::Medium);
        assert_eq!(Severity::from_score(49), Severity::Medium);
        assert_eq!(Severity::from_score(50), Severity::Medium);
        assert_eq!(Severity::from_score(99), Severity::Medium);
        assert_eq!(Severity::from_score(100), Severity::High);
        assert_eq!(Severity::from_score(250), Severity::High);
    }

    #[test]
    fn test_verdict_follows_spam_threshold() {
        assert!(!analysis(0).is_spam);
        assert!(!analysis(49).is_spam);
        assert!(analysis(50).is_spam);
        assert!(analysis(100).is_spam);
    }

    #[test]
    fn test_elevated_band_is_not_spam() {
        let a = analysis(30);
        assert_eq!(a.severity, Severity::Medium);
        assert!(!a.is_spam);
    }

    #[test]
    fn test_from_findings_sums_scores() {
        let a = SpamAnalysis::from_findings(vec![
            HeuristicFinding::new(15, "one"),
            HeuristicFinding::new(25, "two"),
            HeuristicFinding::new(20, "three"),
        ]);
        assert_eq!(a.score, 60);
        assert!(a.is_spam);
        assert_eq!(a.reasons, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_merge_adds_scores_and_concatenates_reasons() {
        let a = SpamAnalysis::from_findings(vec![HeuristicFinding::new(30, "local")]);
        let b = SpamAnalysis::from_findings(vec![HeuristicFinding::new(25, "external")]);
        let merged = a.merge(&b);

        assert_eq!(merged.score, 55);
        assert!(merged.is_spam);
        assert_eq!(merged.reasons, vec!["local", "external"]);
    }

    #[test]
    fn test_merge_is_commutative_in_score_and_verdict() {
        let a = analysis(40);
        let b = analysis(60);

        let ab = a.merge(&b);
        let ba = b.merge(&a);
        assert_eq!(ab.score, ba.score);
        assert_eq!(ab.is_spam, ba.is_spam);
        assert_eq!(ab.severity, ba.severity);
    }

    #[test]
    fn test_merge_is_associative_in_score_and_verdict() {
        let a = analysis(10);
        let b = analysis(20);
        let c = analysis(30);

        let left = a.merge(&b).merge(&c);
        let right = a.merge(&b.merge(&c));
        assert_eq!(left.score, right.score);
        assert_eq!(left.is_spam, right.is_spam);
        assert_eq!(left.severity, right.severity);
    }

    #[test]
    fn test_merge_severity_never_below_constituent() {
        // A constituent that already reported High keeps High after the
        // merge even though the merged band alone would say High anyway;
        // exercise the invariant through a hand-built constituent.
        let high = SpamAnalysis {
            score: 0,
            is_spam: true,
            severity: Severity::High,
            reasons: vec!["external override".to_string()],
        };
        let low = analysis(5);

        let merged = low.merge(&high);
        assert_eq!(merged.severity, Severity::High);
        assert!(merged.is_spam);
        assert_eq!(merged.score, 5);
    }

    #[test]
    fn test_merge_verdict_is_or() {
        let spammy = analysis(60);
        let clean = SpamAnalysis::clean();

        assert!(spammy.merge(&clean).is_spam);
        assert!(clean.merge(&spammy).is_spam);
        assert!(!clean.merge(&clean).is_spam);
    }

    #[test]
    fn test_clean_is_merge_identity() {
        let a = analysis(40);
        let merged = a.merge(&SpamAnalysis::clean());
        assert_eq!(merged.score, a.score);
        assert_eq!(merged.is_spam, a.is_spam);
        assert_eq!(merged.severity, a.severity);
        assert_eq!(merged.reasons, a.reasons);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Low.to_string(), "low");
        assert_eq!(Severity::Medium.to_string(), "medium");
        assert_eq!(Severity::High.to_string(), "high");
    }
}
