//! Heuristic spam analyzer
//!
//! Scores a submission with layered heuristic groups: honeypot/timing,
//! content vocabulary, email address shape, and structural patterns.
//! Each group yields independent findings; the groups are
//! order-irrelevant and side-effect free.

use chrono::Utc;
use regex::Regex;
use std::collections::HashSet;

use super::keywords::{SPAM_KEYWORDS, SUSPICIOUS_DOMAINS};
use super::types::{HeuristicFinding, SpamAnalysis, Submission};

/// Submissions faster than this are treated as automated.
const MIN_FILL_TIME_MS: i64 = 3_000;

/// Message length bounds; outside them is a structural anomaly.
const MIN_MESSAGE_LEN: usize = 10;
const MAX_MESSAGE_LEN: usize = 2_000;

/// Heuristic spam analyzer.
///
/// Holds the compiled patterns and the immutable domain set; safe to
/// share read-only across concurrent evaluations.
pub struct SpamAnalyzer {
    suspicious_domains: HashSet<&'static str>,
    link_pattern: Regex,
    digit_run: Regex,
    noise_run: Regex,
}

impl SpamAnalyzer {
    pub fn new() -> Self {
        Self {
            suspicious_domains: SUSPICIOUS_DOMAINS.iter().copied().collect(),
            link_pattern: Regex::new(r"(http|www\.|\.com|\.net|\.org)")
                .expect("link pattern is valid"),
            digit_run: Regex::new(r"\d{5,}").expect("digit-run pattern is valid"),
            noise_run: Regex::new(r"[+\-_.]{3,}").expect("noise-run pattern is valid"),
        }
    }

    /// Analyze a submission against the current wall clock.
    pub fn analyze(&self, submission: &Submission) -> SpamAnalysis {
        self.analyze_at(submission, Utc::now().timestamp_millis())
    }

    /// Analyze a submission as of `now_ms` (epoch milliseconds). The
    /// timing heuristic compares the client-reported render timestamp
    /// against this instant.
    pub fn analyze_at(&self, submission: &Submission, now_ms: i64) -> SpamAnalysis {
        let mut findings = Vec::new();

        findings.extend(self.check_honeypot_and_timing(submission, now_ms));
        findings.extend(self.analyze_content(submission));
        findings.extend(self.analyze_email(&submission.email));
        findings.extend(self.analyze_patterns(submission));

        SpamAnalysis::from_findings(findings)
    }

    /// Honeypot and fill-time checks.
    ///
    /// The honeypot field is invisible to real users, so any non-empty
    /// value is near-certain automation. A missing render timestamp is
    /// neither penalized nor treated as legitimate.
    fn check_honeypot_and_timing(
        &self,
        submission: &Submission,
        now_ms: i64,
    ) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();

        if submission.honeypot_filled() {
            findings.push(HeuristicFinding::new(
                100,
                "Honeypot field filled (bot detected)",
            ));
        }

        if let Some(form_time) = submission.form_time.as_deref() {
            if let Ok(rendered_at) = form_time.trim().parse::<i64>() {
                let elapsed = now_ms - rendered_at;
                if elapsed < MIN_FILL_TIME_MS {
                    findings.push(HeuristicFinding::new(
                        50,
                        "Form submitted too quickly (likely bot)",
                    ));
                }
            }
        }

        findings
    }

    /// Vocabulary, link-density, and capitalization checks over the
    /// combined free text.
    fn analyze_content(&self, submission: &Submission) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();

        let combined = format!(
            "{} {} {}",
            submission.name, submission.subject, submission.message
        );
        let folded = combined.to_lowercase();

        // Substring match against the fixed vocabulary; only the highest
        // applicable tier fires.
        let keyword_matches = SPAM_KEYWORDS
            .iter()
            .filter(|keyword| folded.contains(*keyword))
            .count();

        if keyword_matches >= 5 {
            findings.push(HeuristicFinding::new(
                80,
                format!("High spam keyword density ({keyword_matches} matches)"),
            ));
        } else if keyword_matches >= 3 {
            findings.push(HeuristicFinding::new(
                40,
                format!("Moderate spam keywords detected ({keyword_matches} matches)"),
            ));
        } else if keyword_matches >= 1 {
            findings.push(HeuristicFinding::new(
                15,
                format!("Spam keywords detected ({keyword_matches} matches)"),
            ));
        }

        // Link density is scored independently of the vocabulary.
        let link_matches = self.link_pattern.find_iter(&folded).count();
        if link_matches >= 3 {
            findings.push(HeuristicFinding::new(
                40,
                format!("Multiple links detected ({link_matches})"),
            ));
        } else if link_matches >= 1 {
            findings.push(HeuristicFinding::new(15, "Links detected in message"));
        }

        // Uppercase ratio over the letters of the raw combined text.
        let letters = combined.chars().filter(|c| c.is_alphabetic()).count();
        if letters > 0 {
            let uppercase = combined.chars().filter(|c| c.is_uppercase()).count();
            if uppercase as f64 / letters as f64 > 0.5 {
                findings.push(HeuristicFinding::new(
                    25,
                    "Excessive capitalization detected",
                ));
            }
        }

        findings
    }

    /// Email shape checks. Missing or malformed addresses short-circuit;
    /// the remaining checks accumulate independently.
    fn analyze_email(&self, email: &str) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();

        if email.is_empty() {
            findings.push(HeuristicFinding::new(30, "Missing email address"));
            return findings;
        }

        if crate::utils::validate_email(email).is_err() {
            findings.push(HeuristicFinding::new(50, "Invalid email format"));
            return findings;
        }

        if let Some((_, domain)) = email.split_once('@') {
            if self
                .suspicious_domains
                .contains(domain.to_lowercase().as_str())
            {
                findings.push(HeuristicFinding::new(40, "Disposable email domain detected"));
            }
        }

        if self.digit_run.is_match(email) {
            findings.push(HeuristicFinding::new(
                20,
                "Email contains long number sequence",
            ));
        }

        if self.noise_run.is_match(email) {
            findings.push(HeuristicFinding::new(
                15,
                "Email contains suspicious character patterns",
            ));
        }

        findings
    }

    /// Structural anomalies: duplicated fields, out-of-bounds message
    /// length, repeated-character runs. Independent and additive.
    fn analyze_patterns(&self, submission: &Submission) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();

        if submission.name == submission.email || submission.name == submission.subject {
            findings.push(HeuristicFinding::new(30, "Identical fields detected"));
        }

        if !submission.message.is_empty() && submission.message.len() < MIN_MESSAGE_LEN {
            findings.push(HeuristicFinding::new(25, "Message too short"));
        }

        if submission.message.len() > MAX_MESSAGE_LEN {
            findings.push(HeuristicFinding::new(20, "Unusually long message"));
        }

        if has_repeated_run(&submission.message, 5) {
            findings.push(HeuristicFinding::new(
                25,
                "Repeated character patterns detected",
            ));
        }

        findings
    }
}

impl Default for SpamAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// True when any character repeats at least `run_len` times in a row.
fn has_repeated_run(text: &str, run_len: usize) -> bool {
    let mut previous = None;
    let mut run = 0;

    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
            if run >= run_len {
                return true;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }

    false
}
