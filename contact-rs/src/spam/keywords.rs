//! Static spam vocabularies.
//!
//! Process-wide, immutable configuration shared read-only across all
//! concurrent evaluations. Matching is case-insensitive substring
//! matching; entries are stored lowercase.

/// Explicit and spam keywords checked against the combined free text of
/// a submission. Substring matching means short entries can fire inside
/// innocent words (e.g. "sex" inside "essex"); that false-positive risk
/// is part of the scoring contract.
pub static SPAM_KEYWORDS: &[&str] = &[
    // Explicit sexual content
    "sex", "porn", "naked", "nude", "penis", "vagina", "fuck", "fucking", "bitch",
    "whore", "slut", "cock", "dick", "pussy", "ass", "boobs", "tits", "masturbate",
    "orgasm", "erotic", "xxx", "adult", "escort", "hookup", "camgirl", "webcam",
    // Common spam patterns
    "viagra", "cialis", "casino", "lottery", "winner", "congratulations",
    "click here", "buy now", "limited time", "act now", "guaranteed",
    "make money fast", "work from home", "earn $", "free money",
    "bitcoin", "crypto", "investment opportunity", "loan", "credit repair",
    // Suspicious patterns
    "nigerian prince", "inheritance", "million dollars", "bank transfer",
    "urgent", "confidential", "selected", "beneficiary", "claim",
    "verify account", "suspended account", "update payment",
    // Link spam indicators
    "http://", "https://", "www.", ".com", ".net", ".org", "bit.ly",
    "tinyurl", "shorturl", "click", "visit", "download",
];

/// Disposable / suspicious email domains.
pub static SUSPICIOUS_DOMAINS: &[&str] = &[
    "10minutemail.com", "tempmail.org", "guerrillamail.com", "mailinator.com",
    "yopmail.com", "temp-mail.org", "getairmail.com", "maildrop.cc",
    "throwaway.email", "sharklasers.com", "grr.la", "guerrillamailblock.com", "gmx.de",
    "mail.com", "dispostable.com", "spamgourmet.com", "trashmail.com", "testform.xyz",
];
