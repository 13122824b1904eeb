// Verdicts and their compact wire strings.
//
// The cache stores a verdict as one of seven fixed strings
// (PROPER_CONTENT, ADULT_CONTENT, ...). Mapping in both directions is
// exhaustive; an unrecognized string parses to Rejected(Unknown), which the
// gate treats as "no usable entry" rather than trusting it.

use std::fmt;

/// Reason attached to a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    Adult,
    Violence,
    Spoof,
    Medical,
    Racy,
    /// Classification could not be completed. Not a policy violation.
    Unknown,
}

impl ContentCategory {
    /// Categories in the order the policy checks them.
    pub const PRIORITY: [ContentCategory; 5] = [
        ContentCategory::Adult,
        ContentCategory::Violence,
        ContentCategory::Spoof,
        ContentCategory::Medical,
        ContentCategory::Racy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContentCategory::Adult => "adult",
            ContentCategory::Violence => "violence",
            ContentCategory::Spoof => "spoof",
            ContentCategory::Medical => "medical",
            ContentCategory::Racy => "racy",
            ContentCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of moderating one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Approved,
    Rejected(ContentCategory),
}

impl Verdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Approved)
    }

    /// True when the rejection means "could not classify" rather than
    /// "violates policy". Callers may resubmit these.
    pub fn is_transient(&self) -> bool {
        matches!(self, Verdict::Rejected(ContentCategory::Unknown))
    }

    /// Approved or a content-based rejection: safe to cache.
    pub fn is_terminal(&self) -> bool {
        !self.is_transient()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "PROPER_CONTENT",
            Verdict::Rejected(ContentCategory::Adult) => "ADULT_CONTENT",
            Verdict::Rejected(ContentCategory::Violence) => "VIOLENCE_CONTENT",
            Verdict::Rejected(ContentCategory::Spoof) => "SPOOF_CONTENT",
            Verdict::Rejected(ContentCategory::Medical) => "MEDICAL_CONTENT",
            Verdict::Rejected(ContentCategory::Racy) => "RACY_CONTENT",
            Verdict::Rejected(ContentCategory::Unknown) => "UNKNOWN_CONTENT",
        }
    }

    /// Inverse of `as_str`. Unrecognized input maps to `Rejected(Unknown)`.
    pub fn parse(s: &str) -> Self {
        match s {
            "PROPER_CONTENT" => Verdict::Approved,
            "ADULT_CONTENT" => Verdict::Rejected(ContentCategory::Adult),
            "VIOLENCE_CONTENT" => Verdict::Rejected(ContentCategory::Violence),
            "SPOOF_CONTENT" => Verdict::Rejected(ContentCategory::Spoof),
            "MEDICAL_CONTENT" => Verdict::Rejected(ContentCategory::Medical),
            "RACY_CONTENT" => Verdict::Rejected(ContentCategory::Racy),
            _ => Verdict::Rejected(ContentCategory::Unknown),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Verdict; 7] = [
        Verdict::Approved,
        Verdict::Rejected(ContentCategory::Adult),
        Verdict::Rejected(ContentCategory::Violence),
        Verdict::Rejected(ContentCategory::Spoof),
        Verdict::Rejected(ContentCategory::Medical),
        Verdict::Rejected(ContentCategory::Racy),
        Verdict::Rejected(ContentCategory::Unknown),
    ];

    #[test]
    fn test_every_verdict_parses_back() {
        for verdict in ALL {
            assert_eq!(Verdict::parse(verdict.as_str()), verdict);
        }
    }

    #[test]
    fn test_spoof_is_recognized() {
        assert_eq!(
            Verdict::parse("SPOOF_CONTENT"),
            Verdict::Rejected(ContentCategory::Spoof)
        );
    }

    #[test]
    fn test_garbage_is_unknown_not_approved() {
        assert_eq!(
            Verdict::parse("proper_content"),
            Verdict::Rejected(ContentCategory::Unknown)
        );
        assert_eq!(Verdict::parse(""), Verdict::Rejected(ContentCategory::Unknown));
    }

    #[test]
    fn test_only_unknown_is_transient() {
        for verdict in ALL {
            let expect = verdict == Verdict::Rejected(ContentCategory::Unknown);
            assert_eq!(verdict.is_transient(), expect, "{verdict}");
            assert_eq!(verdict.is_terminal(), !expect, "{verdict}");
        }
    }
}
