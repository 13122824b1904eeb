// Classifier trait — the boundary to the external safe-search service.
//
// The gate only ever talks to `dyn Classifier`. SafeSearchClassifier
// implements it against Google Cloud Vision; tests plug in stubs.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::image::ImageSource;

/// Likelihood tier the classifier assigns to one moderation category.
///
/// Variants are declared in ascending order so the derived `Ord` can be used
/// for threshold comparisons. UNKNOWN sorts lowest and never crosses a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl RiskLevel {
    /// Map a wire string to a level. Anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "VERY_UNLIKELY" => RiskLevel::VeryUnlikely,
            "UNLIKELY" => RiskLevel::Unlikely,
            "POSSIBLE" => RiskLevel::Possible,
            "LIKELY" => RiskLevel::Likely,
            "VERY_LIKELY" => RiskLevel::VeryLikely,
            _ => RiskLevel::Unknown,
        }
    }

    /// Strict variant of `parse` for configuration input: only known names
    /// (including the literal `UNKNOWN`) are accepted.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN" => Some(RiskLevel::Unknown),
            other => match RiskLevel::parse(other) {
                RiskLevel::Unknown => None,
                level => Some(level),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unknown => "UNKNOWN",
            RiskLevel::VeryUnlikely => "VERY_UNLIKELY",
            RiskLevel::Unlikely => "UNLIKELY",
            RiskLevel::Possible => "POSSIBLE",
            RiskLevel::Likely => "LIKELY",
            RiskLevel::VeryLikely => "VERY_LIKELY",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification result: a risk level per moderation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryScores {
    pub adult: RiskLevel,
    pub violence: RiskLevel,
    pub spoof: RiskLevel,
    pub medical: RiskLevel,
    pub racy: RiskLevel,
}

impl CategoryScores {
    /// Every category at the same level.
    pub fn uniform(level: RiskLevel) -> Self {
        Self {
            adult: level,
            violence: level,
            spoof: level,
            medical: level,
            racy: level,
        }
    }
}

impl Default for CategoryScores {
    fn default() -> Self {
        Self::uniform(RiskLevel::Unknown)
    }
}

/// Why a classification could not be completed.
///
/// None of these say anything about the content itself; the gate turns every
/// variant into a transient `Rejected(Unknown)` and never caches it.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("could not read image: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("classifier request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("classifier returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("classifier rejected the image ({code}): {message}")]
    Rejected { code: i32, message: String },

    #[error("classifier response had no safe-search annotation")]
    MalformedResponse,

    #[error("classification interrupted: {0}")]
    Interrupted(String),
}

/// External safe-search capability.
///
/// Implementations make a single attempt per call: no retries, no caching.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &ImageSource) -> Result<CategoryScores, ClassificationError>;
}
