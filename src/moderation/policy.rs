// Threshold policy — per-category minimum risk level that rejects.
//
// Categories are checked in a fixed priority order (adult, violence, spoof,
// medical, racy) and the first one at or above its threshold is the single
// rejection reason. A threshold of `None` disables that category.

use super::verdict::{ContentCategory, Verdict};
use crate::vision::traits::{CategoryScores, RiskLevel};

/// Configurable threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    pub adult: Option<RiskLevel>,
    pub violence: Option<RiskLevel>,
    pub spoof: Option<RiskLevel>,
    pub medical: Option<RiskLevel>,
    pub racy: Option<RiskLevel>,
}

impl ThresholdPolicy {
    /// Adult rejects on any real suspicion (POSSIBLE and up); everything else
    /// only at VERY_LIKELY.
    pub fn strict() -> Self {
        Self {
            adult: Some(RiskLevel::Possible),
            violence: Some(RiskLevel::VeryLikely),
            spoof: Some(RiskLevel::VeryLikely),
            medical: Some(RiskLevel::VeryLikely),
            racy: Some(RiskLevel::VeryLikely),
        }
    }

    /// Every category, adult included, rejects only at VERY_LIKELY.
    pub fn lenient() -> Self {
        Self {
            adult: Some(RiskLevel::VeryLikely),
            ..Self::strict()
        }
    }

    pub fn threshold(&self, category: ContentCategory) -> Option<RiskLevel> {
        match category {
            ContentCategory::Adult => self.adult,
            ContentCategory::Violence => self.violence,
            ContentCategory::Spoof => self.spoof,
            ContentCategory::Medical => self.medical,
            ContentCategory::Racy => self.racy,
            ContentCategory::Unknown => None,
        }
    }

    pub fn set_threshold(&mut self, category: ContentCategory, threshold: Option<RiskLevel>) {
        match category {
            ContentCategory::Adult => self.adult = threshold,
            ContentCategory::Violence => self.violence = threshold,
            ContentCategory::Spoof => self.spoof = threshold,
            ContentCategory::Medical => self.medical = threshold,
            ContentCategory::Racy => self.racy = threshold,
            ContentCategory::Unknown => {}
        }
    }

    /// Apply the table to a classification result.
    pub fn evaluate(&self, scores: &CategoryScores) -> Verdict {
        ContentCategory::PRIORITY
            .into_iter()
            .find(|&category| crosses(score_for(scores, category), self.threshold(category)))
            .map(Verdict::Rejected)
            .unwrap_or(Verdict::Approved)
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

pub fn score_for(scores: &CategoryScores, category: ContentCategory) -> RiskLevel {
    match category {
        ContentCategory::Adult => scores.adult,
        ContentCategory::Violence => scores.violence,
        ContentCategory::Spoof => scores.spoof,
        ContentCategory::Medical => scores.medical,
        ContentCategory::Racy => scores.racy,
        ContentCategory::Unknown => RiskLevel::Unknown,
    }
}

fn crosses(score: RiskLevel, threshold: Option<RiskLevel>) -> bool {
    // An UNKNOWN score carries no signal, even against a threshold of UNKNOWN
    match threshold {
        Some(min) => score != RiskLevel::Unknown && score >= min,
        None => false,
    }
}
