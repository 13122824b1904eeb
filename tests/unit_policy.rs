// Unit tests for the threshold policy.
//
// Boundary conditions per category, priority order, and the strict/lenient
// presets. All pure functions; no gate, no cache.

use safegate::moderation::{ContentCategory, ThresholdPolicy, Verdict};
use safegate::vision::traits::{CategoryScores, RiskLevel};

fn lowest() -> CategoryScores {
    CategoryScores::uniform(RiskLevel::Unknown)
}

fn with(category: ContentCategory, level: RiskLevel) -> CategoryScores {
    let mut scores = lowest();
    match category {
        ContentCategory::Adult => scores.adult = level,
        ContentCategory::Violence => scores.violence = level,
        ContentCategory::Spoof => scores.spoof = level,
        ContentCategory::Medical => scores.medical = level,
        ContentCategory::Racy => scores.racy = level,
        ContentCategory::Unknown => {}
    }
    scores
}

// ============================================================
// Adult — strictest threshold
// ============================================================

#[test]
fn adult_possible_rejects() {
    let policy = ThresholdPolicy::strict();
    assert_eq!(
        policy.evaluate(&with(ContentCategory::Adult, RiskLevel::Possible)),
        Verdict::Rejected(ContentCategory::Adult)
    );
}

#[test]
fn adult_likely_and_very_likely_reject() {
    let policy = ThresholdPolicy::strict();
    for level in [RiskLevel::Likely, RiskLevel::VeryLikely] {
        assert_eq!(
            policy.evaluate(&with(ContentCategory::Adult, level)),
            Verdict::Rejected(ContentCategory::Adult)
        );
    }
}

#[test]
fn adult_below_possible_approves() {
    let policy = ThresholdPolicy::strict();
    for level in [RiskLevel::Unknown, RiskLevel::VeryUnlikely, RiskLevel::Unlikely] {
        assert_eq!(
            policy.evaluate(&with(ContentCategory::Adult, level)),
            Verdict::Approved,
            "adult={level}"
        );
    }
}

#[test]
fn all_lowest_approves() {
    assert_eq!(ThresholdPolicy::strict().evaluate(&lowest()), Verdict::Approved);
}

// ============================================================
// Other categories — VERY_LIKELY only
// ============================================================

#[test]
fn violence_likely_approves() {
    assert_eq!(
        ThresholdPolicy::strict().evaluate(&with(ContentCategory::Violence, RiskLevel::Likely)),
        Verdict::Approved
    );
}

#[test]
fn violence_very_likely_rejects() {
    assert_eq!(
        ThresholdPolicy::strict().evaluate(&with(ContentCategory::Violence, RiskLevel::VeryLikely)),
        Verdict::Rejected(ContentCategory::Violence)
    );
}

#[test]
fn spoof_medical_racy_reject_only_at_very_likely() {
    let policy = ThresholdPolicy::strict();
    for category in [
        ContentCategory::Spoof,
        ContentCategory::Medical,
        ContentCategory::Racy,
    ] {
        assert_eq!(
            policy.evaluate(&with(category, RiskLevel::Likely)),
            Verdict::Approved,
            "{category} at LIKELY"
        );
        assert_eq!(
            policy.evaluate(&with(category, RiskLevel::VeryLikely)),
            Verdict::Rejected(category),
            "{category} at VERY_LIKELY"
        );
    }
}

// ============================================================
// Priority order
// ============================================================

#[test]
fn adult_wins_over_violence() {
    let scores = CategoryScores {
        adult: RiskLevel::Possible,
        violence: RiskLevel::VeryLikely,
        ..lowest()
    };
    assert_eq!(
        ThresholdPolicy::strict().evaluate(&scores),
        Verdict::Rejected(ContentCategory::Adult)
    );
}

#[test]
fn priority_follows_adult_violence_spoof_medical_racy() {
    let policy = ThresholdPolicy::strict();
    let mut scores = CategoryScores::uniform(RiskLevel::VeryLikely);
    let expected = [
        ContentCategory::Adult,
        ContentCategory::Violence,
        ContentCategory::Spoof,
        ContentCategory::Medical,
        ContentCategory::Racy,
    ];

    for category in expected {
        assert_eq!(policy.evaluate(&scores), Verdict::Rejected(category));
        // Clear the winning category and the next one takes over
        match category {
            ContentCategory::Adult => scores.adult = RiskLevel::Unknown,
            ContentCategory::Violence => scores.violence = RiskLevel::Unknown,
            ContentCategory::Spoof => scores.spoof = RiskLevel::Unknown,
            ContentCategory::Medical => scores.medical = RiskLevel::Unknown,
            ContentCategory::Racy => scores.racy = RiskLevel::Unknown,
            ContentCategory::Unknown => {}
        }
    }
    assert_eq!(policy.evaluate(&scores), Verdict::Approved);
}

// ============================================================
// Presets and overrides
// ============================================================

#[test]
fn default_is_strict() {
    assert_eq!(ThresholdPolicy::default(), ThresholdPolicy::strict());
}

#[test]
fn lenient_approves_adult_likely() {
    let policy = ThresholdPolicy::lenient();
    assert_eq!(
        policy.evaluate(&with(ContentCategory::Adult, RiskLevel::Likely)),
        Verdict::Approved
    );
    assert_eq!(
        policy.evaluate(&with(ContentCategory::Adult, RiskLevel::VeryLikely)),
        Verdict::Rejected(ContentCategory::Adult)
    );
}

#[test]
fn override_tightens_a_single_category() {
    let mut policy = ThresholdPolicy::strict();
    policy.set_threshold(ContentCategory::Racy, Some(RiskLevel::Possible));
    assert_eq!(
        policy.evaluate(&with(ContentCategory::Racy, RiskLevel::Possible)),
        Verdict::Rejected(ContentCategory::Racy)
    );
    assert_eq!(
        policy.evaluate(&with(ContentCategory::Medical, RiskLevel::Possible)),
        Verdict::Approved
    );
}

#[test]
fn a_policy_never_produces_unknown() {
    let policy = ThresholdPolicy::strict();
    for level in [
        RiskLevel::Unknown,
        RiskLevel::VeryUnlikely,
        RiskLevel::Unlikely,
        RiskLevel::Possible,
        RiskLevel::Likely,
        RiskLevel::VeryLikely,
    ] {
        let verdict = policy.evaluate(&CategoryScores::uniform(level));
        assert!(!verdict.is_transient(), "uniform {level} gave {verdict}");
    }
}
