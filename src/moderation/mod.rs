// Moderation — the policy-bearing part of the crate.
//
// verdict: Verdict / ContentCategory and their cache strings
// policy:  per-category thresholds applied in priority order
// gate:    orchestration around the classifier and the cache

pub mod gate;
pub mod policy;
pub mod verdict;

pub use gate::{Evaluation, GateOptions, ModerationGate, Source};
pub use policy::ThresholdPolicy;
pub use verdict::{ContentCategory, Verdict};
