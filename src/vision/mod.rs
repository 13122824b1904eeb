// Classifier adapter — turns an image into CategoryScores.
//
// The Classifier trait is the only thing the moderation gate depends on.
// SafeSearchClassifier implements it with Google Cloud Vision; any other
// provider that reports per-category likelihoods can be dropped in behind it.

pub mod rate_limiter;
pub mod safe_search;
pub mod traits;
