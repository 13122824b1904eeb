// The moderation gate: cache lookup -> classify on miss -> threshold -> cache write.
//
// Classification is the expensive, quota-limited step, so once a key has a
// terminal verdict (Approved or a content rejection) in the cache the
// classifier is never called for it again. Classification failures come back
// as Rejected(Unknown) and are never written, so the next call retries.
//
// There is no lock across lookup/classify/write: two concurrent first-time
// requests for the same key may both classify. Both will compute the same
// verdict and the second write is a harmless overwrite.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::policy::ThresholdPolicy;
use super::verdict::{ContentCategory, Verdict};
use crate::cache::VerdictCache;
use crate::image::{ContentKey, ImageSource};
use crate::vision::traits::{CategoryScores, ClassificationError, Classifier};

/// Tunables that sit outside the threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOptions {
    /// Write content-based rejections to the cache (Approved is always written).
    pub cache_rejections: bool,
    /// Upper bound on one classifier call. Expiry counts as a classification failure.
    pub classify_timeout: Option<Duration>,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            cache_rejections: true,
            classify_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Classifier,
    /// The classifier was called and failed; the verdict is Rejected(Unknown).
    Failed,
}

/// A verdict plus the context an auditing caller may want.
#[derive(Debug)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub source: Source,
    /// Present when a classification ran successfully.
    pub scores: Option<CategoryScores>,
    /// Present when `source` is `Failed`.
    pub failure: Option<ClassificationError>,
}

pub struct ModerationGate {
    classifier: Arc<dyn Classifier>,
    cache: Arc<dyn VerdictCache>,
    policy: ThresholdPolicy,
    options: GateOptions,
}

impl ModerationGate {
    pub fn new(classifier: Arc<dyn Classifier>, cache: Arc<dyn VerdictCache>) -> Self {
        Self {
            classifier,
            cache,
            policy: ThresholdPolicy::default(),
            options: GateOptions::default(),
        }
    }

    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_options(mut self, options: GateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn options(&self) -> &GateOptions {
        &self.options
    }

    /// Decide whether the image behind `key` may be published.
    pub async fn evaluate(&self, key: &ContentKey, image: &ImageSource) -> Verdict {
        self.inspect(key, image).await.verdict
    }

    /// Like `evaluate`, but also reports provenance, scores and failure cause.
    pub async fn inspect(&self, key: &ContentKey, image: &ImageSource) -> Evaluation {
        if let Some(verdict) = self.cached_verdict(key).await {
            debug!(key = %key, verdict = %verdict, "Cache hit");
            return Evaluation {
                verdict,
                source: Source::Cache,
                scores: None,
                failure: None,
            };
        }

        let scores = match self.classify(image).await {
            Ok(scores) => scores,
            Err(err) => {
                warn!(key = %key, image = %image.describe(), error = %err, "Classification failed");
                return Evaluation {
                    verdict: Verdict::Rejected(ContentCategory::Unknown),
                    source: Source::Failed,
                    scores: None,
                    failure: Some(err),
                };
            }
        };

        let verdict = self.policy.evaluate(&scores);
        match verdict {
            Verdict::Approved => info!(key = %key, "Image approved"),
            Verdict::Rejected(category) => {
                warn!(key = %key, category = %category, "Image rejected by content policy")
            }
        }

        if self.should_store(verdict) {
            if let Err(err) = self.cache.set(key, verdict).await {
                // The verdict stands; the next call for this key just classifies again
                warn!(key = %key, error = %err, "Failed to write verdict to cache");
            }
        }

        Evaluation {
            verdict,
            source: Source::Classifier,
            scores: Some(scores),
            failure: None,
        }
    }

    /// A usable cached verdict, if any. Backend errors degrade to a miss.
    async fn cached_verdict(&self, key: &ContentKey) -> Option<Verdict> {
        match self.cache.get(key).await {
            Ok(Some(verdict)) if verdict.is_terminal() => Some(verdict),
            Ok(Some(_)) => {
                debug!(key = %key, "Ignoring unusable cache entry");
                None
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                None
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Cache unavailable, classifying anyway");
                None
            }
        }
    }

    async fn classify(&self, image: &ImageSource) -> Result<CategoryScores, ClassificationError> {
        let call = self.classifier.classify(image);
        match self.options.classify_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                ClassificationError::Interrupted(format!("timed out after {:?}", limit))
            })?,
            None => call.await,
        }
    }

    fn should_store(&self, verdict: Verdict) -> bool {
        match verdict {
            Verdict::Approved => true,
            Verdict::Rejected(ContentCategory::Unknown) => false,
            Verdict::Rejected(_) => self.options.cache_rejections,
        }
    }
}
