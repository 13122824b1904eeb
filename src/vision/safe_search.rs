// Google Cloud Vision safe-search classifier.
//
// Sends the image inline (base64) to `images:annotate` with a single
// SAFE_SEARCH_DETECTION feature and maps the five likelihood strings in the
// annotation onto CategoryScores. One HTTP call per classify(); failures are
// returned as-is, never retried.
//
// API docs: https://cloud.google.com/vision/docs/detecting-safe-search

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::{CategoryScores, ClassificationError, Classifier, RiskLevel};
use crate::image::ImageSource;

pub const DEFAULT_VISION_API_URL: &str = "https://vision.googleapis.com";

/// Cloud Vision SAFE_SEARCH_DETECTION client.
pub struct SafeSearchClassifier {
    client: Client,
    base_url: String,
    api_key: String,
    rate_limiter: Option<RateLimiter>,
}

impl SafeSearchClassifier {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            rate_limiter: None,
        }
    }

    /// Space out requests to at most `requests_per_second`.
    pub fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.rate_limiter = Some(RateLimiter::new(requests_per_second));
        self
    }

    /// The key travels in the `x-goog-api-key` header, never in the URL,
    /// because reqwest errors print the full request URL.
    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.base_url)
    }
}

#[async_trait]
impl Classifier for SafeSearchClassifier {
    async fn classify(&self, image: &ImageSource) -> Result<CategoryScores, ClassificationError> {
        let bytes = image.read().await?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire().await;
        }

        let request = build_request(&bytes);
        let response = self
            .client
            .post(self.annotate_url())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|err| err.without_url())?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Api { status, body });
        }

        let body: AnnotateResponse = response.json().await.map_err(|err| err.without_url())?;
        let scores = scores_from_response(body)?;

        debug!(
            image = %image.describe(),
            adult = %scores.adult,
            violence = %scores.violence,
            spoof = %scores.spoof,
            medical = %scores.medical,
            racy = %scores.racy,
            "Classified image"
        );

        Ok(scores)
    }
}

/// Build the annotate request body for a single inline image.
pub fn build_request(bytes: &[u8]) -> AnnotateRequest {
    AnnotateRequest {
        requests: vec![AnnotateImageRequest {
            image: InlineImage {
                content: base64::engine::general_purpose::STANDARD.encode(bytes),
            },
            features: vec![Feature {
                kind: "SAFE_SEARCH_DETECTION".to_string(),
            }],
        }],
    }
}

/// Pull CategoryScores out of a decoded annotate response.
///
/// A per-image `error` wins over any partial annotation; a response with
/// neither is malformed.
pub fn scores_from_response(response: AnnotateResponse) -> Result<CategoryScores, ClassificationError> {
    let first = response
        .responses
        .into_iter()
        .next()
        .ok_or(ClassificationError::MalformedResponse)?;

    if let Some(err) = first.error {
        return Err(ClassificationError::Rejected {
            code: err.code,
            message: err.message,
        });
    }

    let annotation = first
        .safe_search_annotation
        .ok_or(ClassificationError::MalformedResponse)?;

    Ok(CategoryScores {
        adult: level(&annotation.adult),
        violence: level(&annotation.violence),
        spoof: level(&annotation.spoof),
        medical: level(&annotation.medical),
        racy: level(&annotation.racy),
    })
}

fn level(value: &Option<String>) -> RiskLevel {
    value.as_deref().map(RiskLevel::parse).unwrap_or(RiskLevel::Unknown)
}

// --- Cloud Vision request/response types ---

#[derive(Debug, Serialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateImageRequest {
    pub image: InlineImage,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub struct InlineImage {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    pub safe_search_annotation: Option<SafeSearchAnnotation>,
    pub error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
pub struct SafeSearchAnnotation {
    pub adult: Option<String>,
    pub violence: Option<String>,
    pub spoof: Option<String>,
    pub medical: Option<String>,
    pub racy: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}
