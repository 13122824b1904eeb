use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::moderation::gate::GateOptions;
use crate::moderation::policy::ThresholdPolicy;
use crate::moderation::verdict::ContentCategory;
use crate::vision::rate_limiter::RateLimiter;
use crate::vision::safe_search::DEFAULT_VISION_API_URL;
use crate::vision::traits::RiskLevel;

/// Where verdicts are cached.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheBackend {
    /// SQLite file at `db_path` (default)
    Sqlite,
    /// In-process only; forgotten on exit
    Memory,
}

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars only. A .env file is loaded by the binary at
/// startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub vision_api_key: String,
    pub vision_api_url: String,
    /// Optional client-side cap on classifier requests per second.
    pub vision_qps: Option<f64>,
    pub cache_backend: CacheBackend,
    pub db_path: String,
    pub policy: ThresholdPolicy,
    pub gate: GateOptions,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cache_backend = match lookup("SAFEGATE_CACHE").as_deref() {
            None | Some("sqlite") => CacheBackend::Sqlite,
            Some("memory") => CacheBackend::Memory,
            Some(other) => anyhow::bail!(
                "SAFEGATE_CACHE must be `sqlite` or `memory`, got `{other}`"
            ),
        };

        let mut policy = match lookup("SAFEGATE_POLICY").as_deref() {
            None | Some("strict") => ThresholdPolicy::strict(),
            Some("lenient") => ThresholdPolicy::lenient(),
            Some(other) => anyhow::bail!(
                "SAFEGATE_POLICY must be `strict` or `lenient`, got `{other}`"
            ),
        };
        for category in ContentCategory::PRIORITY {
            let var = format!("SAFEGATE_THRESHOLD_{}", category.name().to_uppercase());
            if let Some(value) = lookup(&var) {
                policy.set_threshold(category, parse_threshold(&var, &value)?);
            }
        }

        let cache_rejections = match lookup("SAFEGATE_CACHE_REJECTIONS") {
            Some(value) => parse_bool("SAFEGATE_CACHE_REJECTIONS", &value)?,
            None => true,
        };

        let classify_timeout = match lookup("SAFEGATE_CLASSIFY_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().with_context(|| {
                    format!("SAFEGATE_CLASSIFY_TIMEOUT_SECS is not a whole number: `{value}`")
                })?;
                // 0 disables the timeout
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => GateOptions::default().classify_timeout,
        };

        let vision_qps = match lookup("SAFEGATE_VISION_QPS") {
            Some(value) => {
                let qps: f64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("SAFEGATE_VISION_QPS is not a number: `{value}`"))?;
                if !(qps > 0.0 && qps.is_finite()) {
                    anyhow::bail!("SAFEGATE_VISION_QPS must be positive, got {qps}");
                }
                if RateLimiter::interval_for(qps).is_none() {
                    anyhow::bail!(
                        "SAFEGATE_VISION_QPS is too small, got {qps} (minimum one request per day)"
                    );
                }
                Some(qps)
            }
            None => None,
        };

        Ok(Self {
            vision_api_key: lookup("VISION_API_KEY").unwrap_or_default(),
            vision_api_url: lookup("VISION_API_URL")
                .unwrap_or_else(|| DEFAULT_VISION_API_URL.to_string()),
            vision_qps,
            cache_backend,
            db_path: lookup("SAFEGATE_DB_PATH").unwrap_or_else(|| "./safegate.db".to_string()),
            policy,
            gate: GateOptions {
                cache_rejections,
                classify_timeout,
            },
        })
    }

    /// Check that the Vision API key is configured.
    /// Call this before any operation that may need to classify.
    pub fn require_vision(&self) -> Result<()> {
        if self.vision_api_key.is_empty() {
            anyhow::bail!(
                "VISION_API_KEY not set. Add it to your .env file.\n\
                 It needs the Cloud Vision API enabled on its project."
            );
        }
        Ok(())
    }
}

/// `OFF` disables the category; anything else must be a risk level name.
fn parse_threshold(var: &str, value: &str) -> Result<Option<RiskLevel>> {
    if value.trim().eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    match RiskLevel::from_name(value) {
        Some(level) => Ok(Some(level)),
        None => anyhow::bail!(
            "{var} must be OFF or one of VERY_UNLIKELY, UNLIKELY, POSSIBLE, LIKELY, VERY_LIKELY; got `{value}`"
        ),
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{var} must be true or false, got `{value}`"),
    }
}
