// Batch check pipeline: hash each file, run it through the gate, collect outcomes.
//
// Files are processed with bounded concurrency. Hashing happens here, on the
// caller side of the gate, since the gate only ever receives a ready ContentKey.

use std::path::PathBuf;

use anyhow::Context;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::image::{ContentKey, ImageSource};
use crate::moderation::gate::{Evaluation, ModerationGate, Source};

/// Result for one input file.
#[derive(Debug)]
pub struct CheckOutcome {
    pub path: PathBuf,
    /// `None` when the file could not be read to compute its key.
    pub key: Option<ContentKey>,
    pub evaluation: Option<Evaluation>,
    pub error: Option<String>,
}

/// Totals over a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckTally {
    pub approved: usize,
    pub rejected: usize,
    /// Unreadable files plus classification failures.
    pub failed: usize,
}

impl CheckTally {
    pub fn from_outcomes(outcomes: &[CheckOutcome]) -> Self {
        let mut tally = Self::default();
        for outcome in outcomes {
            match &outcome.evaluation {
                Some(eval) if eval.verdict.is_approved() => tally.approved += 1,
                Some(eval) if eval.source == Source::Failed => tally.failed += 1,
                Some(_) => tally.rejected += 1,
                None => tally.failed += 1,
            }
        }
        tally
    }
}

/// Check every path through the gate. Outcomes come back in input order.
pub async fn check_files(
    gate: &ModerationGate,
    paths: Vec<PathBuf>,
    concurrency: usize,
    show_progress: bool,
) -> Vec<CheckOutcome> {
    let pb = if show_progress {
        let pb = ProgressBar::new(paths.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  Checking [{bar:30}] {pos}/{len} ({eta})")
        {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut indexed: Vec<(usize, CheckOutcome)> =
        stream::iter(paths.into_iter().enumerate().map(|(i, path)| {
            let pb = pb.clone();
            async move {
                let outcome = check_one(gate, path).await;
                pb.inc(1);
                (i, outcome)
            }
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    pb.finish_and_clear();

    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Read the file once; the key and the classified image come from the same
/// bytes, so a file rewritten mid-check cannot be judged under a stale key.
async fn check_one(gate: &ModerationGate, path: PathBuf) -> CheckOutcome {
    let bytes = match tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
    {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Skipping unreadable file");
            return CheckOutcome {
                path,
                key: None,
                evaluation: None,
                error: Some(format!("{err:#}")),
            };
        }
    };

    let key = ContentKey::from_bytes(&bytes);
    let evaluation = gate.inspect(&key, &ImageSource::Bytes(bytes)).await;
    CheckOutcome {
        path,
        key: Some(key),
        evaluation: Some(evaluation),
        error: None,
    }
}
