//! Versioned snapshot codec for the persisted progress blob.
//!
//! The blob carries an explicit `schema_version` field instead of encoding
//! the version into the storage key, so old data is migrated on load rather
//! than silently abandoned. Versions 1 and 2 predate the envelope and used
//! the original flat field names (`step`, `xp`, `maxStreak`, `started`).

use std::collections::{BTreeMap, BTreeSet};

use chrono::DateTime;
use course_core::model::{ModuleId, Progress};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 3;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot schema version {0}")]
    UnsupportedVersion(u64),
}

#[derive(Serialize)]
struct Envelope<'a> {
    schema_version: u32,
    progress: &'a Progress,
}

/// Legacy flat layout written before the envelope existed. All fields are
/// optional; anything missing falls back to the progress defaults.
#[derive(Default, Deserialize)]
#[serde(default)]
struct LegacySnapshot {
    step: usize,
    completed: BTreeSet<ModuleId>,
    xp: u32,
    answers: BTreeMap<ModuleId, usize>,
    streak: u32,
    #[serde(rename = "maxStreak")]
    max_streak: u32,
    /// Epoch milliseconds.
    started: Option<i64>,
}

impl LegacySnapshot {
    fn into_progress(self) -> Progress {
        let mut progress = Progress {
            position: self.step,
            completed: self.completed,
            score: self.xp,
            answers: self.answers,
            streak: self.streak,
            best_streak: self.max_streak,
            ..Progress::default()
        };
        if let Some(started_at) = self.started.and_then(DateTime::from_timestamp_millis) {
            progress.started_at = started_at;
        }
        progress
    }
}

/// Serialize a progress snapshot into the current envelope.
///
/// # Errors
///
/// Returns `SnapshotError::Json` if serialization fails.
pub fn encode(progress: &Progress) -> Result<String, SnapshotError> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        progress,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Deserialize a snapshot blob of any known schema version.
///
/// Blobs without a `schema_version` field are treated as version 1. Fields
/// absent from an older shape take their defaults; fields unknown to this
/// build are ignored.
///
/// # Errors
///
/// Returns `SnapshotError::Json` for malformed JSON and
/// `SnapshotError::UnsupportedVersion` for versions newer than this build.
pub fn decode(body: &str) -> Result<Progress, SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let version = value
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(1);

    match version {
        1 | 2 => {
            let legacy: LegacySnapshot = serde_json::from_value(value)?;
            Ok(legacy.into_progress())
        }
        v if v == u64::from(SCHEMA_VERSION) => match value.get("progress") {
            Some(progress) => Ok(serde_json::from_value(progress.clone())?),
            None => Ok(Progress::default()),
        },
        other => Err(SnapshotError::UnsupportedVersion(other)),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
