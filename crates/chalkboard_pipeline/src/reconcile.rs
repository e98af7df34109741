//! Narration length versus manifest duration.
//!
//! Only an overrun beyond the tolerance is fatal; short narration is fine.

use chalkboard_core::{ReconciliationResult, Verdict};
use chalkboard_error::{ReconcileError, ReconcileErrorKind};
use std::io::Cursor;
use tracing::{debug, info, warn};

/// Allowed overrun as a fraction of the declared duration.
pub const DURATION_TOLERANCE: f64 = 0.1;

/// Measures audio length from container metadata.
pub trait DurationProbe: Send + Sync {
    /// Duration of `audio` in seconds.
    fn duration_sec(&self, audio: &[u8]) -> Result<f64, ReconcileError>;
}

/// Probe for MP3 payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp3DurationProbe;

impl DurationProbe for Mp3DurationProbe {
    fn duration_sec(&self, audio: &[u8]) -> Result<f64, ReconcileError> {
        let mut reader = Cursor::new(audio);
        mp3_duration::from_read(&mut reader)
            .map(|d| d.as_secs_f64())
            .map_err(|e| ReconcileError::new(ReconcileErrorKind::Probe(e.to_string())))
    }
}

/// Verdict for a measured duration.
///
/// # Examples
///
/// ```
/// use chalkboard_core::Verdict;
/// use chalkboard_pipeline::reconcile_measured;
///
/// assert_eq!(reconcile_measured(109.0, 100.0).verdict, Verdict::Pass);
/// assert_eq!(reconcile_measured(111.0, 100.0).verdict, Verdict::Fail);
/// assert_eq!(reconcile_measured(50.0, 100.0).verdict, Verdict::Pass);
/// ```
pub fn reconcile_measured(actual_sec: f64, declared_sec: f64) -> ReconciliationResult {
    let tolerance_sec = declared_sec * DURATION_TOLERANCE;
    let verdict = if actual_sec > declared_sec + tolerance_sec {
        Verdict::Fail
    } else {
        Verdict::Pass
    };
    ReconciliationResult {
        measured_sec: Some(actual_sec),
        declared_sec,
        tolerance_sec,
        verdict,
    }
}

/// Measure `audio` and compare it with `declared_sec`.
///
/// Empty audio means narration is disabled and yields [`Verdict::Skipped`].
/// A failing verdict is returned, not raised; see [`ensure_acceptable`].
pub fn reconcile(
    audio: &[u8],
    declared_sec: f64,
    probe: &dyn DurationProbe,
) -> Result<ReconciliationResult, ReconcileError> {
    if audio.is_empty() {
        debug!("No narration audio; skipping duration check");
        return Ok(ReconciliationResult {
            measured_sec: None,
            declared_sec,
            tolerance_sec: declared_sec * DURATION_TOLERANCE,
            verdict: Verdict::Skipped,
        });
    }

    let actual = probe.duration_sec(audio)?;
    let result = reconcile_measured(actual, declared_sec);
    match result.verdict {
        Verdict::Fail => warn!(
            actual_sec = actual,
            declared_sec,
            tolerance_sec = result.tolerance_sec,
            "Narration exceeds planned duration"
        ),
        _ => info!(
            actual_sec = actual,
            declared_sec,
            deviation_sec = result.deviation_sec(),
            "Narration duration reconciled"
        ),
    }
    Ok(result)
}

/// Turn a failing verdict into an `AudioTooLong` error.
pub fn ensure_acceptable(result: &ReconciliationResult) -> Result<(), ReconcileError> {
    if result.verdict.is_acceptable() {
        return Ok(());
    }
    Err(ReconcileError::new(ReconcileErrorKind::AudioTooLong {
        actual: result.measured_sec.unwrap_or_default(),
        declared: result.declared_sec,
        tolerance: result.tolerance_sec,
    }))
}
