//! Export progress tracking and pipeline message handling.

use serde::{Deserialize, Serialize};

use kinocut_common::clock::ProgressClock;

/// Elapsed time below which no estimate is shown; early samples swing
/// too wildly to be useful.
const ETA_MIN_ELAPSED_SECS: f64 = 5.0;

/// One progress sample ready for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderProgress {
    /// Completion in `[0.0, 1.0]`.
    pub fraction: f64,

    /// Estimated seconds remaining, once the render has run long
    /// enough to trust the rate.
    pub eta_secs: Option<f64>,
}

/// Completion fraction and remaining-time estimate from a pipeline
/// position report.
///
/// The position can briefly overshoot the duration at the end of a
/// render; the fraction clamps instead of exceeding 1.0.
pub fn compute_progress(
    position_ns: u64,
    duration_ns: u64,
    elapsed_secs: f64,
) -> RenderProgress {
    if duration_ns == 0 {
        return RenderProgress {
            fraction: 0.0,
            eta_secs: None,
        };
    }
    let fraction = position_ns.min(duration_ns) as f64 / duration_ns as f64;
    let eta_secs = if elapsed_secs >= ETA_MIN_ELAPSED_SECS && position_ns > 0 {
        let total = elapsed_secs * duration_ns as f64 / position_ns as f64;
        Some((total - elapsed_secs).max(0.0))
    } else {
        None
    };
    RenderProgress { fraction, eta_secs }
}

/// Human-readable remaining time, largest two units only.
pub fn format_eta(eta_secs: f64) -> String {
    let total = eta_secs.round().max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Asynchronous reports from the export pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineMessage {
    /// The pipeline reached end of stream; the output file is complete.
    Eos,

    /// The pipeline failed.
    Error { message: String },

    /// The pipeline changed state; `playing` means actively rendering.
    StateChanged { playing: bool },
}

/// Lifecycle of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Rendering,
    Finished,
    Failed(String),
    Cancelled,
}

/// One export run: pipeline messages in, progress samples out.
///
/// The wall clock restarts whenever the pipeline enters playing, so
/// pre-roll time never skews the rate estimate.
#[derive(Debug)]
pub struct RenderSession {
    duration_ns: u64,
    state: SessionState,
    clock: ProgressClock,
}

impl RenderSession {
    pub fn new(duration_ns: u64) -> Self {
        Self {
            duration_ns,
            state: SessionState::Idle,
            clock: ProgressClock::start(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Rendering
    }

    /// Progress for the current pipeline position.
    pub fn progress(&self, position_ns: u64) -> RenderProgress {
        compute_progress(position_ns, self.duration_ns, self.clock.elapsed_secs())
    }

    /// Feed one pipeline message. Messages after a terminal state are
    /// ignored with a diagnostic.
    pub fn handle_message(&mut self, message: PipelineMessage) {
        if matches!(
            self.state,
            SessionState::Finished | SessionState::Failed(_) | SessionState::Cancelled
        ) {
            tracing::debug!(?message, "message after terminal state ignored");
            return;
        }
        match message {
            PipelineMessage::Eos => {
                tracing::info!("render finished");
                self.state = SessionState::Finished;
            }
            PipelineMessage::Error { message } => {
                tracing::error!(error = %message, "render failed");
                self.state = SessionState::Failed(message);
            }
            PipelineMessage::StateChanged { playing } => {
                if playing && self.state != SessionState::Rendering {
                    self.clock.restart();
                    self.state = SessionState::Rendering;
                }
            }
        }
    }

    /// Abort the render. The caller tears the pipeline down and deletes
    /// the partial output.
    pub fn cancel(&mut self) {
        if self.is_running() || self.state == SessionState::Idle {
            tracing::info!("render cancelled");
            self.state = SessionState::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_clamps_at_one() {
        let progress = compute_progress(1_500, 1_000, 10.0);
        assert_eq!(progress.fraction, 1.0);
    }

    #[test]
    fn zero_duration_reports_nothing() {
        let progress = compute_progress(500, 0, 10.0);
        assert_eq!(progress.fraction, 0.0);
        assert!(progress.eta_secs.is_none());
    }

    #[test]
    fn eta_appears_only_after_the_settling_window() {
        // Halfway through after 4 s: too early for an estimate.
        assert!(compute_progress(500, 1_000, 4.0).eta_secs.is_none());

        // Halfway through after 10 s: 10 more seconds to go.
        let progress = compute_progress(500, 1_000, 10.0);
        let eta = progress.eta_secs.unwrap();
        assert!((eta - 10.0).abs() < 1e-9);
    }

    #[test]
    fn eta_never_goes_negative() {
        let progress = compute_progress(2_000, 1_000, 10.0);
        assert_eq!(progress.eta_secs, Some(0.0));
    }

    #[test]
    fn eta_formatting_uses_two_units() {
        assert_eq!(format_eta(45.0), "45s");
        assert_eq!(format_eta(125.0), "2m 05s");
        assert_eq!(format_eta(3_725.0), "1h 02m");
        assert_eq!(format_eta(0.0), "0s");
    }

    #[test]
    fn session_follows_pipeline_messages() {
        let mut session = RenderSession::new(1_000);
        assert_eq!(session.state(), &SessionState::Idle);

        session.handle_message(PipelineMessage::StateChanged { playing: true });
        assert!(session.is_running());

        session.handle_message(PipelineMessage::Eos);
        assert_eq!(session.state(), &SessionState::Finished);

        // Terminal states are sticky.
        session.handle_message(PipelineMessage::Error {
            message: "late".to_string(),
        });
        assert_eq!(session.state(), &SessionState::Finished);
    }

    #[test]
    fn errors_carry_their_message() {
        let mut session = RenderSession::new(1_000);
        session.handle_message(PipelineMessage::StateChanged { playing: true });
        session.handle_message(PipelineMessage::Error {
            message: "disk full".to_string(),
        });
        assert_eq!(session.state(), &SessionState::Failed("disk full".to_string()));
    }

    #[test]
    fn cancel_is_terminal() {
        let mut session = RenderSession::new(1_000);
        session.handle_message(PipelineMessage::StateChanged { playing: true });
        session.cancel();
        assert_eq!(session.state(), &SessionState::Cancelled);
        session.handle_message(PipelineMessage::Eos);
        assert_eq!(session.state(), &SessionState::Cancelled);
    }
}
