//! Timed autoplay over a [`Session`].
//!
//! A [`Player`] owns its session inside a tokio task. Every step it shows is
//! sent to the caller as a [`Frame`]; control requests travel the other way
//! over an unbounded channel, and a [`CancellationToken`] stops the task.

use crate::session::Session;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use toposcope_trace::Step;
use tracing::{debug, trace};

/// Playback settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Pause between autoplayed steps.
    pub delay: Duration,
    /// Whether to start playing immediately.
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(crate::cli::DEFAULT_DELAY_MS),
            autoplay: true,
        }
    }
}

/// A step as delivered to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Zero-based step index.
    pub index: usize,
    /// Number of steps in the trace.
    pub total: usize,
    /// The step itself.
    pub step: Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Step,
    Reset,
}

/// Handle to a running playback task.
#[derive(Debug)]
pub struct Player {
    controls: mpsc::UnboundedSender<Control>,
    cancel: CancellationToken,
    handle: JoinHandle<Session>,
}

impl Player {
    /// Spawn the playback task and return it with its frame stream.
    ///
    /// The current step is sent straight away. With `autoplay` set, the
    /// task then advances one step per `delay` until the final step, where
    /// it idles until told otherwise.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(
        session: Session,
        config: PlaybackConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (controls, control_rx) = mpsc::unbounded_channel();
        let (frame_tx, frames) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(drive(session, config, control_rx, frame_tx, cancel.clone()));

        (
            Self {
                controls,
                cancel,
                handle,
            },
            frames,
        )
    }

    /// Stop autoplay. Manual stepping still works.
    pub fn pause(&self) {
        self.send(Control::Pause);
    }

    /// Restart autoplay from the current step.
    pub fn resume(&self) {
        self.send(Control::Resume);
    }

    /// Show the next step now.
    pub fn step(&self) {
        self.send(Control::Step);
    }

    /// Go back to the first step. The play/pause state is kept.
    pub fn reset(&self) {
        self.send(Control::Reset);
    }

    /// Stop the playback task.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the task to stop and take back the session.
    ///
    /// # Errors
    ///
    /// Returns the join error if the playback task panicked.
    pub async fn finish(self) -> Result<Session, tokio::task::JoinError> {
        self.handle.await
    }

    fn send(&self, control: Control) {
        if self.controls.send(control).is_err() {
            trace!(?control, "Playback task already stopped");
        }
    }
}

/// Send the session's current step. Returns false once nobody is listening.
fn emit(session: &Session, frames: &mpsc::UnboundedSender<Frame>) -> bool {
    let Some(step) = session.current() else {
        return true;
    };
    frames
        .send(Frame {
            index: session.cursor(),
            total: session.trace().len(),
            step: step.clone(),
        })
        .is_ok()
}

async fn drive(
    mut session: Session,
    config: PlaybackConfig,
    mut controls: mpsc::UnboundedReceiver<Control>,
    frames: mpsc::UnboundedSender<Frame>,
    cancel: CancellationToken,
) -> Session {
    let mut playing = config.autoplay;
    if !emit(&session, &frames) {
        return session;
    }

    loop {
        let ticking = playing && !session.is_finished();
        let shown = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(cursor = session.cursor(), "Playback cancelled");
                break;
            }
            control = controls.recv() => match control {
                None => break,
                Some(Control::Pause) => {
                    playing = false;
                    continue;
                }
                Some(Control::Resume) => {
                    playing = true;
                    continue;
                }
                Some(Control::Step) => session.advance().is_some(),
                Some(Control::Reset) => {
                    session.reset();
                    true
                }
            },
            () = tokio::time::sleep(config.delay), if ticking => session.advance().is_some(),
        };

        if shown && !emit(&session, &frames) {
            debug!("Frame receiver dropped, stopping playback");
            break;
        }
    }

    session
}
