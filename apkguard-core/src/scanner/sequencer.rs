use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::{debug, info};

use super::phase::{PhaseTable, ScanPhase};
use super::progress::{ScanMessage, ScanProgressState};
use crate::clock::{Sleeper, ThreadSleeper};

/// Sequencer configuration
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Phases to run, in order
    pub phases: PhaseTable,
    /// Equal sub-steps used to interpolate progress inside a phase
    pub steps_per_phase: u32,
    /// Multiplier applied to every wait (0 = no waiting)
    pub time_scale: f64,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            phases: PhaseTable::default(),
            steps_per_phase: 20,
            time_scale: 1.0,
        }
    }
}

/// Cancellation token for stopping scans
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// How a sequencer run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed,
    Cancelled,
}

/// Drives the phase table, emitting smoothly interpolated progress
pub struct Sequencer {
    config: SequencerConfig,
    cancel_token: CancellationToken,
    sleeper: Arc<dyn Sleeper>,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            cancel_token: CancellationToken::new(),
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Run every phase on the calling thread
    ///
    /// `on_phase_change` fires at phase entry, `on_progress` at each of the
    /// `steps_per_phase + 1` sub-step boundaries of every phase. The token is
    /// checked before each sub-step; once cancelled nothing more is emitted.
    pub fn run<P, F>(&self, mut on_phase_change: P, mut on_progress: F) -> ScanOutcome
    where
        P: FnMut(usize, &str),
        F: FnMut(ScanProgressState),
    {
        let table = &self.config.phases;
        let steps = self.config.steps_per_phase.max(1);

        for (index, phase) in table.phases().iter().enumerate() {
            if self.cancel_token.is_cancelled() {
                info!(phase = index, "scan cancelled");
                return ScanOutcome::Cancelled;
            }

            debug!(phase = index, name = %phase.name, "entering scan phase");
            on_phase_change(index, &phase.name);

            let start = f64::from(table.start_progress(index));
            let end = f64::from(phase.target_progress);
            let delay = self.step_delay(phase, steps);

            for step in 0..=steps {
                if self.cancel_token.is_cancelled() {
                    info!(phase = index, step, "scan cancelled");
                    return ScanOutcome::Cancelled;
                }

                let percent = if step == steps {
                    end
                } else {
                    start + (end - start) * (f64::from(step) / f64::from(steps))
                };
                on_progress(ScanProgressState {
                    phase_index: index,
                    percent,
                });

                self.sleeper.sleep(delay);
            }
        }

        ScanOutcome::Completed
    }

    /// Run in a background thread
    /// Returns a receiver for progress messages and the thread's join handle
    pub fn spawn(self) -> (Receiver<ScanMessage>, JoinHandle<ScanOutcome>) {
        let (tx, rx) = crossbeam_channel::unbounded();

        let handle = std::thread::spawn(move || {
            let outcome = self.run(
                |index, name| {
                    let _ = tx.send(ScanMessage::PhaseStarted {
                        index,
                        name: name.to_string(),
                    });
                },
                |state| {
                    let _ = tx.send(ScanMessage::Progress(state));
                },
            );

            let _ = tx.send(match outcome {
                ScanOutcome::Completed => ScanMessage::Completed,
                ScanOutcome::Cancelled => ScanMessage::Cancelled,
            });

            outcome
        });

        (rx, handle)
    }

    fn step_delay(&self, phase: &ScanPhase, steps: u32) -> Duration {
        let delay = phase.duration / steps;
        let scale = self.config.time_scale;

        if !(scale > 0.0) || !scale.is_finite() {
            Duration::ZERO
        } else if scale == 1.0 {
            delay
        } else {
            delay.mul_f64(scale)
        }
    }
}
