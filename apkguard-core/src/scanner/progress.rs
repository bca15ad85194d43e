/// Message sent from a background scan to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum ScanMessage {
    /// Entered a new phase
    PhaseStarted { index: usize, name: String },
    /// Progress update (one per sub-step)
    Progress(ScanProgressState),
    /// All phases ran to the end
    Completed,
    /// Scan was cancelled
    Cancelled,
}

/// Where a running scan currently is
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScanProgressState {
    /// Index into the phase table
    pub phase_index: usize,
    /// Overall progress, 0-100
    pub percent: f64,
}

impl ScanProgressState {
    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }
}
