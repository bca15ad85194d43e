mod phase;
mod progress;
mod sequencer;

pub use phase::{PhaseTable, ScanPhase};
pub use progress::{ScanMessage, ScanProgressState};
pub use sequencer::{CancellationToken, ScanOutcome, Sequencer, SequencerConfig};
