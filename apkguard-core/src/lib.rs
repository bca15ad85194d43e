pub mod api;
pub mod clock;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod history;
pub mod intake;
pub mod queue;
pub mod report;
pub mod scanner;

pub use api::{ApiClient, ApiConfig, ApiError};
pub use clock::{NoopSleeper, RecordingSleeper, Sleeper, ThreadSleeper};
pub use dashboard::{Dashboard, DashboardSnapshot, Ticker, TickerConfig};
pub use error::{ApkGuardError, Result};
pub use format::{format_count, format_file_size, format_percent, risk_label};
pub use history::{HistorySummary, ScanHistory, ScanHistoryEntry};
pub use intake::{SelectedFile, validate_apk_file};
pub use queue::{FileStatus, UploadQueue, UploadedFile};
pub use report::{ScanResult, ScanStatus, ThreatLevel, generate, generate_with_thread_rng};
pub use scanner::{
    CancellationToken, PhaseTable, ScanMessage, ScanOutcome, ScanPhase, ScanProgressState,
    Sequencer, SequencerConfig,
};
