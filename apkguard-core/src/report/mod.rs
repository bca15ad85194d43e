mod findings;
mod generator;
mod model;

pub use findings::RISK_FACTORS;
pub use generator::{generate, generate_with_thread_rng};
pub use model::{QuantumMetrics, ScanResult, ScanStatus, SecurityMetrics, ThreatLevel};
