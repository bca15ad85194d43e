use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordinal threat label derived from a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// `>=80` critical, `>=60` high, `>=40` medium, else low
    pub fn from_risk_score(score: u8) -> Self {
        match score {
            80.. => ThreatLevel::Critical,
            60..=79 => ThreatLevel::High,
            40..=59 => ThreatLevel::Medium,
            _ => ThreatLevel::Low,
        }
    }

    pub fn status(self) -> ScanStatus {
        match self {
            ThreatLevel::Critical => ScanStatus::Malicious,
            ThreatLevel::High => ScanStatus::Suspicious,
            ThreatLevel::Medium => ScanStatus::Caution,
            ThreatLevel::Low => ScanStatus::Clean,
        }
    }

    /// How many findings a result at this level reports
    pub fn finding_range(self) -> RangeInclusive<usize> {
        match self {
            ThreatLevel::Critical => 5..=7,
            ThreatLevel::High => 3..=5,
            ThreatLevel::Medium => 1..=3,
            ThreatLevel::Low => 0..=1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict shown for a scanned file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Clean,
    Caution,
    Suspicious,
    Malicious,
}

impl ScanStatus {
    pub fn label(self) -> &'static str {
        match self {
            ScanStatus::Clean => "CLEAN",
            ScanStatus::Caution => "CAUTION",
            ScanStatus::Suspicious => "SUSPICIOUS",
            ScanStatus::Malicious => "MALICIOUS",
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Synthetic security sub-scores, each 0-100
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMetrics {
    pub certificate_valid: bool,
    pub code_integrity: u8,
    pub permission_score: u8,
    pub network_security: u8,
    pub data_protection: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumMetrics {
    /// Opaque uppercase alphanumeric token
    pub quantum_signature: String,
    pub entropy_score: u8,
    pub quantum_resistant: bool,
}

/// Outcome of one simulated scan. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub file_id: Uuid,
    pub file_name: String,
    pub file_size: u64,
    pub scan_time: DateTime<Utc>,
    pub threat_level: ThreatLevel,
    pub risk_score: u8,
    pub status: ScanStatus,
    pub findings: Vec<String>,
    pub metrics: SecurityMetrics,
    pub quantum: QuantumMetrics,
}
