use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::report::{ScanResult, ScanStatus, ThreatLevel};

/// One past scan as shown on the analysis page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanHistoryEntry {
    pub file_name: String,
    pub scan_time: DateTime<Utc>,
    pub risk_score: u8,
    pub status: ScanStatus,
    pub threat_level: ThreatLevel,
    pub size_bytes: u64,
}

impl From<&ScanResult> for ScanHistoryEntry {
    fn from(result: &ScanResult) -> Self {
        Self {
            file_name: result.file_name.clone(),
            scan_time: result.scan_time,
            risk_score: result.risk_score,
            status: result.status,
            threat_level: result.threat_level,
            size_bytes: result.file_size,
        }
    }
}

/// Aggregate counts over the history
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistorySummary {
    pub total: usize,
    pub clean: usize,
    pub caution: usize,
    pub suspicious: usize,
    pub malicious: usize,
    pub average_risk: f64,
}

/// Past scans, most recent first
#[derive(Debug, Clone, Default)]
pub struct ScanHistory {
    entries: Vec<ScanHistoryEntry>,
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History pre-filled with the three demo entries
    pub fn with_samples(now: DateTime<Utc>) -> Self {
        let entry = |name: &str, hours: i64, risk: u8, size: u64| {
            let threat_level = ThreatLevel::from_risk_score(risk);
            ScanHistoryEntry {
                file_name: name.to_string(),
                scan_time: now - Duration::hours(hours),
                risk_score: risk,
                status: threat_level.status(),
                threat_level,
                size_bytes: size,
            }
        };

        Self {
            entries: vec![
                entry("banking_app_v2.1.apk", 1, 12, 15_938_355),
                entry("social_messenger.apk", 2, 68, 30_094_131),
                entry("game_casino.apk", 3, 89, 47_290_778),
            ],
        }
    }

    pub fn record(&mut self, result: &ScanResult) {
        self.entries.insert(0, ScanHistoryEntry::from(result));
    }

    pub fn entries(&self) -> &[ScanHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> HistorySummary {
        let mut summary = HistorySummary {
            total: self.entries.len(),
            ..Default::default()
        };

        let mut risk_total = 0u64;
        for entry in &self.entries {
            risk_total += u64::from(entry.risk_score);
            match entry.status {
                ScanStatus::Clean => summary.clean += 1,
                ScanStatus::Caution => summary.caution += 1,
                ScanStatus::Suspicious => summary.suspicious += 1,
                ScanStatus::Malicious => summary.malicious += 1,
            }
        }

        if summary.total > 0 {
            summary.average_risk = risk_total as f64 / summary.total as f64;
        }

        summary
    }
}
