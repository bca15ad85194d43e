use serde::{Deserialize, Serialize};

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: String,
    pub version: String,
    #[serde(default)]
    pub dataset: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// `GET /api/statistics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_analyses: u64,
    pub malicious_detected: u64,
    pub legitimate_verified: u64,
    pub accuracy: f64,
    pub false_positives: u64,
    pub processing_speed: String,
    pub model_version: String,
    pub last_updated: String,
    pub dataset_info: DatasetInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub training_samples: u64,
    pub source: String,
    pub features: u32,
}
