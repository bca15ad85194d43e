use std::time::Duration;

use crate::{ApkGuardError, Result};

/// One named step of the simulated scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPhase {
    /// Label shown while the phase runs
    pub name: String,
    /// How long the phase takes at time scale 1.0
    pub duration: Duration,
    /// Cumulative progress reached when the phase ends (0-100)
    pub target_progress: u8,
}

impl ScanPhase {
    pub fn new(name: impl Into<String>, duration_ms: u64, target_progress: u8) -> Self {
        Self {
            name: name.into(),
            duration: Duration::from_millis(duration_ms),
            target_progress,
        }
    }
}

/// (name, duration in ms, target progress)
const DEFAULT_PHASES: [(&str, u64, u8); 10] = [
    ("Initializing Quantum Scanner", 800, 5),
    ("Extracting APK Components", 1200, 15),
    ("Analyzing Manifest File", 1000, 25),
    ("Scanning DEX Bytecode", 1500, 40),
    ("Checking Permissions", 800, 50),
    ("Analyzing Network Calls", 1200, 65),
    ("Running Quantum Threat Detection", 2000, 80),
    ("Cross-referencing Threat Database", 1000, 90),
    ("Generating Security Report", 800, 95),
    ("Finalizing Analysis", 500, 100),
];

/// Ordered, validated list of scan phases
///
/// Targets are non-decreasing and the last one is exactly 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTable {
    phases: Vec<ScanPhase>,
}

impl PhaseTable {
    pub fn new(phases: Vec<ScanPhase>) -> Result<Self> {
        let invalid = |msg: String| Err(ApkGuardError::InvalidPhaseTable(msg));

        let Some(last) = phases.last() else {
            return invalid("table has no phases".to_string());
        };
        if last.target_progress != 100 {
            return invalid(format!(
                "last phase must end at 100%, got {}%",
                last.target_progress
            ));
        }

        let mut previous = 0;
        for phase in &phases {
            if phase.duration.is_zero() {
                return invalid(format!("phase '{}' has zero duration", phase.name));
            }
            if phase.target_progress > 100 {
                return invalid(format!(
                    "phase '{}' targets {}%",
                    phase.name, phase.target_progress
                ));
            }
            if phase.target_progress < previous {
                return invalid(format!(
                    "phase '{}' moves progress backwards ({}% < {}%)",
                    phase.name, phase.target_progress, previous
                ));
            }
            previous = phase.target_progress;
        }

        Ok(Self { phases })
    }

    pub fn phases(&self) -> &[ScanPhase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScanPhase> {
        self.phases.get(index)
    }

    /// Progress at which the phase at `index` starts
    pub fn start_progress(&self, index: usize) -> u8 {
        match index {
            0 => 0,
            i => self
                .phases
                .get(i - 1)
                .map(|p| p.target_progress)
                .unwrap_or(100),
        }
    }

    /// Sum of all phase durations
    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self {
            phases: DEFAULT_PHASES
                .iter()
                .map(|&(name, ms, target)| ScanPhase::new(name, ms, target))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = PhaseTable::default();
        assert_eq!(table.len(), 10);
        assert!(PhaseTable::new(table.phases().to_vec()).is_ok());
        assert_eq!(table.total_duration(), Duration::from_millis(10_800));
        assert_eq!(table.phases()[0].name, "Initializing Quantum Scanner");
        assert_eq!(table.phases()[9].target_progress, 100);
    }

    #[test]
    fn test_start_progress() {
        let table = PhaseTable::default();
        assert_eq!(table.start_progress(0), 0);
        assert_eq!(table.start_progress(1), 5);
        assert_eq!(table.start_progress(9), 95);
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            PhaseTable::new(Vec::new()),
            Err(ApkGuardError::InvalidPhaseTable(_))
        ));
    }

    #[test]
    fn test_rejects_table_not_ending_at_100() {
        let phases = vec![ScanPhase::new("a", 100, 40), ScanPhase::new("b", 100, 90)];
        assert!(PhaseTable::new(phases).is_err());
    }

    #[test]
    fn test_rejects_decreasing_targets() {
        let phases = vec![
            ScanPhase::new("a", 100, 60),
            ScanPhase::new("b", 100, 30),
            ScanPhase::new("c", 100, 100),
        ];
        assert!(PhaseTable::new(phases).is_err());
    }

    #[test]
    fn test_rejects_zero_duration() {
        let phases = vec![ScanPhase::new("a", 0, 100)];
        assert!(PhaseTable::new(phases).is_err());
    }

    #[test]
    fn test_accepts_flat_phase() {
        let phases = vec![
            ScanPhase::new("warmup", 100, 0),
            ScanPhase::new("work", 100, 100),
            ScanPhase::new("linger", 100, 100),
        ];
        assert!(PhaseTable::new(phases).is_ok());
    }
}
