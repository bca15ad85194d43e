use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use tracing::info;
use uuid::Uuid;

use super::findings::RISK_FACTORS;
use super::model::{QuantumMetrics, ScanResult, SecurityMetrics, ThreatLevel};

const SIGNATURE_LEN: usize = 13;
const CRITICAL_KEYWORDS: [&str; 3] = ["malware", "virus", "trojan"];

/// Fabricate a scan result for a file
///
/// The risk score is biased by keywords in the file name; everything else is
/// drawn from `rng`. Pass a seeded rng to make the output reproducible.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    file_id: Uuid,
    file_name: &str,
    file_size: u64,
) -> ScanResult {
    let risk_score = biased_risk_score(rng, file_name);
    let threat_level = ThreatLevel::from_risk_score(risk_score);
    let findings = pick_findings(rng, threat_level);
    let critical = threat_level == ThreatLevel::Critical;

    let metrics = SecurityMetrics {
        certificate_valid: !critical && rng.gen_bool(0.7),
        code_integrity: sub_score(rng, 100.0, 1.0, risk_score),
        permission_score: sub_score(rng, 85.0, 0.5, risk_score),
        network_security: sub_score(rng, 90.0, 0.3, risk_score),
        data_protection: sub_score(rng, 95.0, 0.4, risk_score),
    };

    let quantum = QuantumMetrics {
        quantum_signature: signature(rng),
        entropy_score: rng.gen_range(0..=100),
        quantum_resistant: !critical && rng.gen_bool(0.8),
    };

    info!(
        file = file_name,
        risk_score,
        threat = %threat_level,
        findings = findings.len(),
        "generated scan result"
    );

    ScanResult {
        file_id,
        file_name: file_name.to_string(),
        file_size,
        scan_time: Utc::now(),
        threat_level,
        risk_score,
        status: threat_level.status(),
        findings,
        metrics,
        quantum,
    }
}

/// [`generate`] with the thread-local rng
pub fn generate_with_thread_rng(file_id: Uuid, file_name: &str, file_size: u64) -> ScanResult {
    generate(&mut rand::thread_rng(), file_id, file_name, file_size)
}

fn biased_risk_score<R: Rng + ?Sized>(rng: &mut R, file_name: &str) -> u8 {
    let name = file_name.to_lowercase();

    // Critical keywords override every other branch
    if CRITICAL_KEYWORDS.iter().any(|k| name.contains(k)) {
        rng.gen_range(85..=100)
    } else if name.contains("bank") {
        // The high branch stops below the critical threshold
        if rng.gen_bool(0.3) {
            rng.gen_range(70..80)
        } else {
            rng.gen_range(40..70)
        }
    } else if name.contains("game") {
        if rng.gen_bool(0.2) {
            rng.gen_range(40..70)
        } else {
            rng.gen_range(0..40)
        }
    } else if name.contains("social") {
        if rng.gen_bool(0.4) {
            rng.gen_range(50..80)
        } else {
            rng.gen_range(0..50)
        }
    } else {
        rng.gen_range(0..30)
    }
}

fn pick_findings<R: Rng + ?Sized>(rng: &mut R, level: ThreatLevel) -> Vec<String> {
    let count = rng.gen_range(level.finding_range());
    let mut catalog = RISK_FACTORS;
    let (picked, _) = catalog.partial_shuffle(rng, count);
    picked.iter().map(|s| s.to_string()).collect()
}

/// `base - weight * risk + jitter`, clamped to 0-100
fn sub_score<R: Rng + ?Sized>(rng: &mut R, base: f64, weight: f64, risk_score: u8) -> u8 {
    let jitter = rng.gen_range(0.0..10.0);
    (base - weight * f64::from(risk_score) + jitter)
        .round()
        .clamp(0.0, 100.0) as u8
}

fn signature<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SIGNATURE_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ScanStatus;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn run_many(name: &str, runs: u64) -> Vec<ScanResult> {
        (0..runs)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                generate(&mut rng, Uuid::new_v4(), name, 4096)
            })
            .collect()
    }

    #[test]
    fn test_same_seed_same_result() {
        let id = Uuid::new_v4();
        let a = generate(&mut StdRng::seed_from_u64(7), id, "social_chat.apk", 10);
        let b = generate(&mut StdRng::seed_from_u64(7), id, "social_chat.apk", 10);

        assert_eq!(a.risk_score, b.risk_score);
        assert_eq!(a.findings, b.findings);
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.quantum, b.quantum);
    }

    #[test]
    fn test_critical_keywords_force_critical() {
        for name in ["malware.apk", "Free_VIRUS_cleaner.apk", "TrojanHorse.APK"] {
            for result in run_many(name, 200) {
                assert_eq!(result.threat_level, ThreatLevel::Critical, "{name}");
                assert!((85..=100).contains(&result.risk_score));
                assert!(!result.metrics.certificate_valid);
                assert!(!result.quantum.quantum_resistant);
                assert_eq!(result.status, ScanStatus::Malicious);
            }
        }
    }

    #[test]
    fn test_level_rederives_from_score() {
        for name in ["bank.apk", "game.apk", "social.apk", "virus.apk", "plain.apk"] {
            for result in run_many(name, 100) {
                assert_eq!(
                    ThreatLevel::from_risk_score(result.risk_score),
                    result.threat_level
                );
                assert_eq!(result.threat_level.status(), result.status);
            }
        }
    }

    #[test]
    fn test_findings_distinct_and_in_range() {
        for name in ["bank.apk", "game.apk", "social.apk", "trojan.apk", "notes.apk"] {
            for result in run_many(name, 100) {
                let unique: HashSet<&String> = result.findings.iter().collect();
                assert_eq!(unique.len(), result.findings.len());
                assert!(
                    result
                        .threat_level
                        .finding_range()
                        .contains(&result.findings.len())
                );
                assert!(
                    result
                        .findings
                        .iter()
                        .all(|f| RISK_FACTORS.contains(&f.as_str()))
                );
            }
        }
    }

    #[test]
    fn test_bank_is_medium_or_high() {
        let results = run_many("bank_test.apk", 300);
        for result in &results {
            assert!(
                matches!(result.threat_level, ThreatLevel::Medium | ThreatLevel::High),
                "got {:?} at {}",
                result.threat_level,
                result.risk_score
            );
            assert!((40..80).contains(&result.risk_score));
        }
        // Both branches are reachable
        assert!(results.iter().any(|r| r.risk_score >= 70));
        assert!(results.iter().any(|r| r.risk_score < 70));
    }

    #[test]
    fn test_game_and_social_ranges() {
        for result in run_many("super_game.apk", 200) {
            assert!(result.risk_score < 70);
            assert!(result.threat_level <= ThreatLevel::High);
        }
        for result in run_many("social_hub.apk", 200) {
            assert!(result.risk_score < 80);
        }
    }

    #[test]
    fn test_virus_overrides_bank() {
        for result in run_many("bank_virus.apk", 100) {
            assert_eq!(result.threat_level, ThreatLevel::Critical);
            assert!(result.risk_score >= 85);
        }
    }

    #[test]
    fn test_clean_name_is_low() {
        for result in run_many("clean_app.apk", 300) {
            assert!(result.risk_score < 30);
            assert_eq!(result.threat_level, ThreatLevel::Low);
            assert!(result.findings.len() <= 1);
        }
    }

    #[test]
    fn test_sub_scores_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            assert!(sub_score(&mut rng, 100.0, 1.0, 100) <= 10);
            assert_eq!(sub_score(&mut rng, 200.0, 0.0, 0), 100);
            assert_eq!(sub_score(&mut rng, -50.0, 0.0, 0), 0);
        }
    }

    #[test]
    fn test_signature_shape() {
        let result = generate(&mut StdRng::seed_from_u64(11), Uuid::new_v4(), "x.apk", 1);
        let sig = &result.quantum.quantum_signature;
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(
            sig.chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert!(result.quantum.entropy_score <= 100);
    }

    #[test]
    fn test_preserves_file_identity() {
        let id = Uuid::new_v4();
        let result = generate(&mut StdRng::seed_from_u64(1), id, "bank_test.apk", 10_000_000);
        assert_eq!(result.file_id, id);
        assert_eq!(result.file_name, "bank_test.apk");
        assert_eq!(result.file_size, 10_000_000);
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = generate(&mut StdRng::seed_from_u64(5), Uuid::new_v4(), "a.apk", 2048);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("fileName").is_some());
        assert!(json.get("riskScore").is_some());
        assert!(json["metrics"].get("certificateValid").is_some());
        assert!(json["quantum"].get("quantumSignature").is_some());
    }
}
