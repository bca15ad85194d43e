use std::path::PathBuf;

use apkguard_core::{
    ApiClient, ApiConfig, ScanOutcome, ScanResult, SelectedFile, Sequencer, SequencerConfig,
    UploadQueue, generate, validate_apk_file,
};
use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};
use rand::rngs::StdRng;
use tracing::info;

/// Scan every accepted file in order and return the results
pub fn scan_all(
    files: &[PathBuf],
    config: &SequencerConfig,
    rng: &mut StdRng,
) -> Result<Vec<ScanResult>> {
    let selection = files
        .iter()
        .map(|path| SelectedFile::from_path(path))
        .collect::<apkguard_core::Result<Vec<_>>>()?;

    let mut queue = UploadQueue::new();
    let ids = queue.accept(selection)?;

    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        let token = queue.begin_scan(id)?;
        let outcome = Sequencer::new(config.clone())
            .with_cancellation(token)
            .run(
                |index, name| info!(phase = index, phase_name = name, "scan phase"),
                |_| {},
            );
        if outcome == ScanOutcome::Cancelled {
            queue.abort_scan();
            continue;
        }

        let Some(file) = queue.get(id) else {
            continue;
        };
        let result = generate(rng, id, &file.name, file.size_bytes);
        queue.complete_scan(id, result.clone());
        results.push(result);
    }

    Ok(results)
}

/// `--json`: print every result as one JSON array
pub fn run_json(files: &[PathBuf], config: &SequencerConfig, rng: &mut StdRng) -> Result<()> {
    if files.is_empty() {
        bail!("--json needs at least one APK file");
    }
    let results = scan_all(files, config, rng)?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// `--remote`: submit files to the analysis backend
pub fn run_remote(files: &[PathBuf], config: ApiConfig) -> Result<()> {
    if files.is_empty() {
        bail!("--remote needs at least one APK file");
    }

    let client = ApiClient::new(config).map_err(|e| eyre!(e.user_message()))?;
    let mut responses = Vec::new();

    for path in files {
        let file = SelectedFile::from_path(path)?;
        let problems = validate_apk_file(&file);
        if !problems.is_empty() {
            for problem in &problems {
                eprintln!("{}: {}", file.name, problem);
            }
            continue;
        }

        info!(file = %file.name, "submitting to analysis backend");
        let response = client
            .analyze_apk(path)
            .map_err(|e| eyre!("{}: {}", file.name, e.user_message()))?;
        responses.push(response);
    }

    if responses.is_empty() {
        bail!("no file passed validation");
    }
    println!("{}", serde_json::to_string_pretty(&responses)?);
    Ok(())
}

/// `--health`: print the backend health status
pub fn run_health(config: ApiConfig) -> Result<()> {
    let client = ApiClient::new(config).map_err(|e| eyre!(e.user_message()))?;
    let health = client
        .health_check()
        .map_err(|e| eyre!(e.user_message()))?;
    println!("{}", serde_json::to_string_pretty(&health)?);
    if !health.is_healthy() {
        bail!("backend reports status {:?}", health.status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apkguard_core::ThreatLevel;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn instant() -> SequencerConfig {
        SequencerConfig {
            time_scale: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_scan_all_skips_non_apks() {
        let dir = TempDir::new().unwrap();
        let apk = dir.path().join("trojan_dropper.apk");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&apk, vec![1u8; 2048]).unwrap();
        std::fs::write(&txt, b"hello").unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let results = scan_all(&[apk, txt], &instant(), &mut rng).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].file_name, "trojan_dropper.apk");
        assert_eq!(results[0].threat_level, ThreatLevel::Critical);
    }

    #[test]
    fn test_scan_all_rejects_selection_without_apks() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("readme.txt");
        std::fs::write(&txt, b"hello").unwrap();

        let mut rng = StdRng::seed_from_u64(12);
        let err = scan_all(&[txt], &instant(), &mut rng).unwrap_err();
        assert_eq!(err.to_string(), "Please upload valid APK files only.");
    }

    #[test]
    fn test_scan_all_is_deterministic_with_seed() {
        let dir = TempDir::new().unwrap();
        let apk = dir.path().join("social_app.apk");
        std::fs::write(&apk, vec![0u8; 1500]).unwrap();

        let a = scan_all(&[apk.clone()], &instant(), &mut StdRng::seed_from_u64(5)).unwrap();
        let b = scan_all(&[apk], &instant(), &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a[0].risk_score, b[0].risk_score);
        assert_eq!(a[0].findings, b[0].findings);
    }
}
