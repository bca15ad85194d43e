use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

use crate::intake::SelectedFile;
use crate::report::ScanResult;
use crate::scanner::CancellationToken;
use crate::{ApkGuardError, Result};

/// Lifecycle of a file in the upload list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Uploaded,
    Scanning,
    Completed,
    Error,
}

impl FileStatus {
    pub fn label(self) -> &'static str {
        match self {
            FileStatus::Uploaded => "uploaded",
            FileStatus::Scanning => "scanning",
            FileStatus::Completed => "completed",
            FileStatus::Error => "error",
        }
    }
}

/// An accepted APK waiting for, undergoing, or done with a scan
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: u64,
    pub media_type: Option<String>,
    pub path: Option<PathBuf>,
    pub uploaded_at: DateTime<Utc>,
    pub status: FileStatus,
    pub result: Option<ScanResult>,
}

impl UploadedFile {
    fn from_selection(file: SelectedFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: file.name,
            size_bytes: file.size_bytes,
            media_type: file.media_type,
            path: file.path,
            uploaded_at: Utc::now(),
            status: FileStatus::Uploaded,
            result: None,
        }
    }
}

struct ActiveScan {
    file_id: Uuid,
    cancel_token: CancellationToken,
}

/// Upload list plus the single "currently scanning" pointer
///
/// At most one file is in `Scanning` at a time; `begin_scan` refuses a
/// second one.
#[derive(Default)]
pub struct UploadQueue {
    files: Vec<UploadedFile>,
    active: Option<ActiveScan>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every APK in `selection`; non-APKs are dropped
    ///
    /// Fails with [`ApkGuardError::NoApkFiles`] and adds nothing when no APK
    /// remains after filtering.
    pub fn accept<I>(&mut self, selection: I) -> Result<Vec<Uuid>>
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        let (apks, rejected): (Vec<_>, Vec<_>) =
            selection.into_iter().partition(SelectedFile::is_apk);

        for file in &rejected {
            info!(file = %file.name, "rejected non-APK selection");
        }

        if apks.is_empty() {
            return Err(ApkGuardError::NoApkFiles);
        }

        let ids = apks
            .into_iter()
            .map(|file| {
                let uploaded = UploadedFile::from_selection(file);
                info!(file = %uploaded.name, size = uploaded.size_bytes, "accepted upload");
                let id = uploaded.id;
                self.files.push(uploaded);
                id
            })
            .collect();

        Ok(ids)
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut UploadedFile> {
        self.files.iter_mut().find(|f| f.id == id)
    }

    /// File currently being scanned
    pub fn active_scan(&self) -> Option<Uuid> {
        self.active.as_ref().map(|a| a.file_id)
    }

    pub fn is_scanning(&self) -> bool {
        self.active.is_some()
    }

    /// Mark a file as scanning and hand out the token for its sequencer
    pub fn begin_scan(&mut self, id: Uuid) -> Result<CancellationToken> {
        if let Some(active) = &self.active {
            let name = self
                .get(active.file_id)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| active.file_id.to_string());
            return Err(ApkGuardError::ScanInProgress(name));
        }

        let file = self.get_mut(id).ok_or(ApkGuardError::FileNotFound(id))?;
        file.status = FileStatus::Scanning;
        file.result = None;
        info!(file = %file.name, "scan started");

        let cancel_token = CancellationToken::new();
        self.active = Some(ActiveScan {
            file_id: id,
            cancel_token: cancel_token.clone(),
        });

        Ok(cancel_token)
    }

    /// Store a finished result
    ///
    /// Returns `false` (and drops the result) if the file was removed while
    /// it was being scanned.
    pub fn complete_scan(&mut self, id: Uuid, result: ScanResult) -> bool {
        self.release(id);

        match self.get_mut(id) {
            Some(file) => {
                info!(file = %file.name, risk = result.risk_score, "scan completed");
                file.status = FileStatus::Completed;
                file.result = Some(result);
                true
            }
            None => {
                warn!(%id, "discarding result for removed file");
                false
            }
        }
    }

    /// Mark the scan as failed
    pub fn fail_scan(&mut self, id: Uuid) {
        self.release(id);
        if let Some(file) = self.get_mut(id) {
            file.status = FileStatus::Error;
        }
    }

    /// Cancel the running scan and put its file back to `Uploaded`
    pub fn abort_scan(&mut self) -> Option<Uuid> {
        let active = self.active.take()?;
        active.cancel_token.cancel();
        if let Some(file) = self.get_mut(active.file_id) {
            info!(file = %file.name, "scan aborted");
            file.status = FileStatus::Uploaded;
        }
        Some(active.file_id)
    }

    /// Remove a file; cancels its scan if it is the one running
    pub fn remove(&mut self, id: Uuid) -> Option<UploadedFile> {
        if self.active_scan() == Some(id)
            && let Some(active) = self.active.take()
        {
            active.cancel_token.cancel();
        }

        let index = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(index))
    }

    /// Remove every file, cancelling any running scan
    pub fn clear(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel_token.cancel();
        }
        self.files.clear();
    }

    fn release(&mut self, id: Uuid) {
        if self.active_scan() == Some(id) {
            self.active = None;
        }
    }
}
