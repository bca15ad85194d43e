use std::path::{Path, PathBuf};

use crate::Result;
use crate::format::format_file_size;

/// Declared media type of an Android package
pub const APK_MEDIA_TYPE: &str = "application/vnd.android.package-archive";

/// Largest APK the analysis backend accepts
pub const MAX_APK_SIZE: u64 = 50 * 1024 * 1024;

/// Anything smaller cannot be a real APK
pub const MIN_APK_SIZE: u64 = 1024;

/// A file picked by the user, before it joins the upload list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub media_type: Option<String>,
    /// Location on disk, when the selection came from the filesystem
    pub path: Option<PathBuf>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            media_type: None,
            path: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Describe a file on disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )
            .into());
        }

        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            media_type: None,
            path: Some(path.to_path_buf()),
        })
    }

    /// `.apk` suffix (any case) or the Android package media type
    pub fn is_apk(&self) -> bool {
        self.name.to_lowercase().ends_with(".apk")
            || self.media_type.as_deref() == Some(APK_MEDIA_TYPE)
    }
}

/// Problems that would make the analysis backend reject a file
pub fn validate_apk_file(file: &SelectedFile) -> Vec<String> {
    let mut errors = Vec::new();

    if !file.name.to_lowercase().ends_with(".apk") {
        errors.push("File must be an APK file (.apk extension)".to_string());
    }

    if file.size_bytes > MAX_APK_SIZE {
        errors.push(format!(
            "File size must be less than 50MB (current: {})",
            format_file_size(file.size_bytes)
        ));
    }

    if file.size_bytes < MIN_APK_SIZE {
        errors.push("File appears to be too small to be a valid APK".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_apk_by_extension() {
        assert!(SelectedFile::new("app.apk", 10).is_apk());
        assert!(SelectedFile::new("APP.APK", 10).is_apk());
        assert!(!SelectedFile::new("readme.txt", 10).is_apk());
        assert!(!SelectedFile::new("app.apk.txt", 10).is_apk());
    }

    #[test]
    fn test_is_apk_by_media_type() {
        let file = SelectedFile::new("download", 10).with_media_type(APK_MEDIA_TYPE);
        assert!(file.is_apk());

        let file = SelectedFile::new("download", 10).with_media_type("application/zip");
        assert!(!file.is_apk());
    }

    #[test]
    fn test_from_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bank_test.apk");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "bank_test.apk");
        assert_eq!(file.size_bytes, 2048);
        assert_eq!(file.path.as_deref(), Some(path.as_path()));
        assert!(file.is_apk());
    }

    #[test]
    fn test_from_path_missing() {
        let temp = TempDir::new().unwrap();
        assert!(SelectedFile::from_path(&temp.path().join("nope.apk")).is_err());
    }

    #[test]
    fn test_from_path_directory() {
        let temp = TempDir::new().unwrap();
        assert!(SelectedFile::from_path(temp.path()).is_err());
    }

    #[test]
    fn test_validate_apk_file() {
        assert!(validate_apk_file(&SelectedFile::new("ok.apk", 4096)).is_empty());

        let errors = validate_apk_file(&SelectedFile::new("notes.txt", 4096));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains(".apk"));

        let errors = validate_apk_file(&SelectedFile::new("huge.apk", MAX_APK_SIZE + 1));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("50MB"));

        let errors = validate_apk_file(&SelectedFile::new("tiny.txt", 10));
        assert_eq!(errors.len(), 2);
    }
}
