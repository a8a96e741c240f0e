// Download naming - pure filesystem logic, no Tauri imports.
//
// The engine performs the transfer; this module only decides where the
// file goes and why it can't go anywhere.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

const FALLBACK_FILE_NAME: &str = "download";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download directory {0} does not exist")]
    MissingDirectory(PathBuf),
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("download directory {0} is read-only")]
    ReadOnlyDirectory(PathBuf),
    #[error("no download directory is available on this system")]
    NoDownloadDirectory,
    #[error("could not inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("transfer of {0} did not complete")]
    TransferFailed(String),
}

/// A download the engine asked permission for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source: Url,
    pub file_name: String,
    pub directory: PathBuf,
}

impl DownloadRequest {
    /// `suggested` is the engine's file name, if it offered one.
    pub fn new(source: Url, suggested: Option<&str>, directory: PathBuf) -> Self {
        let file_name = match suggested.map(sanitize_file_name) {
            Some(name) if !name.is_empty() => name,
            _ => suggested_file_name(&source),
        };
        Self { source, file_name, directory }
    }

    /// Checks the destination directory and picks a free path in it.
    pub fn resolve(&self) -> Result<PathBuf, DownloadError> {
        check_directory(&self.directory)?;
        unique_download_path(&self.directory, &self.file_name)
    }
}

/// File name for a URL: its last path segment, decoded.
pub fn suggested_file_name(url: &Url) -> String {
    let last = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("");
    let decoded = urlencoding::decode(last)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| last.to_string());

    let name = sanitize_file_name(&decoded);
    if name.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        name
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed == "." || trimmed == ".." {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn check_directory(dir: &Path) -> Result<(), DownloadError> {
    let metadata = match fs::metadata(dir) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DownloadError::MissingDirectory(dir.to_path_buf()));
        }
        Err(source) => {
            return Err(DownloadError::Io { path: dir.to_path_buf(), source });
        }
    };

    if !metadata.is_dir() {
        return Err(DownloadError::NotADirectory(dir.to_path_buf()));
    }
    if metadata.permissions().readonly() {
        return Err(DownloadError::ReadOnlyDirectory(dir.to_path_buf()));
    }
    Ok(())
}

fn exists(path: &Path) -> Result<bool, DownloadError> {
    path.try_exists()
        .map_err(|source| DownloadError::Io { path: path.to_path_buf(), source })
}

/// Returns `directory/file_name`, or the first free `name (N).ext` beside it.
///
/// Nothing is created, so two calls against an unchanged directory agree.
pub fn unique_download_path(directory: &Path, file_name: &str) -> Result<PathBuf, DownloadError> {
    let candidate = directory.join(file_name);
    if !exists(&candidate)? {
        return Ok(candidate);
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter: u64 = 1;
    loop {
        let candidate = directory.join(format!("{} ({}){}", stem, counter, extension));
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            fs::write(dir.path().join(f), b"x").unwrap();
        }
        dir
    }

    #[test]
    fn test_free_name_is_used_directly() {
        let dir = dir_with(&[]);
        let path = unique_download_path(dir.path(), "report.pdf").unwrap();
        assert_eq!(path, dir.path().join("report.pdf"));
    }

    #[test]
    fn test_counter_skips_existing_copies() {
        let dir = dir_with(&["report.pdf", "report (1).pdf"]);
        let path = unique_download_path(dir.path(), "report.pdf").unwrap();
        assert_eq!(path, dir.path().join("report (2).pdf"));
    }

    #[rstest]
    #[case("notes", "notes (1)")]
    #[case("archive.tar.gz", "archive.tar (1).gz")]
    #[case(".bashrc", ".bashrc (1)")]
    fn test_extension_split(#[case] name: &str, #[case] expected: &str) {
        let dir = dir_with(&[name]);
        let path = unique_download_path(dir.path(), name).unwrap();
        assert_eq!(path, dir.path().join(expected));
    }

    #[test]
    fn test_never_returns_existing_path() {
        let mut existing = vec!["data.csv".to_string()];
        for n in 1..=12 {
            existing.push(format!("data ({}).csv", n));
        }
        let refs: Vec<&str> = existing.iter().map(String::as_str).collect();
        let dir = dir_with(&refs);

        let path = unique_download_path(dir.path(), "data.csv").unwrap();
        assert!(!path.exists());
        assert_eq!(path, dir.path().join("data (13).csv"));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let dir = dir_with(&["a.txt"]);
        let first = unique_download_path(dir.path(), "a.txt").unwrap();
        let second = unique_download_path(dir.path(), "a.txt").unwrap();
        assert_eq!(first, second);
        assert!(!first.exists());
    }

    #[test]
    fn test_gap_in_sequence_is_reused() {
        let dir = dir_with(&["img.png", "img (2).png"]);
        let path = unique_download_path(dir.path(), "img.png").unwrap();
        assert_eq!(path, dir.path().join("img (1).png"));
    }

    // --- request tests ---

    #[rstest]
    #[case("https://example.com/files/report.pdf", "report.pdf")]
    #[case("https://example.com/My%20Report.pdf?x=1", "My Report.pdf")]
    #[case("https://example.com/a/%2E%2E", "download")]
    #[case("https://example.com/a%2Fb.txt", "a_b.txt")]
    #[case("https://example.com/", "download")]
    #[case("https://example.com", "download")]
    fn test_suggested_file_name(#[case] url: &str, #[case] expected: &str) {
        let url = Url::parse(url).unwrap();
        assert_eq!(suggested_file_name(&url), expected);
    }

    #[test]
    fn test_engine_suggestion_wins() {
        let url = Url::parse("https://example.com/get?id=4").unwrap();
        let request = DownloadRequest::new(url.clone(), Some("invoice.pdf"), PathBuf::from("/tmp"));
        assert_eq!(request.file_name, "invoice.pdf");

        let request = DownloadRequest::new(url, Some(""), PathBuf::from("/tmp"));
        assert_eq!(request.file_name, "get");
    }

    #[test]
    fn test_resolve_in_missing_directory() {
        let dir = dir_with(&[]);
        let missing = dir.path().join("nope");
        let url = Url::parse("https://example.com/x.zip").unwrap();

        let err = DownloadRequest::new(url, None, missing.clone()).resolve().unwrap_err();
        assert!(matches!(err, DownloadError::MissingDirectory(p) if p == missing));
    }

    #[test]
    fn test_resolve_into_file_fails() {
        let dir = dir_with(&["plain"]);
        let url = Url::parse("https://example.com/x.zip").unwrap();

        let err = DownloadRequest::new(url, None, dir.path().join("plain")).resolve().unwrap_err();
        assert!(matches!(err, DownloadError::NotADirectory(_)));
    }

    #[test]
    fn test_resolve_in_read_only_directory() {
        let dir = dir_with(&[]);
        let mut perms = fs::metadata(dir.path()).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(dir.path(), perms.clone()).unwrap();

        let url = Url::parse("https://example.com/x.zip").unwrap();
        let result = DownloadRequest::new(url, None, dir.path().to_path_buf()).resolve();

        perms.set_readonly(false);
        fs::set_permissions(dir.path(), perms).unwrap();

        assert!(matches!(result, Err(DownloadError::ReadOnlyDirectory(_))));
    }

    #[test]
    fn test_resolve_picks_free_name() {
        let dir = dir_with(&["x.zip"]);
        let url = Url::parse("https://example.com/x.zip").unwrap();
        let path = DownloadRequest::new(url, None, dir.path().to_path_buf()).resolve().unwrap();
        assert_eq!(path, dir.path().join("x (1).zip"));
    }
}
