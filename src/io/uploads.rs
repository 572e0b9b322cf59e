//! Image uploads: copied into the uploads directory under a unique,
//! sanitized name and served back by relative path.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// URL prefix under which stored uploads are referenced
pub const URL_PREFIX: &str = "/uploads/";

/// Error type for upload operations
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("could not read upload source {path}: {source}")]
    SourceError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not store upload in {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("forbidden path: {0}")]
    Forbidden(String),
    #[error("upload not found: {0}")]
    NotFound(String),
}

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("static regex"))
}

/// File name an upload is stored under: `<now_ms>_<base><ext>`, where the
/// base has every character outside `[A-Za-z0-9_-]` replaced by `_`.
pub fn stored_name(original: &str, now_ms: i64) -> String {
    let path = Path::new(original);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let base = if stem.is_empty() { "image" } else { stem };
    let base = unsafe_chars().replace_all(base, "_");
    format!("{now_ms}_{base}{ext}")
}

/// Copy `source` into `upload_dir` and return the URL path it is served at.
pub fn store_upload(upload_dir: &Path, source: &Path, now_ms: i64) -> Result<String, UploadError> {
    if !source.is_file() {
        return Err(UploadError::SourceError {
            path: source.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a file"),
        });
    }
    let original = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");
    let name = stored_name(original, now_ms);
    let write_err = |e| UploadError::WriteError {
        path: upload_dir.to_path_buf(),
        source: e,
    };
    fs::create_dir_all(upload_dir).map_err(write_err)?;
    fs::copy(source, upload_dir.join(&name)).map_err(write_err)?;
    tracing::info!(name = %name, "stored upload");
    Ok(format!("{URL_PREFIX}{name}"))
}

/// Map a request path (with or without the `/uploads/` prefix) to a file
/// inside `upload_dir`. Paths that would escape the directory are refused.
pub fn resolve_upload(upload_dir: &Path, rel: &str) -> Result<PathBuf, UploadError> {
    let rel = rel.trim_start_matches('/');
    let rel = rel.strip_prefix("uploads/").unwrap_or(rel);
    let rel_path = Path::new(rel);
    let escapes = rel_path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(UploadError::Forbidden(rel.to_string()));
    }
    let full = upload_dir.join(rel_path);
    if !full.is_file() {
        return Err(UploadError::NotFound(rel.to_string()));
    }
    Ok(full)
}

/// MIME type for a stored upload, by extension
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stored_name_sanitizes_base() {
        assert_eq!(stored_name("my photo (1).png", 42), "42_my_photo__1_.png");
        assert_eq!(stored_name("blue-sky_2.JPG", 7), "7_blue-sky_2.JPG");
    }

    #[test]
    fn stored_name_without_extension_or_base() {
        assert_eq!(stored_name("", 1), "1_image");
        assert_eq!(stored_name("noext", 1), "1_noext");
    }

    #[test]
    fn store_and_resolve() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("car pic.png");
        fs::write(&src, b"png bytes").unwrap();
        let uploads = tmp.path().join("uploads");

        let url = store_upload(&uploads, &src, 1000).unwrap();
        assert_eq!(url, "/uploads/1000_car_pic.png");

        let resolved = resolve_upload(&uploads, &url).unwrap();
        assert_eq!(fs::read(&resolved).unwrap(), b"png bytes");
        assert_eq!(content_type(&resolved), "image/png");
    }

    #[test]
    fn store_missing_source_fails() {
        let tmp = TempDir::new().unwrap();
        let err = store_upload(tmp.path(), &tmp.path().join("nope.png"), 1).unwrap_err();
        assert!(matches!(err, UploadError::SourceError { .. }));
    }

    #[test]
    fn resolve_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_upload(tmp.path(), "/uploads/../secret.txt").unwrap_err();
        assert!(matches!(err, UploadError::Forbidden(_)));
    }

    #[test]
    fn resolve_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_upload(tmp.path(), "1_x.png").unwrap_err();
        assert!(matches!(err, UploadError::NotFound(_)));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(content_type(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(content_type(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(content_type(Path::new("a")), "application/octet-stream");
    }
}
