//! Upload persistence for avatars and post media.
//!
//! Accepted uploads are copied out of multipart temp storage into the
//! statically served `public/` tree under an epoch-millisecond name.
//! Paths stored on accounts and posts are exactly these public paths.

use actix_multipart::form::tempfile::TempFile;

pub const AVATARS: &str = "public/avatars";
pub const MEDIA: &str = "public/media";
/// Shared fallback avatar. Never unlinked.
pub const DEFAULT_AVATAR: &str = "public/avatars/default.png";

/// Milliseconds since the Unix epoch, used to mint stored filenames.
pub fn stamp() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_millis()
}

/// Only png and jpeg uploads are stored.
pub fn accepts(file: &TempFile) -> bool {
    file.content_type
        .as_ref()
        .map(|mime| matches!(mime.essence_str(), "image/png" | "image/jpeg"))
        .unwrap_or(false)
}

fn extension(file: &TempFile) -> &'static str {
    match file.content_type.as_ref().map(|mime| mime.essence_str()) {
        Some("image/png") => ".png",
        _ => ".jpg",
    }
}

/// Copy an accepted upload into `dir`, returning its public path. A copy
/// rather than a rename, since the multipart temp dir may sit on another
/// filesystem.
pub fn persist(file: &TempFile, dir: &str) -> std::io::Result<String> {
    let path = format!("{}/{}{}", dir, stamp(), extension(file));
    std::fs::create_dir_all(dir)?;
    std::fs::copy(file.file.path(), &path)?;
    Ok(path)
}

/// Store raw bytes the same way, for media fetched rather than uploaded.
pub fn persist_bytes(bytes: &[u8], dir: &str, ext: &str) -> std::io::Result<String> {
    let path = format!("{}/{}{}", dir, stamp(), ext);
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Drop a stored file once nothing references it. Losing a race here is
/// harmless, so failures only log.
pub fn unlink(path: &str) {
    if path == DEFAULT_AVATAR {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("unlinked {}", path),
        Err(e) => log::debug!("could not unlink {}: {}", path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::ContentType;
    use std::io::Write;

    fn upload(content_type: Option<actix_web::http::header::ContentType>) -> TempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really pixels").unwrap();
        TempFile {
            file,
            content_type: content_type.map(|c| c.0),
            file_name: Some("photo".to_string()),
            size: 17,
        }
    }

    #[test]
    fn gates_on_declared_content_type() {
        assert!(accepts(&upload(Some(ContentType::png()))));
        assert!(accepts(&upload(Some(ContentType::jpeg()))));
        assert!(!accepts(&upload(Some(ContentType::plaintext()))));
        assert!(!accepts(&upload(None)));
    }

    #[test]
    fn persists_under_directory_with_matching_extension() {
        let dir = tempfile::tempdir().unwrap();
        let dir = dir.path().to_str().unwrap().to_string();
        let stored = persist(&upload(Some(ContentType::png())), &dir).unwrap();
        assert!(stored.starts_with(&dir));
        assert!(stored.ends_with(".png"));
        assert_eq!(std::fs::read(&stored).unwrap(), b"not really pixels");
    }

    #[test]
    fn unlink_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let dir = dir.path().to_str().unwrap().to_string();
        let stored = persist_bytes(b"pixels", &dir, ".jpg").unwrap();
        unlink(&stored);
        assert!(!std::path::Path::new(&stored).exists());
        unlink(&stored);
    }

    #[test]
    fn default_avatar_survives_unlink() {
        unlink(DEFAULT_AVATAR);
    }
}
