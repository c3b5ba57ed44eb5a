use crate::draft::{ImageFormat, ImageRef};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors from the image resource store.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("not an image: {0}")]
    NotAnImage(PathBuf),

    #[error("image no longer available: {0}")]
    Missing(PathBuf),

    #[error("no usable cache directory")]
    NoCacheDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageError {
    /// Message suitable for the status line.
    pub fn user_message(&self) -> String {
        match self {
            ImageError::NotAnImage(path) => {
                format!("{} is not a PNG/JPEG/GIF/WebP image", path.display())
            }
            ImageError::Missing(path) => format!("image not found: {}", path.display()),
            ImageError::NoCacheDir => "could not find a cache directory for images".to_string(),
            ImageError::Io(e) => format!("could not read image: {e}"),
        }
    }
}

/// Sniff the image format from the leading magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::Webp)
    } else {
        None
    }
}

/// Capability for turning a user-named file into a displayable portrait and
/// releasing it again. Acquire owns a private copy so the draft never points
/// at a file the user can move or edit underneath it; release deletes that
/// copy. The TUI and tests run against this trait, not the filesystem.
pub trait ImageStore {
    /// Validate `source` as an image and register a private copy of it.
    fn acquire(&self, source: &Path) -> Result<ImageRef, ImageError>;

    /// Bytes of the acquired copy, for inlining into the printed document.
    fn read(&self, image: &ImageRef) -> Result<Vec<u8>, ImageError>;

    /// Drop the private copy. Safe to call once per acquire.
    fn release(&self, image: &ImageRef);
}

/// Filesystem-backed store keeping copies under the app cache directory.
pub struct FsImageStore {
    dir: PathBuf,
    counter: AtomicU64,
}

impl FsImageStore {
    pub fn new(dir: PathBuf) -> Result<Self, ImageError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            counter: AtomicU64::new(0),
        })
    }

    /// Store rooted at the platform cache directory.
    pub fn open_default() -> Result<Self, ImageError> {
        let dirs = directories::ProjectDirs::from("com", "resumeforge", "resume-forge")
            .ok_or(ImageError::NoCacheDir)?;
        Self::new(dirs.cache_dir().join("images"))
    }
}

impl ImageStore for FsImageStore {
    fn acquire(&self, source: &Path) -> Result<ImageRef, ImageError> {
        let bytes = match std::fs::read(source) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ImageError::Missing(source.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let format =
            sniff_format(&bytes).ok_or_else(|| ImageError::NotAnImage(source.to_path_buf()))?;

        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("portrait");
        let cached = self
            .dir
            .join(format!("{stem}-{}-{seq}.{}", std::process::id(), format.extension()));
        std::fs::write(&cached, &bytes)?;

        Ok(ImageRef {
            source: source.to_path_buf(),
            cached,
            format,
        })
    }

    fn read(&self, image: &ImageRef) -> Result<Vec<u8>, ImageError> {
        match std::fs::read(&image.cached) {
            Ok(bytes) => {
                // The copy is private, but a stale cache dir could hand us
                // anything. Re-check before inlining it into a document.
                if sniff_format(&bytes) != Some(image.format) {
                    return Err(ImageError::NotAnImage(image.cached.clone()));
                }
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ImageError::Missing(image.cached.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn release(&self, image: &ImageRef) {
        if let Err(e) = std::fs::remove_file(&image.cached) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("failed to remove cached image {}: {e}", image.cached.display());
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n rest";

    #[test]
    fn test_sniff_known_formats() {
        assert_eq!(sniff_format(PNG_MAGIC), Some(ImageFormat::Png));
        assert_eq!(
            sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(sniff_format(b"GIF89a......"), Some(ImageFormat::Gif));
        assert_eq!(sniff_format(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some(ImageFormat::Webp));
    }

    #[test]
    fn test_sniff_rejects_non_images() {
        assert_eq!(sniff_format(b"<html></html>"), None);
        assert_eq!(sniff_format(b""), None);
        assert_eq!(sniff_format(b"RIFF1234WAVE"), None);
    }

    #[test]
    fn test_fs_store_acquire_and_release() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("me.png");
        std::fs::write(&source, PNG_MAGIC).unwrap();

        let store = FsImageStore::new(tmp.path().join("cache")).unwrap();
        let image = store.acquire(&source).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert!(image.cached.exists());
        assert_eq!(store.read(&image).unwrap(), PNG_MAGIC);

        store.release(&image);
        assert!(!image.cached.exists());
    }

    #[test]
    fn test_fs_store_rejects_non_image() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("notes.txt");
        std::fs::write(&source, b"just text").unwrap();

        let store = FsImageStore::new(tmp.path().join("cache")).unwrap();
        match store.acquire(&source) {
            Err(ImageError::NotAnImage(p)) => assert_eq!(p, source),
            other => panic!("expected NotAnImage, got {other:?}"),
        }
    }

    #[test]
    fn test_fs_store_missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(tmp.path().join("cache")).unwrap();
        assert!(matches!(
            store.acquire(&tmp.path().join("gone.png")),
            Err(ImageError::Missing(_))
        ));
    }

    #[test]
    fn test_fs_store_read_detects_corrupted_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("me.png");
        std::fs::write(&source, PNG_MAGIC).unwrap();

        let store = FsImageStore::new(tmp.path().join("cache")).unwrap();
        let image = store.acquire(&source).unwrap();
        std::fs::write(&image.cached, b"overwritten").unwrap();
        assert!(matches!(
            store.read(&image),
            Err(ImageError::NotAnImage(_))
        ));
    }
}
