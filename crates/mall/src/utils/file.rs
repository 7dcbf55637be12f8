use chrono::{Local, NaiveDate};
use image::{ImageFormat, imageops::FilterType};
use shared::errors::ServiceError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const THUMBNAIL_PREFIX: &str = "s_";
const THUMBNAIL_RATIO: u32 = 3;

// `s_` + uuid + `_` + client name must fit a 255 byte file name
const MAX_FILE_NAME_BYTES: usize = 255;
const MAX_CLIENT_NAME_BYTES: usize = MAX_FILE_NAME_BYTES - THUMBNAIL_PREFIX.len() - 37;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("invalid path component: {0:?}")]
    InvalidPath(String),

    #[error("uploaded file is empty")]
    Empty,

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("thumbnail error: {0}")]
    Thumbnail(#[from] image::ImageError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<FileError> for ServiceError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound(name) => ServiceError::NotFound(name),
            FileError::InvalidPath(_) | FileError::Empty | FileError::Thumbnail(_) => {
                ServiceError::Validation(vec![err.to_string()])
            }
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Date-bucketed upload directory: `{root}/{yyyy}/{MM}/{dd}/{uuid}_{name}`,
/// with an `s_` thumbnail next to every image.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn date_folder() -> String {
        Self::date_folder_for(Local::now().date_naive())
    }

    pub fn date_folder_for(date: NaiveDate) -> String {
        date.format("%Y/%m/%d").to_string()
    }

    fn folder_path(&self, date_folder: &str) -> Result<PathBuf, FileError> {
        let mut path = self.root.clone();
        for part in date_folder.split('/') {
            check_component(part, date_folder)?;
            path.push(part);
        }
        Ok(path)
    }

    fn file_path(&self, date_folder: &str, file_name: &str) -> Result<PathBuf, FileError> {
        check_component(file_name, file_name)?;
        Ok(self.folder_path(date_folder)?.join(file_name))
    }

    /// Stores `bytes` under `date_folder` and returns the generated file
    /// name. Nothing is left on disk when any step fails.
    pub async fn upload_file(
        &self,
        date_folder: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, FileError> {
        if bytes.is_empty() {
            return Err(FileError::Empty);
        }

        let client_name = client_file_name(original_name)?;
        let dir = self.folder_path(date_folder)?;
        tokio::fs::create_dir_all(&dir).await?;

        let stored_name = format!("{}_{}", Uuid::new_v4(), client_name);
        let target = dir.join(&stored_name);

        tokio::fs::write(&target, bytes).await?;
        debug!("📁 Stored upload at {}", target.display());

        if let Some(format) = thumbnail_format(&stored_name) {
            let thumb = dir.join(format!("{THUMBNAIL_PREFIX}{stored_name}"));
            let source = bytes.to_vec();
            let thumb_target = thumb.clone();

            let result = tokio::task::spawn_blocking(move || write_thumbnail(&source, &thumb_target, format))
                .await
                .map_err(FileError::from)
                .and_then(|r| r);

            if let Err(e) = result {
                error!("❌ Thumbnail generation failed for {stored_name}: {e}");
                remove_quietly(&target).await;
                remove_quietly(&thumb).await;
                return Err(e);
            }
        } else if is_image(&stored_name) {
            info!("🖼️ No thumbnail for {stored_name}, format is not supported");
        }

        info!("✅ Uploaded {original_name} as {date_folder}/{stored_name}");
        Ok(stored_name)
    }

    pub async fn get_file(&self, date_folder: &str, file_name: &str) -> Result<StoredFile, FileError> {
        let path = self.file_path(date_folder, file_name)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileError::NotFound(format!("{date_folder}/{file_name}")));
            }
            Err(e) => return Err(e.into()),
        };

        let content_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string();

        Ok(StoredFile {
            bytes,
            content_type,
        })
    }

    /// Removes a stored file and its thumbnail. Files already gone are not
    /// an error.
    pub async fn delete(&self, date_folder: &str, file_name: &str) -> Result<(), FileError> {
        let path = self.file_path(date_folder, file_name)?;
        let thumb = self.file_path(date_folder, &format!("{THUMBNAIL_PREFIX}{file_name}"))?;

        for target in [path, thumb] {
            match tokio::fs::remove_file(&target).await {
                Ok(()) => debug!("🗑️ Removed {}", target.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}

fn check_component(part: &str, whole: &str) -> Result<(), FileError> {
    let bad = part.is_empty()
        || part == "."
        || part == ".."
        || part.contains('\\')
        || part.contains('/')
        || part.contains('\0')
        || part.contains(':');

    if bad {
        warn!("🚫 Rejected path {whole:?}");
        return Err(FileError::InvalidPath(whole.to_string()));
    }
    Ok(())
}

/// Keeps only the final path component of a client-supplied name.
fn client_file_name(original_name: &str) -> Result<String, FileError> {
    let name = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    check_component(name, original_name)?;
    Ok(shorten(name, MAX_CLIENT_NAME_BYTES))
}

/// Cuts the stem of an over-long name on a char boundary, keeping the
/// extension when it fits.
fn shorten(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() + 1 < max => (stem, Some(ext)),
        _ => (name, None),
    };
    let budget = max - ext.map_or(0, |e| e.len() + 1);

    let mut cut = budget.min(stem.len());
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }

    match ext {
        Some(ext) => format!("{}.{ext}", &stem[..cut]),
        None => stem[..cut].to_string(),
    }
}

fn is_image(file_name: &str) -> bool {
    mime_guess::from_path(file_name)
        .first()
        .is_some_and(|mime| mime.type_() == mime_guess::mime::IMAGE)
}

/// Formats the `image` build here can both decode and encode. Other images
/// (svg, tiff, ico, ...) are stored without a thumbnail.
fn thumbnail_format(file_name: &str) -> Option<ImageFormat> {
    if !is_image(file_name) {
        return None;
    }
    ImageFormat::from_path(file_name)
        .ok()
        .filter(|format| format.reading_enabled() && format.writing_enabled())
}

fn write_thumbnail(source: &[u8], target: &Path, format: ImageFormat) -> Result<(), FileError> {
    let img = image::load_from_memory(source)?;
    let width = (img.width() / THUMBNAIL_RATIO).max(1);
    let height = (img.height() / THUMBNAIL_RATIO).max(1);

    let thumb = img.resize_exact(width, height, FilterType::Triangle);
    thumb.save_with_format(target, format)?;
    Ok(())
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to clean up {}: {e}", path.display());
    }
}
