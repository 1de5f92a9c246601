use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::{DirEntry, WalkDir};

use crate::models::{Album, MediaClassifier, MediaItem, MediaType};
use crate::utils::{get_image_dimensions, video_duration};

/// Immediate children of `dir`, in OS enumeration order. An unreadable
/// directory yields nothing.
fn children(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
}

/// Regular files (no symlinks, no special files) of `dir` matching `media_type`.
fn media_files<'a>(
    dir: &Path,
    media_type: MediaType,
    classifier: &'a MediaClassifier,
) -> impl Iterator<Item = DirEntry> + 'a {
    children(dir)
        .filter(|e| e.file_type().is_file())
        .filter(move |e| classifier.classify_path(e.path(), media_type))
}

pub fn count_media(dir: &Path, media_type: MediaType, classifier: &MediaClassifier) -> usize {
    media_files(dir, media_type, classifier).count()
}

pub fn list_albums(
    base_dir: &Path,
    media_type: MediaType,
    classifier: &MediaClassifier,
) -> Vec<Album> {
    let albums: Vec<Album> = children(base_dir)
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| {
            let count = count_media(e.path(), media_type, classifier);
            if count == 0 {
                return None;
            }
            let name = e.file_name().to_string_lossy().to_string();
            Some(Album::new(name, media_type, count))
        })
        .collect();

    log::debug!(
        "Found {} {} albums in {}",
        albums.len(),
        media_type,
        base_dir.display()
    );

    albums
}

/// `ffprobe` is only run for videos; its failure leaves `duration` unset.
pub fn list_media_in_album(
    album_path: &Path,
    media_type: MediaType,
    classifier: &MediaClassifier,
    ffprobe: &str,
) -> Vec<MediaItem> {
    media_files(album_path, media_type, classifier)
        .filter_map(|e| match process_media_file(e.path(), media_type, ffprobe) {
            Ok(item) => Some(item),
            Err(err) => {
                log::warn!("Failed to read {}: {}", e.path().display(), err);
                None
            }
        })
        .collect()
}

fn process_media_file(path: &Path, media_type: MediaType, ffprobe: &str) -> Result<MediaItem> {
    let file_path = path.to_string_lossy().to_string();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let metadata = std::fs::metadata(path)?;
    let modified = chrono::DateTime::<chrono::Utc>::from(metadata.modified()?);

    let (width, height, duration) = match media_type {
        MediaType::Image => {
            let (w, h) = get_image_dimensions(path).unwrap_or((0, 0));
            (Some(w), Some(h), None)
        }
        MediaType::Video => (None, None, video_duration(path, ffprobe)),
    };

    Ok(MediaItem {
        id: file_path.clone(),
        name,
        path: file_path,
        date_added: modified.timestamp(),
        size: metadata.len(),
        media_type,
        width,
        height,
        duration,
    })
}

/// First matching file of `base_dir/album_id` in enumeration order.
pub fn first_media_in_album(
    base_dir: &Path,
    album_id: &str,
    media_type: MediaType,
    classifier: &MediaClassifier,
) -> Option<PathBuf> {
    let album_path = base_dir.join(album_id);
    media_files(&album_path, media_type, classifier)
        .next()
        .map(|e| e.into_path())
}
