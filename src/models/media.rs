use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MethodError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub const ALL: [MediaType; 2] = [MediaType::Image, MediaType::Video];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = MethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            other => Err(MethodError::InvalidType(other.to_string())),
        }
    }
}

/// A directory under a base folder holding at least one media file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub count: usize,
}

impl Album {
    pub fn new(dir_name: String, media_type: MediaType, count: usize) -> Self {
        Self {
            id: dir_name.clone(),
            name: dir_name,
            media_type,
            count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub name: String,
    pub path: String,
    /// Modification time, Unix seconds
    pub date_added: i64,
    pub size: u64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Video length in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub source: PathBuf,
    pub media_type: MediaType,
    pub width: u32,
    pub height: u32,
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov"];

/// Extension allowlists for both media types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaClassifier {
    video_extensions: Vec<String>,
}

impl Default for MediaClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_EXTENSIONS.iter().map(|ext| ext.to_string()))
    }
}

impl MediaClassifier {
    pub fn new<I, S>(video_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            video_extensions: video_extensions
                .into_iter()
                .map(|ext| ext.into().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Checks the text after the last `.` of `file_name` against the allowlist.
    pub fn classify(&self, file_name: &str, media_type: MediaType) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => self.classify_extension(ext, media_type),
            None => false,
        }
    }

    pub fn classify_extension(&self, ext: &str, media_type: MediaType) -> bool {
        if ext.is_empty() {
            return false;
        }

        let ext = ext.to_ascii_lowercase();
        match media_type {
            MediaType::Image => IMAGE_EXTENSIONS.contains(&ext.as_str()),
            MediaType::Video => self.video_extensions.iter().any(|v| *v == ext),
        }
    }

    /// Named files are judged by extension alone; files without an extension
    /// by their header, restricted to the same allowlist.
    pub fn classify_path(&self, path: &Path, media_type: MediaType) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        if name.contains('.') {
            return self.classify(name, media_type);
        }

        crate::utils::sniff_extension(path)
            .map(|ext| self.classify_extension(ext, media_type))
            .unwrap_or(false)
    }
}
