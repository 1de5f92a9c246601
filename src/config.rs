use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{MediaClassifier, DEFAULT_VIDEO_EXTENSIONS};

/// Largest thumbnail edge a caller or config may ask for, in pixels.
pub const MAX_THUMBNAIL_DIMENSION: u32 = 4096;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginConfig {
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default = "default_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_width: u32,
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_height: u32,
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
    /// Overrides the OS Pictures lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pictures_dir: Option<PathBuf>,
    /// Overrides the OS Videos lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos_dir: Option<PathBuf>,
}

fn default_quality() -> u8 {
    90
}

fn default_video_extensions() -> Vec<String> {
    DEFAULT_VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_thumbnail_size() -> u32 {
    200
}

fn default_ffmpeg_path() -> String {
    String::from("ffmpeg")
}

fn default_ffprobe_path() -> String {
    String::from("ffprobe")
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Png,
            jpeg_quality: default_quality(),
            video_extensions: default_video_extensions(),
            thumbnail_width: default_thumbnail_size(),
            thumbnail_height: default_thumbnail_size(),
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            pictures_dir: None,
            videos_dir: None,
        }
    }
}

impl PluginConfig {
    /// Load `<config_dir>/photo-gallery/config.toml`, or defaults if there is none.
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::debug!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: PluginConfig = toml::from_str(contents)?;
        Ok(config.normalized())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Clamp values into their usable ranges.
    pub fn normalized(mut self) -> Self {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self.thumbnail_width = self.thumbnail_width.clamp(1, MAX_THUMBNAIL_DIMENSION);
        self.thumbnail_height = self.thumbnail_height.clamp(1, MAX_THUMBNAIL_DIMENSION);
        self.video_extensions = self
            .video_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn classifier(&self) -> MediaClassifier {
        MediaClassifier::new(self.video_extensions.iter().cloned())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot find config directory"))?;
    Ok(config_dir.join("photo-gallery").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let config = PluginConfig::from_toml("").expect("parse");
        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.thumbnail_width, 200);
    }

    #[test]
    fn values_are_normalized() {
        let config = PluginConfig::from_toml(
            r#"
            output_format = "jpeg"
            jpeg_quality = 0
            thumbnail_width = 0
            thumbnail_height = 100000
            video_extensions = [".MKV", " webm ", ""]
            "#,
        )
        .expect("parse");

        assert_eq!(config.output_format, OutputFormat::Jpeg);
        assert_eq!(config.jpeg_quality, 1);
        assert_eq!(config.thumbnail_width, 1);
        assert_eq!(config.thumbnail_height, MAX_THUMBNAIL_DIMENSION);
        assert_eq!(config.video_extensions, vec!["mkv", "webm"]);
        assert!(config.classifier().classify("a.webm", MediaType::Video));
        assert!(!config.classifier().classify("a.mp4", MediaType::Video));
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        assert!(PluginConfig::from_toml(r#"output_format = "gif""#).is_err());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let config = PluginConfig {
            output_format: OutputFormat::Jpeg,
            pictures_dir: Some(dir.path().join("Pictures")),
            ..PluginConfig::default()
        };

        config.save(&path).expect("save");
        let loaded = PluginConfig::load_from(&path).expect("load");
        assert_eq!(loaded, config);
    }
}
