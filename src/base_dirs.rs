use std::path::PathBuf;

use crate::config::PluginConfig;
use crate::models::MediaType;

/// Resolves the root folder for each media type (Pictures or Videos).
pub trait BaseDirectories: Send + Sync {
    fn resolve(&self, media_type: MediaType) -> Option<PathBuf>;
}

/// Human name of the base folder, used in error messages.
pub fn folder_name(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Image => "Pictures",
        MediaType::Video => "Videos",
    }
}

/// The user's XDG / Known Folder directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBaseDirs;

impl BaseDirectories for SystemBaseDirs {
    fn resolve(&self, media_type: MediaType) -> Option<PathBuf> {
        match media_type {
            MediaType::Image => dirs::picture_dir(),
            MediaType::Video => dirs::video_dir(),
        }
    }
}

/// Fixed paths; `None` behaves like a folder the OS cannot locate.
#[derive(Debug, Default, Clone)]
pub struct FixedBaseDirs {
    pub pictures: Option<PathBuf>,
    pub videos: Option<PathBuf>,
}

impl FixedBaseDirs {
    pub fn new(pictures: Option<PathBuf>, videos: Option<PathBuf>) -> Self {
        Self { pictures, videos }
    }
}

impl BaseDirectories for FixedBaseDirs {
    fn resolve(&self, media_type: MediaType) -> Option<PathBuf> {
        match media_type {
            MediaType::Image => self.pictures.clone(),
            MediaType::Video => self.videos.clone(),
        }
    }
}

/// Config overrides first, then the system lookup.
#[derive(Debug, Clone)]
pub struct ConfiguredBaseDirs {
    overrides: FixedBaseDirs,
}

impl ConfiguredBaseDirs {
    pub fn from_config(config: &PluginConfig) -> Self {
        Self {
            overrides: FixedBaseDirs::new(config.pictures_dir.clone(), config.videos_dir.clone()),
        }
    }
}

impl BaseDirectories for ConfiguredBaseDirs {
    fn resolve(&self, media_type: MediaType) -> Option<PathBuf> {
        self.overrides
            .resolve(media_type)
            .or_else(|| SystemBaseDirs.resolve(media_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_dirs_map_media_types() {
        let dirs = FixedBaseDirs::new(Some("/p".into()), None);
        assert_eq!(dirs.resolve(MediaType::Image), Some(PathBuf::from("/p")));
        assert_eq!(dirs.resolve(MediaType::Video), None);
    }

    #[test]
    fn config_override_wins() {
        let config = PluginConfig {
            videos_dir: Some("/srv/videos".into()),
            ..PluginConfig::default()
        };
        let dirs = ConfiguredBaseDirs::from_config(&config);
        assert_eq!(
            dirs.resolve(MediaType::Video),
            Some(PathBuf::from("/srv/videos"))
        );
        assert_eq!(dirs.resolve(MediaType::Image), SystemBaseDirs.resolve(MediaType::Image));
    }

    #[test]
    fn folder_names() {
        assert_eq!(folder_name(MediaType::Image), "Pictures");
        assert_eq!(folder_name(MediaType::Video), "Videos");
    }
}
