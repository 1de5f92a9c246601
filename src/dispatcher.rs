//! Method-name routing for host invocations.
//!
//! The host hands over a method name and a JSON argument map; the
//! [`Dispatcher`] resolves the arguments, runs the scan or thumbnail
//! operation and returns a typed [`Reply`] or a [`MethodError`] carrying a
//! stable error code.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::base_dirs::{folder_name, BaseDirectories, ConfiguredBaseDirs};
use crate::commands::scanner::{first_media_in_album, list_albums, list_media_in_album};
use crate::commands::thumbnail::{render_thumbnail, ThumbnailOptions};
use crate::config::{PluginConfig, MAX_THUMBNAIL_DIMENSION};
use crate::error::{MethodError, ThumbnailError};
use crate::models::{Album, MediaClassifier, MediaItem, MediaType, ThumbnailRequest};

pub type Arguments = Map<String, Value>;

/// The host-facing entry point.
pub trait MethodHandler: Send + Sync {
    fn invoke(&self, method: &str, args: &Arguments) -> Result<Reply, MethodError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GetAlbums,
    GetAlbumThumbnail,
    GetThumbnail,
    GetMediaInAlbum,
    HasPermission,
    RequestPermission,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::GetAlbums,
        Method::GetAlbumThumbnail,
        Method::GetThumbnail,
        Method::GetMediaInAlbum,
        Method::HasPermission,
        Method::RequestPermission,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::GetAlbums => "getAlbums",
            Method::GetAlbumThumbnail => "getAlbumThumbnail",
            Method::GetThumbnail => "getThumbnail",
            Method::GetMediaInAlbum => "getMediaInAlbum",
            Method::HasPermission => "hasPermission",
            Method::RequestPermission => "requestPermission",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Albums(Vec<Album>),
    Media(Vec<MediaItem>),
    Bytes(Vec<u8>),
    Bool(bool),
}

pub struct Dispatcher<D = ConfiguredBaseDirs> {
    base_dirs: D,
    classifier: MediaClassifier,
    thumbnails: ThumbnailOptions,
    thumbnail_width: u32,
    thumbnail_height: u32,
    ffprobe_path: String,
}

impl Dispatcher<ConfiguredBaseDirs> {
    pub fn from_config(config: &PluginConfig) -> Self {
        Self::with_base_dirs(config, ConfiguredBaseDirs::from_config(config))
    }
}

impl<D: BaseDirectories> Dispatcher<D> {
    pub fn with_base_dirs(config: &PluginConfig, base_dirs: D) -> Self {
        Self {
            base_dirs,
            classifier: config.classifier(),
            thumbnails: ThumbnailOptions::from(config),
            thumbnail_width: config.thumbnail_width.clamp(1, MAX_THUMBNAIL_DIMENSION),
            thumbnail_height: config.thumbnail_height.clamp(1, MAX_THUMBNAIL_DIMENSION),
            ffprobe_path: config.ffprobe_path.clone(),
        }
    }

    fn get_albums(&self, args: &Arguments) -> Result<Reply, MethodError> {
        let media_types = match string_arg(args, "mediaType")? {
            Some(t) => vec![t.parse::<MediaType>()?],
            None => MediaType::ALL.to_vec(),
        };

        let mut albums = Vec::new();
        for media_type in media_types {
            let base_dir = self
                .base_dirs
                .resolve(media_type)
                .ok_or(MethodError::Directory(folder_name(media_type)))?;
            albums.extend(list_albums(&base_dir, media_type, &self.classifier));
        }

        Ok(Reply::Albums(albums))
    }

    fn get_album_thumbnail(&self, args: &Arguments) -> Result<Reply, MethodError> {
        let (album_id, media_type) =
            required_args(args, "albumId", "Album ID and media type required")?;
        let (width, height) = self.bounding_box(args)?;

        let base_dir = self
            .base_dirs
            .resolve(media_type)
            .ok_or(MethodError::Directory(folder_name(media_type)))?;
        let source = first_media_in_album(&base_dir, album_id, media_type, &self.classifier)
            .ok_or(ThumbnailError::NoMediaFound)?;

        self.thumbnail(source, media_type, width, height)
    }

    fn get_thumbnail(&self, args: &Arguments) -> Result<Reply, MethodError> {
        let (media_id, media_type) =
            required_args(args, "mediaId", "Media ID and type required")?;
        let (width, height) = self.bounding_box(args)?;

        let base_dir = self
            .base_dirs
            .resolve(media_type)
            .ok_or(MethodError::Path(folder_name(media_type)))?;

        self.thumbnail(base_dir.join(media_id), media_type, width, height)
    }

    fn get_media_in_album(&self, args: &Arguments) -> Result<Reply, MethodError> {
        let (album_id, media_type) =
            required_args(args, "albumId", "Album ID and media type required")?;

        let album_path = self.album_path(album_id, media_type);
        Ok(Reply::Media(list_media_in_album(
            &album_path,
            media_type,
            &self.classifier,
            &self.ffprobe_path,
        )))
    }

    /// Absolute ids are paths already; relative ones live under the base folder.
    fn album_path(&self, album_id: &str, media_type: MediaType) -> PathBuf {
        let album = Path::new(album_id);
        if album.is_absolute() {
            return album.to_path_buf();
        }
        match self.base_dirs.resolve(media_type) {
            Some(base_dir) => base_dir.join(album),
            None => album.to_path_buf(),
        }
    }

    fn bounding_box(&self, args: &Arguments) -> Result<(u32, u32), MethodError> {
        let width = dimension_arg(args, "width")?.unwrap_or(self.thumbnail_width);
        let height = dimension_arg(args, "height")?.unwrap_or(self.thumbnail_height);
        Ok((width, height))
    }

    fn thumbnail(
        &self,
        source: PathBuf,
        media_type: MediaType,
        width: u32,
        height: u32,
    ) -> Result<Reply, MethodError> {
        let request = ThumbnailRequest {
            source,
            media_type,
            width,
            height,
        };
        log::debug!(
            "Thumbnail {} at {}x{}",
            request.source.display(),
            request.width,
            request.height
        );
        let bytes = render_thumbnail(&request, &self.thumbnails)?;
        Ok(Reply::Bytes(bytes))
    }
}

impl<D: BaseDirectories> MethodHandler for Dispatcher<D> {
    fn invoke(&self, method: &str, args: &Arguments) -> Result<Reply, MethodError> {
        let Some(resolved) = Method::from_name(method) else {
            return Err(MethodError::NotImplemented(method.to_string()));
        };

        log::debug!("invoke {}", resolved.name());
        let result = match resolved {
            Method::GetAlbums => self.get_albums(args),
            Method::GetAlbumThumbnail => self.get_album_thumbnail(args),
            Method::GetThumbnail => self.get_thumbnail(args),
            Method::GetMediaInAlbum => self.get_media_in_album(args),
            // No OS permission model on desktop
            Method::HasPermission | Method::RequestPermission => Ok(Reply::Bool(true)),
        };

        if let Err(e) = &result {
            log::debug!("{} failed: {} ({})", resolved.name(), e.code(), e);
        }
        result
    }
}

/// The `<id_key>` + `mediaType` pair every per-album or per-item method takes.
fn required_args<'a>(
    args: &'a Arguments,
    id_key: &str,
    missing: &str,
) -> Result<(&'a str, MediaType), MethodError> {
    let (Some(id), Some(media_type)) = (string_arg(args, id_key)?, string_arg(args, "mediaType")?)
    else {
        return Err(MethodError::InvalidArguments(missing.to_string()));
    };
    Ok((id, media_type.parse()?))
}

/// A string argument; absent, null and empty all count as missing.
fn string_arg<'a>(args: &'a Arguments, key: &str) -> Result<Option<&'a str>, MethodError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(MethodError::InvalidArguments(format!(
            "{} must be a string, got {}",
            key, other
        ))),
    }
}

fn dimension_arg(args: &Arguments, key: &str) -> Result<Option<u32>, MethodError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| (1..=MAX_THUMBNAIL_DIMENSION).contains(v))
            .map(Some)
            .ok_or_else(|| {
                MethodError::InvalidArguments(format!(
                    "{} must be an integer between 1 and {}, got {}",
                    key, MAX_THUMBNAIL_DIMENSION, value
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_dirs::FixedBaseDirs;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    fn unresolvable() -> Dispatcher<FixedBaseDirs> {
        Dispatcher::with_base_dirs(&PluginConfig::default(), FixedBaseDirs::default())
    }

    #[test]
    fn method_names_round_trip() {
        for method in Method::ALL {
            assert_eq!(Method::from_name(method.name()), Some(method));
        }
        assert_eq!(Method::from_name("getPlatformVersion"), None);
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let err = unresolvable()
            .invoke("deleteEverything", &Arguments::new())
            .unwrap_err();
        assert_eq!(err.code(), "NOT_IMPLEMENTED");
    }

    #[test]
    fn permissions_are_always_granted() {
        let dispatcher = unresolvable();
        for method in ["hasPermission", "requestPermission"] {
            assert_eq!(
                dispatcher.invoke(method, &Arguments::new()),
                Ok(Reply::Bool(true))
            );
        }
    }

    #[test]
    fn string_args_reject_other_types() {
        let a = args(json!({"mediaId": 7, "mediaType": "image"}));
        assert!(matches!(
            string_arg(&a, "mediaId"),
            Err(MethodError::InvalidArguments(_))
        ));
        assert_eq!(string_arg(&a, "mediaType"), Ok(Some("image")));
        assert_eq!(string_arg(&a, "albumId"), Ok(None));
    }

    #[test]
    fn dimension_args_must_be_positive() {
        let a = args(json!({"width": 0, "height": -3, "ok": 64, "float": 1.5}));
        assert!(dimension_arg(&a, "width").is_err());
        assert!(dimension_arg(&a, "height").is_err());
        assert!(dimension_arg(&a, "float").is_err());
        assert_eq!(dimension_arg(&a, "ok"), Ok(Some(64)));
        assert_eq!(dimension_arg(&a, "missing"), Ok(None));
    }

    #[test]
    fn dimension_args_are_capped() {
        let a = args(json!({"at_cap": MAX_THUMBNAIL_DIMENSION, "huge": 100_000}));
        assert_eq!(
            dimension_arg(&a, "at_cap"),
            Ok(Some(MAX_THUMBNAIL_DIMENSION))
        );
        let err = dimension_arg(&a, "huge").unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENTS");

        let err = unresolvable()
            .invoke(
                "getThumbnail",
                &args(json!({"mediaId": "a.jpg", "mediaType": "image", "width": 100_000})),
            )
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENTS");
    }

    #[test]
    fn configured_box_is_capped() {
        let config = PluginConfig {
            thumbnail_width: 50_000,
            thumbnail_height: 0,
            ..PluginConfig::default()
        };
        let dispatcher = Dispatcher::with_base_dirs(&config, FixedBaseDirs::default());
        assert_eq!(
            dispatcher.bounding_box(&Arguments::new()),
            Ok((MAX_THUMBNAIL_DIMENSION, 1))
        );
    }

    #[test]
    fn required_args_pair_id_with_media_type() {
        let a = args(json!({"albumId": "Trip", "mediaType": "video"}));
        assert_eq!(
            required_args(&a, "albumId", "missing"),
            Ok(("Trip", MediaType::Video))
        );

        let err = required_args(&a, "mediaId", "Media ID and type required").unwrap_err();
        assert_eq!(
            err,
            MethodError::InvalidArguments("Media ID and type required".to_string())
        );
    }

    #[test]
    fn missing_base_directory_is_named() {
        let dispatcher = unresolvable();

        let err = dispatcher
            .invoke("getAlbums", &args(json!({"mediaType": "video"})))
            .unwrap_err();
        assert_eq!(err, MethodError::Directory("Videos"));

        let err = dispatcher
            .invoke(
                "getThumbnail",
                &args(json!({"mediaId": "a.jpg", "mediaType": "image"})),
            )
            .unwrap_err();
        assert_eq!(err, MethodError::Path("Pictures"));

        let err = dispatcher
            .invoke(
                "getAlbumThumbnail",
                &args(json!({"albumId": "Trip", "mediaType": "image"})),
            )
            .unwrap_err();
        assert_eq!(err, MethodError::Directory("Pictures"));
        assert_eq!(err.code(), "DIRECTORY_ERROR");
    }

    #[test]
    fn all_albums_fail_when_videos_is_unresolvable() {
        let pictures = tempfile::TempDir::new().expect("tempdir");
        let dispatcher = Dispatcher::with_base_dirs(
            &PluginConfig::default(),
            FixedBaseDirs::new(Some(pictures.path().to_path_buf()), None),
        );

        let err = dispatcher.invoke("getAlbums", &Arguments::new()).unwrap_err();
        assert_eq!(err, MethodError::Directory("Videos"));
    }

    #[test]
    fn invalid_media_type_is_reported() {
        let err = unresolvable()
            .invoke("getAlbums", &args(json!({"mediaType": "audio"})))
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_TYPE");

        let err = unresolvable()
            .invoke(
                "getThumbnail",
                &args(json!({"mediaId": "a.jpg", "mediaType": "audio"})),
            )
            .unwrap_err();
        assert_eq!(err, MethodError::InvalidType("audio".to_string()));

        let err = unresolvable()
            .invoke(
                "getMediaInAlbum",
                &args(json!({"albumId": "/tmp", "mediaType": "gif"})),
            )
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_TYPE");
    }

    #[test]
    fn album_path_joins_relative_ids_only() {
        let dispatcher = Dispatcher::with_base_dirs(
            &PluginConfig::default(),
            FixedBaseDirs::new(Some("/home/u/Pictures".into()), None),
        );
        assert_eq!(
            dispatcher.album_path("Trip", MediaType::Image),
            PathBuf::from("/home/u/Pictures/Trip")
        );
        assert_eq!(
            dispatcher.album_path("Trip", MediaType::Video),
            PathBuf::from("Trip")
        );
    }

    #[cfg(unix)]
    #[test]
    fn album_path_keeps_absolute_ids() {
        let dispatcher = Dispatcher::with_base_dirs(
            &PluginConfig::default(),
            FixedBaseDirs::new(Some("/home/u/Pictures".into()), None),
        );
        assert_eq!(
            dispatcher.album_path("/mnt/card/DCIM", MediaType::Image),
            PathBuf::from("/mnt/card/DCIM")
        );
    }
}
