//! Album listing and thumbnail generation for desktop photo and video
//! libraries, driven through a single `invoke(method, args)` entry point.

pub mod base_dirs;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod utils;

#[cfg(feature = "tauri")]
pub mod plugin;

pub use base_dirs::{BaseDirectories, ConfiguredBaseDirs, FixedBaseDirs, SystemBaseDirs};
pub use config::{OutputFormat, PluginConfig};
pub use dispatcher::{Arguments, Dispatcher, Method, MethodHandler, Reply};
pub use error::{MethodError, ThumbnailError};
pub use models::{Album, MediaClassifier, MediaItem, MediaType, ThumbnailRequest};
