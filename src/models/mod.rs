pub mod media;

pub use media::{
    Album, MediaClassifier, MediaItem, MediaType, ThumbnailRequest, DEFAULT_VIDEO_EXTENSIONS,
    IMAGE_EXTENSIONS,
};
