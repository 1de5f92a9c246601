pub mod scanner;
pub mod thumbnail;

pub use scanner::{count_media, first_media_in_album, list_albums, list_media_in_album};
pub use thumbnail::{
    fit_within, generate_thumbnail, generate_video_thumbnail, render_thumbnail, ThumbnailOptions,
};
