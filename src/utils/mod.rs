pub mod metadata;
pub mod sniff;

pub use metadata::{get_image_dimensions, open_image, video_duration};
pub use sniff::sniff_extension;
