use std::io::Cursor;
use std::path::Path;
use std::process::Command;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, DynamicImage, ImageFormat};

use crate::config::{OutputFormat, PluginConfig};
use crate::error::ThumbnailError;
use crate::models::{MediaType, ThumbnailRequest};
use crate::utils::open_image;

/// Seek offsets tried when grabbing a video frame, in seconds.
const VIDEO_FRAME_OFFSETS: &[&str] = &["1", "0"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailOptions {
    pub format: OutputFormat,
    pub jpeg_quality: u8,
    pub ffmpeg_path: String,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self::from(&PluginConfig::default())
    }
}

impl From<&PluginConfig> for ThumbnailOptions {
    fn from(config: &PluginConfig) -> Self {
        Self {
            format: config.output_format,
            jpeg_quality: config.jpeg_quality,
            ffmpeg_path: config.ffmpeg_path.clone(),
        }
    }
}

/// Largest size with the source aspect ratio that fits in `max_width` x `max_height`.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let new_width = (width as f64 * scale).round().max(1.0) as u32;
    let new_height = (height as f64 * scale).round().max(1.0) as u32;
    (new_width, new_height)
}

pub fn render_thumbnail(
    request: &ThumbnailRequest,
    options: &ThumbnailOptions,
) -> Result<Vec<u8>, ThumbnailError> {
    match request.media_type {
        MediaType::Image => {
            generate_thumbnail(&request.source, request.width, request.height, options)
        }
        MediaType::Video => {
            generate_video_thumbnail(&request.source, request.width, request.height, options)
        }
    }
}

pub fn generate_thumbnail(
    file_path: &Path,
    max_width: u32,
    max_height: u32,
    options: &ThumbnailOptions,
) -> Result<Vec<u8>, ThumbnailError> {
    let img = open_image(file_path).map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    scale_and_encode(&img, max_width, max_height, options)
}

pub fn generate_video_thumbnail(
    file_path: &Path,
    max_width: u32,
    max_height: u32,
    options: &ThumbnailOptions,
) -> Result<Vec<u8>, ThumbnailError> {
    if !file_path.is_file() {
        return Err(ThumbnailError::Decode(format!(
            "No such file: {}",
            file_path.display()
        )));
    }

    let frame = extract_video_frame(file_path, &options.ffmpeg_path)?;
    let img = image::load_from_memory_with_format(&frame, ImageFormat::Png)
        .map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    scale_and_encode(&img, max_width, max_height, options)
}

/// Grab a single frame as PNG bytes through ffmpeg's stdout.
fn extract_video_frame(source_path: &Path, ffmpeg: &str) -> Result<Vec<u8>, ThumbnailError> {
    for &offset in VIDEO_FRAME_OFFSETS {
        let output = Command::new(ffmpeg)
            .args(["-v", "error", "-ss", offset, "-i"])
            .arg(source_path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
            .output();

        match output {
            Ok(result) if result.status.success() && !result.stdout.is_empty() => {
                return Ok(result.stdout);
            }
            Ok(result) if result.status.success() => {
                // Clip shorter than the offset
                continue;
            }
            Ok(result) => {
                let stderr = String::from_utf8_lossy(&result.stderr);
                return Err(ThumbnailError::Decode(format!(
                    "ffmpeg failed: {}",
                    stderr.trim()
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ThumbnailError::Decode(
                    "ffmpeg not found. Please install ffmpeg to generate video thumbnails."
                        .to_string(),
                ));
            }
            Err(e) => {
                return Err(ThumbnailError::Decode(format!("Failed to run ffmpeg: {}", e)));
            }
        }
    }

    Err(ThumbnailError::Decode(format!(
        "ffmpeg produced no frame for {}",
        source_path.display()
    )))
}

fn scale_and_encode(
    img: &DynamicImage,
    max_width: u32,
    max_height: u32,
    options: &ThumbnailOptions,
) -> Result<Vec<u8>, ThumbnailError> {
    let (width, height) = fit_within(img.width(), img.height(), max_width, max_height);
    let thumbnail = img.resize_exact(width, height, FilterType::Triangle);
    encode(&thumbnail, options)
}

fn encode(thumbnail: &DynamicImage, options: &ThumbnailOptions) -> Result<Vec<u8>, ThumbnailError> {
    let mut bytes = Vec::new();

    let result = match options.format {
        OutputFormat::Png => {
            // PNG has no float pixel formats
            let pixels = if thumbnail.color().has_alpha() {
                DynamicImage::ImageRgba8(thumbnail.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(thumbnail.to_rgb8())
            };
            pixels.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        }
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut bytes, options.jpeg_quality);
            DynamicImage::ImageRgb8(thumbnail.to_rgb8()).write_with_encoder(encoder)
        }
    };

    result.map_err(|e| ThumbnailError::Encode(e.to_string()))?;
    Ok(bytes)
}
