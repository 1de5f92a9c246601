use std::path::Path;
use std::process::Command;

use image::{DynamicImage, ImageReader, ImageResult};

/// Decode an image, detecting the format from its content rather than its name.
pub fn open_image(path: &Path) -> ImageResult<DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

/// Get image dimensions without decoding pixel data
pub fn get_image_dimensions(path: &Path) -> ImageResult<(u32, u32)> {
    ImageReader::open(path)?.with_guessed_format()?.into_dimensions()
}

/// Video length in milliseconds as reported by ffprobe; `None` when ffprobe
/// cannot run or prints something unparseable.
pub fn video_duration(path: &Path, ffprobe: &str) -> Option<u64> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output();

    match output {
        Ok(result) if result.status.success() => {
            parse_duration_ms(&String::from_utf8_lossy(&result.stdout))
        }
        Ok(result) => {
            log::debug!(
                "ffprobe failed on {}: {}",
                path.display(),
                String::from_utf8_lossy(&result.stderr).trim()
            );
            None
        }
        Err(e) => {
            log::debug!("Failed to run ffprobe: {}", e);
            None
        }
    }
}

/// Parses ffprobe's seconds output (`"12.345000"`) into milliseconds.
pub fn parse_duration_ms(stdout: &str) -> Option<u64> {
    let seconds: f64 = stdout.lines().next()?.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some((seconds * 1000.0).round() as u64)
}
