use std::fs::File;
use std::io::Read;
use std::path::Path;

use image::ImageFormat;

const HEADER_LEN: usize = 32;

/// ISO-BMFF brands that carry still images rather than video.
const STILL_IMAGE_BRANDS: &[&[u8; 4]] = &[b"heic", b"heix", b"mif1", b"msf1", b"avif", b"avis"];

/// Canonical extension for a file's leading bytes, limited to the
/// containers the classifier knows. Unreadable files yield `None`.
pub fn sniff_extension(path: &Path) -> Option<&'static str> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    File::open(path)
        .ok()?
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)
        .ok()?;
    sniff_bytes(&header)
}

pub fn sniff_bytes(header: &[u8]) -> Option<&'static str> {
    match image::guess_format(header) {
        Ok(ImageFormat::Jpeg) => return Some("jpg"),
        Ok(ImageFormat::Png) => return Some("png"),
        Ok(_) => return None,
        Err(_) => {}
    }

    // MP4 / MOV / 3GP
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        let brand = &header[8..12];
        if STILL_IMAGE_BRANDS.iter().any(|b| b.as_slice() == brand) {
            return None;
        }
        return Some(if brand == b"qt  " { "mov" } else { "mp4" });
    }

    // AVI
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"AVI " {
        return Some("avi");
    }

    // Matroska / WebM (EBML)
    if header.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("mkv");
    }

    None
}
