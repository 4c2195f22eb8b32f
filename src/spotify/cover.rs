use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, imageops::FilterType};

use crate::{Res, warning};

/// Largest base64 payload the cover upload endpoint accepts.
pub const MAX_COVER_PAYLOAD: usize = 256 * 1000;

pub const LARGE_COVER_SIZE: u32 = 640;
pub const SMALL_COVER_SIZE: u32 = 300;

/// Turns downloaded cover bytes into the base64 JPEG body of a cover upload.
pub fn encode_cover(raw: &[u8]) -> Res<String> {
    encode_cover_within(raw, MAX_COVER_PAYLOAD)
}

/// Encodes at 640×640 and falls back to 300×300 when the payload exceeds `max_len`.
pub fn encode_cover_within(raw: &[u8], max_len: usize) -> Res<String> {
    let img = image::load_from_memory(raw)?;

    let large = resize_to_base64_jpeg(&img, LARGE_COVER_SIZE)?;
    if large.len() <= max_len {
        return Ok(large);
    }

    let small = resize_to_base64_jpeg(&img, SMALL_COVER_SIZE)?;
    if small.len() > max_len {
        warning!(
            "Cover image is still {} bytes after resizing, the upload may be rejected",
            small.len()
        );
    }
    Ok(small)
}

fn resize_to_base64_jpeg(img: &DynamicImage, size: u32) -> Res<String> {
    // JPEG has no alpha channel
    let resized = img.resize_exact(size, size, FilterType::Lanczos3).to_rgb8();

    let mut buf = Cursor::new(Vec::new());
    resized.write_to(&mut buf, ImageFormat::Jpeg)?;
    Ok(STANDARD.encode(buf.into_inner()))
}
