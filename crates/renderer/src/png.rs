//! PNG encoding for the finished raster.
//!
//! Track images are mostly background with a handful of stroke colors,
//! so they usually fit an indexed PNG (color type 3) with a PLTE/tRNS
//! pair. `encode_auto` tries that first and falls back to RGBA
//! (color type 6) when anti-aliasing pushes the image past 256 unique
//! colors.

use std::collections::HashMap;
use std::io::Write;

use track_common::{TrackError, TrackResult};

const MAX_PALETTE_SIZE: usize = 256;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode RGBA pixel data, picking indexed or full-color form.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> TrackResult<Vec<u8>> {
    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// Map each pixel to a palette index; `None` once a 257th color shows up.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<(u8, u8, u8, u8)>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<(u8, u8, u8, u8)> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let packed = pack_color(chunk[0], chunk[1], chunk[2], chunk[3]);
        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push((chunk[0], chunk[1], chunk[2], chunk[3]));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Indexed PNG (color type 3) with a tRNS chunk when any palette entry
/// carries transparency.
fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> TrackResult<Vec<u8>> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(3); // color type: indexed
    ihdr.push(0); // compression
    ihdr.push(0); // filter
    ihdr.push(0); // interlace
    write_chunk(&mut png, b"IHDR", &ihdr);

    let mut plte = Vec::with_capacity(palette.len() * 3);
    for (r, g, b, _) in palette {
        plte.push(*r);
        plte.push(*g);
        plte.push(*b);
    }
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height, 1)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Full-color PNG (color type 6).
fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> TrackResult<Vec<u8>> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(6); // color type: RGBA
    ihdr.push(0);
    ihdr.push(0);
    ihdr.push(0);
    write_chunk(&mut png, b"IHDR", &ihdr);

    let idat = deflate_scanlines(pixels, width, height, 4)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Prefix each scanline with filter type 0 and zlib-compress the lot.
fn deflate_scanlines(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> TrackResult<Vec<u8>> {
    let row_len = width * bytes_per_pixel;
    let mut raw = Vec::with_capacity(height * (1 + row_len));
    for y in 0..height {
        raw.push(0); // filter: none
        raw.extend_from_slice(&data[y * row_len..(y + 1) * row_len]);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .map_err(|e| TrackError::RenderFailed {
            reason: format!("IDAT compression failed: {e}"),
        })?;
    encoder.finish().map_err(|e| TrackError::RenderFailed {
        reason: format!("IDAT compression failed: {e}"),
    })
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let crc_data = [chunk_type.as_slice(), data].concat();
    png.extend_from_slice(&crc32fast::hash(&crc_data).to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_dedupes_colors() {
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            255, 0, 0, 255, // red again
        ];
        let (palette, indices) = extract_palette(&pixels).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(indices[0], indices[2]);
    }

    #[test]
    fn test_palette_overflow_returns_none() {
        let mut pixels = Vec::with_capacity(300 * 4);
        for i in 0..300u32 {
            pixels.extend_from_slice(&[i as u8, (i / 2) as u8, (i % 7) as u8, 255]);
        }
        // 300 colors built to be pairwise distinct.
        let distinct: std::collections::HashSet<&[u8]> = pixels.chunks_exact(4).collect();
        assert!(distinct.len() > MAX_PALETTE_SIZE);
        assert!(extract_palette(&pixels).is_none());
    }

    #[test]
    fn test_encode_auto_signature_and_iend() {
        let pixels = [
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 255, 0, 255, //
            255, 0, 0, 255,
        ];
        let png = encode_auto(&pixels, 2, 2).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_indexed_carries_transparency() {
        let pixels = [
            255, 0, 0, 255, //
            0, 0, 0, 0,
        ];
        let png = encode_auto(&pixels, 2, 1).unwrap();
        assert!(png.windows(4).any(|w| w == b"tRNS"));
    }

    #[test]
    fn test_opaque_indexed_has_no_trns() {
        let pixels = [
            255, 0, 0, 255, //
            0, 255, 0, 255,
        ];
        let png = encode_auto(&pixels, 2, 1).unwrap();
        assert!(png.windows(4).any(|w| w == b"PLTE"));
        assert!(!png.windows(4).any(|w| w == b"tRNS"));
    }

    #[test]
    fn test_rgba_fallback_for_many_colors() {
        let mut pixels = Vec::with_capacity(512 * 4);
        for i in 0..512u32 {
            pixels.extend_from_slice(&[
                (i % 256) as u8,
                ((i / 2) % 256) as u8,
                ((i * 7) % 256) as u8,
                255,
            ]);
        }
        let png = encode_auto(&pixels, 512, 1).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        assert!(!png.windows(4).any(|w| w == b"PLTE"));
    }
}
