//! Color-key background removal.
//!
//! Pixels are converted to HSV on the 0-180 hue / 0-255 saturation and value
//! scale. A pixel becomes transparent iff it sits in the white band (low
//! saturation, high value) and outside both protected accent hue bands.

use chalkboard_models::KeyingConfig;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// HSV triple on the 0-180 / 0-255 / 0-255 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue, 0 to 179
    pub h: u8,
    /// Saturation
    pub s: u8,
    /// Value
    pub v: u8,
}

impl Hsv {
    /// Convert an RGB pixel.
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let (rf, gf, bf) = (r as f32, g as f32, b as f32);
        let max = rf.max(gf).max(bf);
        let min = rf.min(gf).min(bf);
        let delta = max - min;

        let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };
        let degrees = if delta == 0.0 {
            0.0
        } else if max == rf {
            60.0 * (gf - bf) / delta
        } else if max == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };

        Self {
            h: ((degrees / 2.0).round() as u16 % 180) as u8,
            s: s.round() as u8,
            v: max as u8,
        }
    }
}

fn in_band(hue: u8, [low, high]: [u8; 2]) -> bool {
    (low..=high).contains(&hue)
}

/// Whether a pixel is keyed out.
pub fn is_background(rgb: [u8; 3], keying: &KeyingConfig) -> bool {
    let hsv = Hsv::from_rgb(rgb);
    let white = hsv.s <= keying.white_saturation_max && hsv.v >= keying.white_value_min;
    if !white {
        return false;
    }
    // Grays have no hue.
    let has_hue = hsv.s > 0;
    let accent = has_hue && (in_band(hsv.h, keying.cool_hue) || in_band(hsv.h, keying.warm_hue));
    !accent
}

/// Decode `bytes`, key out the white background and re-encode as RGBA PNG.
pub fn key_background(bytes: &[u8], keying: &KeyingConfig) -> Result<Vec<u8>, String> {
    let decoded = image::load_from_memory(bytes).map_err(|e| format!("decode failed: {}", e))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut keyed = 0usize;
    let rgba = RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let alpha = if is_background([r, g, b], keying) {
            keyed += 1;
            0
        } else {
            255
        };
        Rgba([r, g, b, alpha])
    });
    debug!(width, height, keyed, "Keyed background");

    let mut out = Cursor::new(Vec::new());
    rgba.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| format!("encode failed: {}", e))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn png(img: &RgbImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn hsv_matches_reference_scale() {
        assert_eq!(Hsv::from_rgb([255, 255, 255]), Hsv { h: 0, s: 0, v: 255 });
        assert_eq!(Hsv::from_rgb([255, 0, 0]), Hsv { h: 0, s: 255, v: 255 });
        assert_eq!(Hsv::from_rgb([0, 255, 255]).h, 90);
        assert_eq!(Hsv::from_rgb([255, 128, 0]).h, 15);
    }

    #[test]
    fn white_is_background_and_ink_is_not() {
        let cfg = KeyingConfig::default();
        assert!(is_background([255, 255, 255], &cfg));
        assert!(is_background([230, 230, 228], &cfg));
        assert!(!is_background([20, 20, 20], &cfg));
        assert!(!is_background([0, 128, 128], &cfg));
    }

    #[test]
    fn pale_accents_are_protected() {
        let cfg = KeyingConfig::default();
        // Pale teal and pale orange both fall in the white band.
        assert!(!is_background([215, 240, 240], &cfg));
        assert!(!is_background([250, 235, 220], &cfg));
        // Pale violet is in the white band but outside both accent bands.
        assert!(is_background([235, 220, 245], &cfg));
    }

    #[test]
    fn faint_accent_tint_is_still_protected() {
        let cfg = KeyingConfig::default();
        // Saturation 4, hue 90: barely tinted but inside the cool band.
        assert_eq!(Hsv::from_rgb([236, 240, 240]), Hsv { h: 90, s: 4, v: 240 });
        assert!(!is_background([236, 240, 240], &cfg));
        // A pure gray has no hue, even when a band starts at 0.
        let red_band = KeyingConfig {
            warm_hue: [0, 25],
            ..cfg
        };
        assert!(is_background([240, 240, 240], &red_band));
    }

    #[test]
    fn only_the_accent_pixel_stays_opaque() {
        let mut img = RgbImage::from_pixel(8, 6, Rgb([255, 255, 255]));
        img.put_pixel(3, 2, Rgb([215, 240, 240]));

        let keyed = key_background(&png(&img), &KeyingConfig::default()).unwrap();
        let decoded = image::load_from_memory(&keyed).unwrap();
        assert!(decoded.color().has_alpha());

        for (x, y, pixel) in decoded.pixels() {
            let expected = if (x, y) == (3, 2) { 255 } else { 0 };
            assert_eq!(pixel.0[3], expected, "alpha at ({}, {})", x, y);
        }
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = key_background(b"not an image", &KeyingConfig::default()).unwrap_err();
        assert!(err.starts_with("decode failed"));
    }
}
