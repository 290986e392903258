//! Pen and Paper Colors
//!
//! The canvas buffer stores opaque 8-bit sRGB pixels. The renderer's surface
//! is an sRGB format, so any color handed to wgpu as a clear value must be
//! converted to linear first.

use image::{Rgb, Rgba};

/// An opaque 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Linear RGBA for use as a wgpu clear color
    pub fn to_linear_rgba_f64(self) -> [f64; 4] {
        [
            srgb_to_linear(f32::from(self.r) / 255.0) as f64,
            srgb_to_linear(f32::from(self.g) / 255.0) as f64,
            srgb_to_linear(f32::from(self.b) / 255.0) as f64,
            1.0,
        ]
    }
}

/// Convert a single sRGB color component to linear space
///
/// sRGB uses a gamma curve with a linear segment near black.
/// Formula from: https://en.wikipedia.org/wiki/SRGB#From_sRGB_to_CIE_XYZ
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Composite a possibly translucent pixel over white paper
#[inline]
pub fn flatten_over_white(px: Rgba<u8>) -> Rgb<u8> {
    let [r, g, b, a] = px.0;
    let a = u32::from(a);
    let blend = |c: u8| ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
    Rgb([blend(r), blend(g), blend(b)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_srgb_to_linear() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 0.001);

        // sRGB 0.5 ≈ linear 0.214
        let linear = srgb_to_linear(0.5);
        assert!((linear - 0.214).abs() < 0.01);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Color::rgb(0x1a, 0x2b, 0x3c).to_hex(), "#1a2b3c");
        assert_eq!(Color::BLUE.to_hex(), "#0000ff");
    }

    #[test]
    fn test_array_round_trip() {
        let c = Color::rgb(1, 2, 3);
        assert_eq!(Color::from_array(c.to_array()), c);
    }

    #[test]
    fn test_flatten_over_white() {
        assert_eq!(flatten_over_white(Rgba([10, 20, 30, 255])), Rgb([10, 20, 30]));
        assert_eq!(flatten_over_white(Rgba([0, 0, 0, 0])), Rgb([255, 255, 255]));
        let half = flatten_over_white(Rgba([0, 0, 0, 128]));
        assert!((126..=128).contains(&half.0[0]));
    }

    #[test]
    fn test_white_clear_color_is_linear_one() {
        let linear = Color::WHITE.to_linear_rgba_f64();
        assert!(linear.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }
}
