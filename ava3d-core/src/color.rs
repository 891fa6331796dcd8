/// Hex colour parsing and 8-bit conversion
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res, opt},
    multi::many_m_n,
    sequence::preceded,
    IResult,
};

use crate::math::Vec3;

/// Opaque white, used whenever a colour string cannot be parsed
pub fn white() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

/// 8-bit-per-channel colour handed to drawing surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert a 0-1 colour, clamping each channel.
    pub fn from_unit(color: &Vec3) -> Self {
        let channel = |c: f32| {
            let c = if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 };
            (c * 255.0).round() as u8
        };
        Self::new(channel(color.x), channel(color.y), channel(color.z))
    }

    /// CSS `rgb(r, g, b)` notation.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

fn hex_digit(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()), |d| {
        u8::from_str_radix(d, 16)
    })(input)
}

fn hex_digits(input: &str) -> IResult<&str, Vec<u8>> {
    preceded(opt(char('#')), many_m_n(3, 6, hex_digit))(input)
}

/// Parse `#rgb`, `rgb`, `#rrggbb` or `rrggbb` into 0-1 channels.
///
/// Anything else (wrong length, non-hex characters) yields opaque white.
pub fn parse_color(input: &str) -> Vec3 {
    match all_consuming(hex_digits)(input.trim()) {
        Ok((_, digits)) if digits.len() == 3 => Vec3::new(
            f32::from(digits[0] * 17) / 255.0,
            f32::from(digits[1] * 17) / 255.0,
            f32::from(digits[2] * 17) / 255.0,
        ),
        Ok((_, digits)) if digits.len() == 6 => Vec3::new(
            f32::from(digits[0] * 16 + digits[1]) / 255.0,
            f32::from(digits[2] * 16 + digits[3]) / 255.0,
            f32::from(digits[4] * 16 + digits[5]) / 255.0,
        ),
        _ => {
            tracing::debug!(input, "unparseable colour, falling back to white");
            white()
        }
    }
}
