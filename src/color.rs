use std::ops::{Add, AddAssign, Mul};

use crate::geometry::Fp;

/// 8-bit RGB color with saturating channel arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Builds a color from a normalized float triple, clamping each channel
    /// into range.
    pub fn from_floats(rgb: [Fp; 3]) -> Color {
        Color {
            r: (rgb[0] * 255.0).clamp(0.0, 255.0) as u8,
            g: (rgb[1] * 255.0).clamp(0.0, 255.0) as u8,
            b: (rgb[2] * 255.0).clamp(0.0, 255.0) as u8,
        }
    }

    pub fn to_floats(self) -> [Fp; 3] {
        [
            self.r as Fp / 255.0,
            self.g as Fp / 255.0,
            self.b as Fp / 255.0,
        ]
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color {
            r: self.r.saturating_add(other.r),
            g: self.g.saturating_add(other.g),
            b: self.b.saturating_add(other.b),
        }
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

impl Mul<Fp> for Color {
    type Output = Color;

    fn mul(self, scalar: Fp) -> Color {
        Color {
            r: (self.r as Fp * scalar).clamp(0.0, 255.0) as u8,
            g: (self.g as Fp * scalar).clamp(0.0, 255.0) as u8,
            b: (self.b as Fp * scalar).clamp(0.0, 255.0) as u8,
        }
    }
}

/// Component-wise product, normalized so that white is the identity.
impl Mul for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Color {
        Color {
            r: (self.r as u16 * other.r as u16 / 255) as u8,
            g: (self.g as u16 * other.g as u16 / 255) as u8,
            b: (self.b as u16 * other.b as u16 / 255) as u8,
        }
    }
}
