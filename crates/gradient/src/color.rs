use crate::error::GradientError;

/// Straight RGB colour with channels in `[0, 1]`.
///
/// Values outside the unit range are carried through untouched; clamping is
/// left to the shader.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Hue/saturation/brightness triple. `hue` is expressed in turns (`[0, 1)`).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn gray(white: f32) -> Self {
        Self::new(white, white, white)
    }

    /// Builds a colour from a packed `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }

    /// Parses `#rrggbb`, `rrggbb` or `0xrrggbb`.
    pub fn parse_hex(value: &str) -> Result<Self, GradientError> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(GradientError::InvalidColor(value.to_string()));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| GradientError::InvalidColor(value.to_string()))?;
        Ok(Self::from_hex(packed))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Componentwise blend towards `other`.
    #[inline]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Converts to hue/saturation/brightness. Achromatic colours report hue 0.
    pub fn to_hsb(self) -> Hsb {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let hue = if delta <= f32::EPSILON {
            0.0
        } else if max == self.r {
            ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };

        let saturation = if max <= f32::EPSILON { 0.0 } else { delta / max };

        Hsb {
            hue: (hue / 6.0).rem_euclid(1.0),
            saturation,
            brightness: max,
        }
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(value: [f32; 3]) -> Self {
        Rgb::new(value[0], value[1], value[2])
    }
}

impl Hsb {
    #[inline]
    pub const fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Componentwise blend towards `other`.
    ///
    /// Hue is blended as a plain number and does not take the short way round
    /// the colour wheel: 0.95 -> 0.05 sweeps back through 0.5.
    #[inline]
    pub fn lerp(self, other: Hsb, t: f32) -> Hsb {
        Hsb::new(
            self.hue + (other.hue - self.hue) * t,
            self.saturation + (other.saturation - self.saturation) * t,
            self.brightness + (other.brightness - self.brightness) * t,
        )
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.hue.rem_euclid(1.0) * 6.0;
        let s = self.saturation;
        let v = self.brightness;

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);

        let (r, g, b) = match sector as i32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Rgb::new(r, g, b)
    }
}
