use crate::color::Rgb;
use crate::error::GradientError;

/// The compute kernel exposes a fixed table of eight point/colour slots.
pub const MAX_STOPS: usize = 8;

pub const DEFAULT_BIAS: f32 = 0.001;
pub const DEFAULT_POWER: f32 = 2.0;
pub const DEFAULT_NOISE: f32 = 0.05;

/// Normalised 2D position inside the gradient surface.
///
/// `(0, 0)` is the top-leading corner and `(1, 1)` the bottom-trailing one.
/// Coordinates outside the unit square are allowed and simply place the
/// anchor off-surface.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct UnitPoint {
    pub x: f32,
    pub y: f32,
}

impl UnitPoint {
    pub const TOP_LEADING: UnitPoint = UnitPoint::new(0.0, 0.0);
    pub const TOP: UnitPoint = UnitPoint::new(0.5, 0.0);
    pub const TOP_TRAILING: UnitPoint = UnitPoint::new(1.0, 0.0);
    pub const LEADING: UnitPoint = UnitPoint::new(0.0, 0.5);
    pub const CENTER: UnitPoint = UnitPoint::new(0.5, 0.5);
    pub const TRAILING: UnitPoint = UnitPoint::new(1.0, 0.5);
    pub const BOTTOM_LEADING: UnitPoint = UnitPoint::new(0.0, 1.0);
    pub const BOTTOM: UnitPoint = UnitPoint::new(0.5, 1.0);
    pub const BOTTOM_TRAILING: UnitPoint = UnitPoint::new(1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Looks up one of the named anchors (`top`, `bottomLeading`,
    /// `bottom_leading`, ...). Matching ignores case and separators.
    pub fn named(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-' | ' '))
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        let point = match normalized.as_str() {
            "topleading" => Self::TOP_LEADING,
            "top" => Self::TOP,
            "toptrailing" => Self::TOP_TRAILING,
            "leading" => Self::LEADING,
            "center" | "centre" => Self::CENTER,
            "trailing" => Self::TRAILING,
            "bottomleading" => Self::BOTTOM_LEADING,
            "bottom" => Self::BOTTOM,
            "bottomtrailing" => Self::BOTTOM_TRAILING,
            _ => return None,
        };
        Some(point)
    }

    #[inline]
    pub fn lerp(self, other: UnitPoint, t: f32) -> UnitPoint {
        UnitPoint::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for UnitPoint {
    fn from(value: [f32; 2]) -> Self {
        UnitPoint::new(value[0], value[1])
    }
}

/// A single gradient anchor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub position: UnitPoint,
    pub color: Rgb,
}

impl ColorStop {
    #[inline]
    pub const fn new(position: UnitPoint, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Colour space used when blending stop colours during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorInterpolation {
    #[default]
    Rgb,
    Hsb,
}

impl std::fmt::Display for ColorInterpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorInterpolation::Rgb => f.write_str("rgb"),
            ColorInterpolation::Hsb => f.write_str("hsb"),
        }
    }
}

impl std::str::FromStr for ColorInterpolation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(ColorInterpolation::Rgb),
            "hsb" | "hsv" => Ok(ColorInterpolation::Hsb),
            other => Err(format!(
                "unknown colour interpolation '{other}'; expected rgb or hsb"
            )),
        }
    }
}

/// Snapshot of everything the kernel needs to shade one frame.
///
/// Invariant: `stops().len() <= MAX_STOPS`. The stop list is only reachable
/// through constructors that check it.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientParameters {
    stops: Vec<ColorStop>,
    /// Keeps inverse-distance weights finite when a pixel sits on an anchor.
    pub bias: f32,
    /// Falloff exponent; higher values give harder edges between anchors.
    pub power: f32,
    /// Dither amplitude used to hide banding.
    pub noise: f32,
}

impl Default for GradientParameters {
    fn default() -> Self {
        Self {
            stops: Vec::new(),
            bias: DEFAULT_BIAS,
            power: DEFAULT_POWER,
            noise: DEFAULT_NOISE,
        }
    }
}

impl GradientParameters {
    /// Creates parameters with default scalars. Fails when more than
    /// [`MAX_STOPS`] stops are supplied.
    pub fn new(stops: impl IntoIterator<Item = ColorStop>) -> Result<Self, GradientError> {
        let stops: Vec<ColorStop> = stops.into_iter().collect();
        check_stop_count(stops.len())?;
        Ok(Self {
            stops,
            ..Self::default()
        })
    }

    #[inline]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    #[inline]
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    /// Builds parameters from a stop list already known to fit.
    pub(crate) fn from_checked(stops: Vec<ColorStop>, bias: f32, power: f32, noise: f32) -> Self {
        debug_assert!(stops.len() <= MAX_STOPS);
        Self {
            stops,
            bias,
            power,
            noise,
        }
    }
}

pub(crate) fn check_stop_count(count: usize) -> Result<(), GradientError> {
    if count > MAX_STOPS {
        Err(GradientError::TooManyStops { count })
    } else {
        Ok(())
    }
}
