use crate::color::Rgb;
use crate::error::GradientError;
use crate::timeline::AnimationSpec;
use crate::types::{
    check_stop_count, ColorInterpolation, ColorStop, GradientParameters, UnitPoint, DEFAULT_BIAS,
    DEFAULT_NOISE, DEFAULT_POWER,
};

/// Immutable description of a gradient as configured by the host.
///
/// Every setter consumes the value and returns a new one; nothing is shared
/// or mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct MulticolorGradient {
    stops: Vec<ColorStop>,
    bias: f32,
    power: f32,
    noise: f32,
    color_interpolation: ColorInterpolation,
}

impl MulticolorGradient {
    /// Creates a gradient from 1 to 8 stops, in order.
    pub fn new(stops: impl IntoIterator<Item = ColorStop>) -> Result<Self, GradientError> {
        let stops: Vec<ColorStop> = stops.into_iter().collect();
        if stops.is_empty() {
            return Err(GradientError::NoStops);
        }
        check_stop_count(stops.len())?;
        Ok(Self {
            stops,
            bias: DEFAULT_BIAS,
            power: DEFAULT_POWER,
            noise: DEFAULT_NOISE,
            color_interpolation: ColorInterpolation::default(),
        })
    }

    pub fn builder() -> GradientBuilder {
        GradientBuilder::default()
    }

    pub fn bias(self, bias: f32) -> Self {
        Self { bias, ..self }
    }

    pub fn power(self, power: f32) -> Self {
        Self { power, ..self }
    }

    pub fn noise(self, noise: f32) -> Self {
        Self { noise, ..self }
    }

    pub fn color_interpolation(self, color_interpolation: ColorInterpolation) -> Self {
        Self {
            color_interpolation,
            ..self
        }
    }

    #[inline]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    #[inline]
    pub fn interpolation(&self) -> ColorInterpolation {
        self.color_interpolation
    }

    /// Snapshot handed to the animation state.
    pub fn parameters(&self) -> GradientParameters {
        GradientParameters::from_checked(self.stops.clone(), self.bias, self.power, self.noise)
    }
}

/// Fluent stop-by-stop construction of a [`MulticolorGradient`].
#[derive(Debug, Clone, Default)]
pub struct GradientBuilder {
    stops: Vec<ColorStop>,
}

impl GradientBuilder {
    pub fn stop(mut self, position: UnitPoint, color: Rgb) -> Self {
        self.stops.push(ColorStop::new(position, color));
        self
    }

    pub fn build(self) -> Result<MulticolorGradient, GradientError> {
        MulticolorGradient::new(self.stops)
    }
}

/// How a new configuration should reach the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Update {
    /// Replace what is shown on the next frame.
    #[default]
    Immediate,
    /// Blend from what is currently shown.
    Animated(AnimationSpec),
}

impl From<AnimationSpec> for Update {
    fn from(spec: AnimationSpec) -> Self {
        Update::Animated(spec)
    }
}
