//! Gradient preset files.
//!
//! A preset file names a set of gradients and, optionally, a timed sequence of
//! updates to play back:
//!
//! ```toml
//! version = 1
//!
//! [defaults]
//! gradient = "sunrise"
//! noise = 0.05
//!
//! [gradients.sunrise]
//! power = 2.0
//! interpolation = "hsb"
//! stops = [
//!     { position = "top", color = "#ffbe0b" },
//!     { position = [0.2, 0.8], color = [0.98, 0.34, 0.03] },
//! ]
//!
//! [[sequence]]
//! gradient = "dusk"
//! at = "2s"
//! duration = "3s"
//! repeat = "forever"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use gradient::{
    AnimationSpec, ColorInterpolation, ColorStop, GradientError, MulticolorGradient, Rgb,
    UnitPoint, Update, DEFAULT_BIAS, DEFAULT_NOISE, DEFAULT_POWER, MAX_STOPS,
};
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read preset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse preset file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid preset file: {0}")]
    Invalid(String),
    #[error("gradient '{name}' is invalid: {source}")]
    Gradient {
        name: String,
        #[source]
        source: GradientError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Once,
    Forever,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresetFile {
    pub version: u32,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub gradients: BTreeMap<String, GradientPreset>,
    #[serde(default)]
    pub sequence: Vec<SequenceStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Defaults {
    pub gradient: Option<String>,
    pub bias: Option<f32>,
    pub power: Option<f32>,
    pub noise: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_interpolation_opt")]
    pub interpolation: Option<ColorInterpolation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradientPreset {
    pub stops: Vec<StopPreset>,
    pub bias: Option<f32>,
    pub power: Option<f32>,
    pub noise: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_interpolation_opt")]
    pub interpolation: Option<ColorInterpolation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopPreset {
    pub position: PositionValue,
    pub color: ColorValue,
}

/// Either a named anchor (`"top"`, `"bottomLeading"`, ...) or `[x, y]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PositionValue {
    Named(String),
    Point([f32; 2]),
}

/// Either a hex string (`"#rrggbb"`) or `[r, g, b]` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Hex(String),
    Components([f32; 3]),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SequenceStep {
    pub gradient: String,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub at: Duration,
    /// Missing means the step is applied immediately rather than animated.
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub duration: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub delay: Option<Duration>,
    #[serde(default)]
    pub repeat: RepeatMode,
}

impl SequenceStep {
    pub fn update(&self) -> Update {
        match self.duration {
            None => Update::Immediate,
            Some(duration) => Update::Animated(AnimationSpec {
                duration,
                delay: self.delay.unwrap_or(Duration::ZERO),
                repeat_forever: self.repeat == RepeatMode::Forever,
            }),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_duration_opt(deserializer).map(|d| d.unwrap_or(Duration::ZERO))
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v.trim())
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("duration {v} out of range: {err}")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn deserialize_interpolation_opt<'de, D>(
    deserializer: D,
) -> Result<Option<ColorInterpolation>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| value.parse().map_err(de::Error::custom))
        .transpose()
}

impl PositionValue {
    pub fn resolve(&self) -> Result<UnitPoint, String> {
        match self {
            PositionValue::Named(name) => {
                UnitPoint::named(name).ok_or_else(|| format!("unknown position '{name}'"))
            }
            PositionValue::Point(point) => Ok(UnitPoint::from(*point)),
        }
    }
}

impl ColorValue {
    pub fn resolve(&self) -> Result<Rgb, GradientError> {
        match self {
            ColorValue::Hex(raw) => Rgb::parse_hex(raw),
            ColorValue::Components(components) => Ok(Rgb::from(*components)),
        }
    }
}

impl PresetFile {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: PresetFile = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn gradient_names(&self) -> impl Iterator<Item = &str> {
        self.gradients.keys().map(String::as_str)
    }

    /// The gradient shown before any sequence step: `defaults.gradient`, or
    /// the first gradient by name.
    pub fn initial_gradient(&self) -> Option<&str> {
        self.defaults
            .gradient
            .as_deref()
            .or_else(|| self.gradients.keys().next().map(String::as_str))
    }

    /// Builds the named gradient with file-level defaults filled in.
    pub fn gradient(&self, name: &str) -> Result<MulticolorGradient, ConfigError> {
        let preset = self
            .gradients
            .get(name)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown gradient '{name}'")))?;
        self.build(name, preset)
    }

    /// Sequence steps ordered by start time. Steps sharing a start time keep
    /// file order.
    pub fn timeline(&self) -> Vec<&SequenceStep> {
        let mut steps: Vec<&SequenceStep> = self.sequence.iter().collect();
        steps.sort_by_key(|step| step.at);
        steps
    }

    fn build(&self, name: &str, preset: &GradientPreset) -> Result<MulticolorGradient, ConfigError> {
        let stops = preset
            .stops
            .iter()
            .map(|stop| {
                let position = stop
                    .position
                    .resolve()
                    .map_err(|msg| ConfigError::Invalid(format!("gradient '{name}': {msg}")))?;
                let color = stop.color.resolve().map_err(|source| ConfigError::Gradient {
                    name: name.to_string(),
                    source,
                })?;
                Ok(ColorStop::new(position, color))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let gradient = MulticolorGradient::new(stops).map_err(|source| ConfigError::Gradient {
            name: name.to_string(),
            source,
        })?;

        Ok(gradient
            .bias(preset.bias.or(self.defaults.bias).unwrap_or(DEFAULT_BIAS))
            .power(preset.power.or(self.defaults.power).unwrap_or(DEFAULT_POWER))
            .noise(preset.noise.or(self.defaults.noise).unwrap_or(DEFAULT_NOISE))
            .color_interpolation(
                preset
                    .interpolation
                    .or(self.defaults.interpolation)
                    .unwrap_or_default(),
            ))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported preset version {}; expected 1",
                self.version
            )));
        }

        if self.gradients.is_empty() {
            return Err(ConfigError::Invalid(
                "preset file must define at least one gradient".into(),
            ));
        }

        if let Some(bias) = self.defaults.bias {
            if !is_positive(bias) {
                return Err(ConfigError::Invalid("defaults.bias must be > 0".into()));
            }
        }

        for (name, preset) in &self.gradients {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("gradient name may not be empty".into()));
            }

            if preset.stops.len() > MAX_STOPS {
                return Err(ConfigError::Gradient {
                    name: name.clone(),
                    source: GradientError::TooManyStops {
                        count: preset.stops.len(),
                    },
                });
            }

            if let Some(bias) = preset.bias.or(self.defaults.bias) {
                if !is_positive(bias) {
                    return Err(ConfigError::Invalid(format!(
                        "gradient '{name}' bias must be > 0"
                    )));
                }
            }

            self.build(name, preset)?;
        }

        if let Some(initial) = &self.defaults.gradient {
            if !self.gradients.contains_key(initial) {
                return Err(ConfigError::Invalid(format!(
                    "defaults.gradient references unknown gradient '{initial}'"
                )));
            }
        }

        for step in &self.sequence {
            if !self.gradients.contains_key(&step.gradient) {
                return Err(ConfigError::Invalid(format!(
                    "sequence step at {:?} references unknown gradient '{}'",
                    step.at, step.gradient
                )));
            }
            if step.duration.is_none() && (step.delay.is_some() || step.repeat != RepeatMode::Once)
            {
                return Err(ConfigError::Invalid(format!(
                    "sequence step for '{}' sets delay/repeat without a duration",
                    step.gradient
                )));
            }
        }

        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
