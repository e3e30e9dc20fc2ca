//! Animated multi-point colour gradients.
//!
//! A gradient is a handful of coloured anchors blended by inverse-distance
//! weighting on the GPU. This crate owns everything up to the uniform upload:
//!
//! ```text
//!   MulticolorGradient + Update
//!          │
//!          ▼
//!   AnimationState ──advance(dt)──▶ progress ──▶ interpolate()
//!          │                                         │
//!          └──────────── GradientParameters ◀────────┘
//!                               │
//!                               ▼
//!                 GradientUniforms::pack() ─▶ compute kernel
//! ```
//!
//! Frame pacing lives in the `scheduler` crate; kernel source, pipelines and
//! surfaces belong to the rendering host.

mod color;
mod config;
mod error;
pub mod gpu;
mod interpolate;
mod timeline;
mod types;

pub use color::{Hsb, Rgb};
pub use config::{GradientBuilder, MulticolorGradient, Update};
pub use error::GradientError;
pub use gpu::{DispatchSize, GradientUniforms};
pub use interpolate::interpolate;
pub use timeline::{AnimationSpec, AnimationState, Direction};
pub use types::{
    ColorInterpolation, ColorStop, GradientParameters, UnitPoint, DEFAULT_BIAS, DEFAULT_NOISE,
    DEFAULT_POWER, MAX_STOPS,
};
