//! Data handed to the compute stage.
//!
//! - `uniforms` packs a [`GradientParameters`](crate::GradientParameters)
//!   snapshot into the fixed record the kernel reads.
//! - `dispatch` sizes the compute grid for a surface.
//! - `buffer` (feature `wgpu`) owns the uniform buffer and writes packed
//!   records through the queue each frame.
//!
//! Pipeline creation, kernel source and surface management belong to the
//! rendering host.

#[cfg(feature = "wgpu")]
mod buffer;
mod dispatch;
mod uniforms;

#[cfg(feature = "wgpu")]
pub use buffer::GradientUniformBuffer;
pub use dispatch::{DispatchSize, DEFAULT_WORKGROUP};
pub use uniforms::{GradientUniforms, PaddedVec3};
