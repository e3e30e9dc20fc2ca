use bytemuck::{Pod, Zeroable};

use crate::error::GradientError;
use crate::types::{check_stop_count, ColorStop, GradientParameters, MAX_STOPS};

/// `vec3<f32>` padded to the 16-byte array stride used by GPU uniform blocks.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaddedVec3 {
    pub value: [f32; 3],
    pub padding: f32,
}

unsafe impl Zeroable for PaddedVec3 {}
unsafe impl Pod for PaddedVec3 {}

impl PaddedVec3 {
    #[inline]
    pub const fn new(value: [f32; 3]) -> Self {
        Self {
            value,
            padding: 0.0,
        }
    }
}

/// Uniform record consumed by the gradient kernel.
///
/// Field order and widths are the binary contract with the shader:
///
/// ```text
///   0  stop_count  i32
///   4  bias        f32
///   8  power       f32
///  12  noise       f32
///  16  positions   [vec2<f32>; 8]   stride 8
///  80  colors      [vec3<f32>; 8]   stride 16
/// 208  end
/// ```
///
/// Slots past `stop_count` are zero.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradientUniforms {
    pub stop_count: i32,
    pub bias: f32,
    pub power: f32,
    pub noise: f32,
    pub positions: [[f32; 2]; MAX_STOPS],
    pub colors: [PaddedVec3; MAX_STOPS],
}

unsafe impl Zeroable for GradientUniforms {}
unsafe impl Pod for GradientUniforms {}

const _: () = assert!(std::mem::size_of::<GradientUniforms>() == GradientUniforms::SIZE);

impl GradientUniforms {
    pub const SIZE: usize = 208;

    /// Packs a parameter snapshot. Cannot fail: the snapshot already holds at
    /// most [`MAX_STOPS`] stops.
    pub fn pack(parameters: &GradientParameters) -> Self {
        Self::pack_unchecked(
            parameters.stops(),
            parameters.bias,
            parameters.power,
            parameters.noise,
        )
    }

    /// Packs a raw stop slice, rejecting lists that do not fit the slot table.
    pub fn try_pack_stops(
        stops: &[ColorStop],
        bias: f32,
        power: f32,
        noise: f32,
    ) -> Result<Self, GradientError> {
        check_stop_count(stops.len())?;
        Ok(Self::pack_unchecked(stops, bias, power, noise))
    }

    fn pack_unchecked(stops: &[ColorStop], bias: f32, power: f32, noise: f32) -> Self {
        let mut uniforms = Self {
            stop_count: stops.len() as i32,
            bias,
            power,
            noise,
            ..Self::zeroed()
        };
        for (index, stop) in stops.iter().enumerate() {
            uniforms.positions[index] = stop.position.to_array();
            uniforms.colors[index] = PaddedVec3::new(stop.color.to_array());
        }
        uniforms
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl From<&GradientParameters> for GradientUniforms {
    fn from(parameters: &GradientParameters) -> Self {
        Self::pack(parameters)
    }
}
