//! Pure blending between two parameter snapshots.

use crate::types::{ColorInterpolation, ColorStop, GradientParameters};

/// Blends `current` towards `target` at `progress`.
///
/// Scalars and positions are blended linearly; colours are blended in the
/// requested colour space. `progress` is not clamped here: callers keep it in
/// `[0, 1]`. The exact end points hand back the corresponding snapshot so a
/// finished transition lands on the target bit-for-bit.
///
/// Stops are paired by index. When the two snapshots carry a different number
/// of stops there is no meaningful pairing, so the result snaps to `target`.
pub fn interpolate(
    current: &GradientParameters,
    target: &GradientParameters,
    progress: f32,
    mode: ColorInterpolation,
) -> GradientParameters {
    if current.stop_count() != target.stop_count() {
        return target.clone();
    }
    if progress == 0.0 {
        return current.clone();
    }
    if progress == 1.0 {
        return target.clone();
    }

    let stops = current
        .stops()
        .iter()
        .zip(target.stops())
        .map(|(from, to)| ColorStop {
            position: from.position.lerp(to.position, progress),
            color: match mode {
                ColorInterpolation::Rgb => from.color.lerp(to.color, progress),
                ColorInterpolation::Hsb => from
                    .color
                    .to_hsb()
                    .lerp(to.color.to_hsb(), progress)
                    .to_rgb(),
            },
        })
        .collect();

    GradientParameters::from_checked(
        stops,
        lerp(current.bias, target.bias, progress),
        lerp(current.power, target.power, progress),
        lerp(current.noise, target.noise, progress),
    )
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
