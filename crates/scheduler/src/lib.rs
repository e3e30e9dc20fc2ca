//! Per-frame driver for one gradient surface.
//!
//! The host calls [`FrameScheduler::tick`] once per display refresh with the
//! refresh timestamp. The scheduler measures the real interval since the
//! previous tick, advances the transition clock by it, and returns the
//! parameters to shade. Nothing here assumes a fixed frame interval.

use std::time::Instant;

use gradient::{
    AnimationSpec, AnimationState, ColorInterpolation, GradientParameters, GradientUniforms,
    MulticolorGradient, Update,
};

/// Everything the host needs to encode one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    pub frame_index: u64,
    /// Seconds since the previous tick; zero on the first tick after an update.
    pub dt: f64,
    pub parameters: GradientParameters,
    pub uniforms: GradientUniforms,
    /// True while a transition is still running after this tick.
    pub animating: bool,
}

/// Owns the animation state of a single surface.
///
/// Not meant to be shared: one scheduler per surface, ticked from one place.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: AnimationState,
    last_tick: Option<Instant>,
    frame_index: u64,
    dirty: bool,
}

impl FrameScheduler {
    pub fn new(initial: GradientParameters) -> Self {
        Self {
            state: AnimationState::new(initial),
            last_tick: None,
            frame_index: 0,
            dirty: true,
        }
    }

    pub fn from_gradient(gradient: &MulticolorGradient) -> Self {
        let mut scheduler = Self::new(gradient.parameters());
        scheduler
            .state
            .set_color_interpolation(gradient.interpolation());
        scheduler
    }

    #[inline]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Shows `parameters` from the next frame on, cancelling any transition.
    pub fn set_static(&mut self, parameters: GradientParameters) {
        self.state.set_static(parameters);
        self.resume();
    }

    /// Starts a transition from whatever is on screen towards `parameters`.
    pub fn animate_to(
        &mut self,
        parameters: GradientParameters,
        spec: AnimationSpec,
        color_space: ColorInterpolation,
    ) {
        self.state.animate_to(parameters, spec, color_space);
        self.resume();
    }

    /// Applies a host configuration, immediately or animated.
    pub fn apply(&mut self, gradient: &MulticolorGradient, update: Update) {
        match update {
            Update::Immediate => {
                self.state.set_color_interpolation(gradient.interpolation());
                self.set_static(gradient.parameters());
            }
            Update::Animated(spec) => {
                self.animate_to(gradient.parameters(), spec, gradient.interpolation())
            }
        }
    }

    /// False once the scheduler is idle and its final frame has been produced.
    /// Hosts may pause their refresh callback until the next update.
    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.state.is_animating()
    }

    /// Advances to `now` and returns the parameters for this frame.
    pub fn tick(&mut self, now: Instant) -> GradientParameters {
        self.step(now).1
    }

    /// Like [`tick`](Self::tick) but also packs the uniform record.
    pub fn tick_frame(&mut self, now: Instant) -> FrameSample {
        let frame_index = self.frame_index;
        let (dt, parameters) = self.step(now);
        FrameSample {
            frame_index,
            dt,
            uniforms: GradientUniforms::pack(&parameters),
            parameters,
            animating: self.state.is_animating(),
        }
    }

    fn step(&mut self, now: Instant) -> (f64, GradientParameters) {
        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        self.state.advance(dt);
        let parameters = self.state.resolve();

        tracing::trace!(
            frame = self.frame_index,
            dt,
            elapsed = self.state.elapsed(),
            animating = self.state.is_animating(),
            "gradient frame resolved"
        );

        if !self.state.is_animating() {
            self.dirty = false;
        }
        self.frame_index = self.frame_index.wrapping_add(1);
        (dt, parameters)
    }

    /// Restarts frame timing so an idle gap is not counted as animation time.
    fn resume(&mut self) {
        self.last_tick = None;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gradient::{ColorStop, Direction, Rgb, UnitPoint};

    use super::*;

    fn palette(colors: &[u32]) -> MulticolorGradient {
        let count = colors.len() as f32;
        MulticolorGradient::new(colors.iter().enumerate().map(|(i, &hex)| {
            ColorStop::new(UnitPoint::new(i as f32 / count, 0.5), Rgb::from_hex(hex))
        }))
        .unwrap()
    }

    fn secs(value: f64) -> Duration {
        Duration::from_secs_f64(value)
    }

    #[test]
    fn static_scheduler_returns_current_parameters() {
        let config = palette(&[0xffbe0b, 0xfb5607]);
        let mut scheduler = FrameScheduler::from_gradient(&config);
        let now = Instant::now();
        assert_eq!(scheduler.tick(now), config.parameters());
        assert_eq!(scheduler.tick(now + secs(1.0)), config.parameters());
    }

    #[test]
    fn zero_duration_resolves_on_first_tick() {
        let from = palette(&[0xffbe0b, 0xfb5607]);
        let to = palette(&[0x8338ec, 0x3a86ff]).power(6.0);
        let mut scheduler = FrameScheduler::from_gradient(&from);
        scheduler.apply(&to, Update::Animated(AnimationSpec::linear(0.0)));

        let first = scheduler.tick(Instant::now());
        assert_eq!(first, to.parameters());
        assert!(!scheduler.state().is_animating());
    }

    #[test]
    fn uses_real_elapsed_time_between_ticks() {
        let from = palette(&[0x000000]).power(2.0);
        let to = palette(&[0xffffff]).power(10.0);
        let mut scheduler = FrameScheduler::from_gradient(&from);
        scheduler.apply(&to, AnimationSpec::linear(2.0).into());

        let start = Instant::now();
        scheduler.tick(start);
        scheduler.tick(start + secs(0.016));
        // A long stall counts in full.
        let params = scheduler.tick(start + secs(1.0));
        assert!((params.power - 6.0).abs() < 1e-4);
        assert!((params.stops()[0].color.r - 0.5).abs() < 1e-4);
    }

    #[test]
    fn ping_pong_bounces_through_ticks() {
        let mut scheduler = FrameScheduler::from_gradient(&palette(&[0x000000]));
        scheduler.apply(
            &palette(&[0xffffff]),
            AnimationSpec::linear(1.0).repeat_forever().into(),
        );
        let start = Instant::now();
        scheduler.tick(start);
        let params = scheduler.tick(start + secs(1.5));

        assert_eq!(scheduler.state().direction(), Direction::Reverse);
        assert!((scheduler.state().elapsed() - 0.5).abs() < 1e-6);
        assert!((params.stops()[0].color.g - 0.5).abs() < 1e-4);
        assert!(scheduler.needs_redraw());
    }

    #[test]
    fn delayed_transition_shows_current_until_delay_passes() {
        let from = palette(&[0x000000]);
        let mut scheduler = FrameScheduler::from_gradient(&from);
        scheduler.apply(
            &palette(&[0xffffff]),
            AnimationSpec::linear(1.0).with_delay(secs(1.0)).into(),
        );
        let start = Instant::now();
        assert_eq!(scheduler.tick(start), from.parameters());
        assert_eq!(scheduler.tick(start + secs(0.5)), from.parameters());

        let params = scheduler.tick(start + secs(1.25));
        assert!((params.stops()[0].color.r - 0.25).abs() < 1e-4);
    }

    #[test]
    fn mismatched_stop_counts_snap_to_target() {
        let to = palette(&[0xd62828, 0x003049, 0xf77f00]);
        let mut scheduler = FrameScheduler::from_gradient(&palette(&[0xd62828, 0x003049]));
        scheduler.apply(&to, AnimationSpec::linear(1.0).into());
        let start = Instant::now();
        scheduler.tick(start);
        assert_eq!(scheduler.tick(start + secs(0.5)), to.parameters());
    }

    #[test]
    fn interrupted_transition_continues_from_blend() {
        let mut scheduler = FrameScheduler::from_gradient(&palette(&[0x000000]).power(2.0));
        scheduler.apply(
            &palette(&[0xffffff]).power(10.0),
            AnimationSpec::linear(1.0).into(),
        );
        let start = Instant::now();
        scheduler.tick(start);
        scheduler.tick(start + secs(0.5));

        scheduler.apply(
            &palette(&[0x000000]).power(2.0),
            AnimationSpec::linear(1.0).into(),
        );
        assert!((scheduler.state().current().power - 6.0).abs() < 1e-4);

        // The baseline restarts, so the first tick after the update is dt = 0.
        let sample = scheduler.tick_frame(start + secs(5.0));
        assert_eq!(sample.dt, 0.0);
        assert!((sample.parameters.power - 6.0).abs() < 1e-4);
        assert!(sample.animating);
    }

    #[test]
    fn redraw_gating_follows_updates() {
        let config = palette(&[0x3a86ff]);
        let mut scheduler = FrameScheduler::from_gradient(&config);
        assert!(scheduler.needs_redraw());

        let start = Instant::now();
        scheduler.tick(start);
        assert!(!scheduler.needs_redraw());

        scheduler.apply(&config.clone().noise(32.0), Update::Immediate);
        assert!(scheduler.needs_redraw());
        let sample = scheduler.tick_frame(start + secs(0.1));
        assert_eq!(sample.uniforms.noise, 32.0);
        assert!(!sample.animating);
        assert!(!scheduler.needs_redraw());
    }

    #[test]
    fn immediate_update_cancels_running_transition() {
        let mut scheduler = FrameScheduler::from_gradient(&palette(&[0x000000]));
        scheduler.apply(&palette(&[0xffffff]), AnimationSpec::linear(1.0).into());
        let start = Instant::now();
        scheduler.tick(start);
        scheduler.tick(start + secs(0.5));

        let fixed = palette(&[0xff006e, 0x8338ec]);
        scheduler.apply(&fixed, Update::Immediate);
        assert!(!scheduler.state().is_animating());
        assert_eq!(scheduler.tick(start + secs(0.6)), fixed.parameters());
    }

    #[test]
    fn frame_samples_carry_packed_uniforms() {
        let config = palette(&[0xffbe0b, 0xfb5607, 0xff006e]).bias(0.002);
        let mut scheduler = FrameScheduler::from_gradient(&config);
        let start = Instant::now();
        let first = scheduler.tick_frame(start);
        let second = scheduler.tick_frame(start + secs(0.016));
        assert_eq!(first.frame_index, 0);
        assert_eq!(second.frame_index, 1);
        assert_eq!(second.uniforms.stop_count, 3);
        assert_eq!(second.uniforms.bias, 0.002);
        assert!((second.dt - 0.016).abs() < 1e-9);
    }
}
