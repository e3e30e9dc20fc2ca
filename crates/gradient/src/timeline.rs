use std::time::Duration;

use crate::interpolate::interpolate;
use crate::types::{ColorInterpolation, GradientParameters};

/// Timing for an animated update.
///
/// `delay` holds the current parameters before the transition starts moving.
/// `repeat_forever` turns the transition into a ping-pong loop: it runs to the
/// target, reverses back to the starting snapshot, and repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub delay: Duration,
    pub repeat_forever: bool,
}

impl AnimationSpec {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            repeat_forever: false,
        }
    }

    pub fn linear(seconds: f64) -> Self {
        Self::new(Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn repeat_forever(mut self) -> Self {
        self.repeat_forever = true;
        self
    }
}

/// Direction the transition clock is currently running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

#[derive(Debug, Clone, PartialEq)]
struct Transition {
    target: GradientParameters,
    duration: f64,
    repeat_forever: bool,
}

/// Transition state for one gradient surface.
///
/// The state is either idle (only `current` matters) or animating towards a
/// target. Target, duration and repeat mode live together in one optional
/// record so they are always present or absent as a group.
///
/// `elapsed` is measured in seconds. It is negative while a start delay is
/// still pending and otherwise stays within `[0, duration]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    current: GradientParameters,
    transition: Option<Transition>,
    elapsed: f64,
    direction: Direction,
    color_space: ColorInterpolation,
}

impl AnimationState {
    pub fn new(initial: GradientParameters) -> Self {
        Self {
            current: initial,
            transition: None,
            elapsed: 0.0,
            direction: Direction::Forward,
            color_space: ColorInterpolation::default(),
        }
    }

    /// Replaces the parameters immediately, dropping any running transition.
    pub fn set_static(&mut self, parameters: GradientParameters) {
        if self.transition.take().is_some() {
            tracing::debug!("gradient transition cancelled by static update");
        }
        self.current = parameters;
        self.elapsed = 0.0;
        self.direction = Direction::Forward;
    }

    pub fn set_color_interpolation(&mut self, mode: ColorInterpolation) {
        self.color_space = mode;
    }

    /// Starts a transition towards `target`.
    ///
    /// A transition that is already running is frozen at its present blend and
    /// that blend becomes the new starting point, so chained updates never jump.
    pub fn animate_to(
        &mut self,
        target: GradientParameters,
        spec: AnimationSpec,
        color_space: ColorInterpolation,
    ) {
        if self.transition.is_some() {
            tracing::debug!(
                elapsed = self.elapsed,
                "gradient transition superseded; continuing from blended parameters"
            );
        }
        self.current = self.resolve();

        if self.current.stop_count() != target.stop_count() {
            tracing::debug!(
                from = self.current.stop_count(),
                to = target.stop_count(),
                "stop counts differ; transition will snap to target"
            );
        }

        let duration = spec.duration.as_secs_f64();
        tracing::debug!(
            duration,
            delay = spec.delay.as_secs_f64(),
            repeat_forever = spec.repeat_forever,
            %color_space,
            "gradient transition started"
        );

        self.transition = Some(Transition {
            target,
            duration,
            repeat_forever: spec.repeat_forever,
        });
        self.color_space = color_space;
        self.elapsed = -spec.delay.as_secs_f64();
        self.direction = Direction::Forward;
    }

    /// Moves the transition clock forward by `dt` seconds of wall time.
    ///
    /// Does nothing while idle. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, dt: f64) {
        let (duration, repeat_forever) = match &self.transition {
            Some(transition) => (transition.duration, transition.repeat_forever),
            None => return,
        };
        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.elapsed < 0.0 {
            // Start delay: hold, then spill whatever is left into the run.
            self.direction = Direction::Forward;
            self.elapsed += dt;
            if self.elapsed < 0.0 {
                return;
            }
            dt = self.elapsed;
            self.elapsed = 0.0;
        }

        if repeat_forever {
            self.advance_ping_pong(dt, duration);
            return;
        }

        self.elapsed += dt;
        if duration <= 0.0 || self.elapsed > duration {
            self.finish();
        }
    }

    fn advance_ping_pong(&mut self, dt: f64, duration: f64) {
        if duration <= 0.0 {
            self.elapsed = 0.0;
            self.direction = Direction::Forward;
            return;
        }

        // Unfold the bounce into a single phase over one forward+back cycle.
        let period = 2.0 * duration;
        let phase = match self.direction {
            Direction::Forward => self.elapsed,
            Direction::Reverse => period - self.elapsed,
        };
        let phase = (phase + dt).rem_euclid(period);

        let previous = self.direction;
        if phase <= duration {
            self.direction = Direction::Forward;
            self.elapsed = phase;
        } else {
            self.direction = Direction::Reverse;
            self.elapsed = period - phase;
        }
        if previous != self.direction {
            tracing::trace!(direction = ?self.direction, "gradient transition bounced");
        }
    }

    fn finish(&mut self) {
        if let Some(transition) = self.transition.take() {
            self.current = transition.target;
            tracing::debug!("gradient transition completed");
        }
        self.elapsed = 0.0;
        self.direction = Direction::Forward;
    }

    /// Normalised completion of the running transition.
    ///
    /// `None` while idle or during the start delay. Degenerate durations
    /// report `1.0`.
    pub fn progress(&self) -> Option<f32> {
        let transition = self.transition.as_ref()?;
        if self.elapsed < 0.0 {
            return None;
        }
        if transition.duration <= 0.0 {
            return Some(1.0);
        }
        Some((self.elapsed / transition.duration).clamp(0.0, 1.0) as f32)
    }

    /// Parameters to show right now.
    pub fn resolve(&self) -> GradientParameters {
        match (&self.transition, self.progress()) {
            (Some(transition), Some(progress)) => interpolate(
                &self.current,
                &transition.target,
                progress,
                self.color_space,
            ),
            _ => self.current.clone(),
        }
    }

    #[inline]
    pub fn current(&self) -> &GradientParameters {
        &self.current
    }

    #[inline]
    pub fn target(&self) -> Option<&GradientParameters> {
        self.transition.as_ref().map(|transition| &transition.target)
    }

    /// Transition length in seconds, when animating.
    #[inline]
    pub fn duration(&self) -> Option<f64> {
        self.transition.as_ref().map(|transition| transition.duration)
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn repeat_forever(&self) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|transition| transition.repeat_forever)
    }

    #[inline]
    pub fn color_interpolation(&self) -> ColorInterpolation {
        self.color_space
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// True while the start delay of a transition is still pending.
    #[inline]
    pub fn is_delayed(&self) -> bool {
        self.transition.is_some() && self.elapsed < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::types::{ColorStop, UnitPoint};

    fn gradient(count: usize, power: f32) -> GradientParameters {
        GradientParameters::new((0..count).map(|i| {
            ColorStop::new(
                UnitPoint::new(i as f32 / count as f32, 0.5),
                Rgb::gray(i as f32 / count as f32),
            )
        }))
        .unwrap()
        .with_power(power)
    }

    #[test]
    fn set_static_is_idempotent() {
        let p = gradient(3, 4.0);
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.animate_to(gradient(2, 8.0), AnimationSpec::linear(1.0), ColorInterpolation::Rgb);
        state.set_static(p.clone());
        state.set_static(p.clone());
        assert!(!state.is_animating());
        assert_eq!(state.current(), &p);
        assert_eq!(state.target(), None);
        assert_eq!(state.duration(), None);
    }

    #[test]
    fn idle_advance_is_a_no_op() {
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.advance(5.0);
        assert_eq!(state.elapsed(), 0.0);
        assert_eq!(state.resolve(), gradient(2, 2.0));
        assert_eq!(state.progress(), None);
    }

    #[test]
    fn non_repeating_transition_completes_on_target() {
        let target = gradient(2, 10.0);
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.animate_to(target.clone(), AnimationSpec::linear(1.0), ColorInterpolation::Rgb);

        state.advance(0.5);
        assert!((state.resolve().power - 6.0).abs() < 1e-5);

        state.advance(0.6);
        assert!(!state.is_animating());
        assert_eq!(state.current(), &target);
        assert_eq!(state.elapsed(), 0.0);
    }

    #[test]
    fn ping_pong_reflects_past_the_end() {
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.animate_to(
            gradient(2, 10.0),
            AnimationSpec::linear(1.0).repeat_forever(),
            ColorInterpolation::Rgb,
        );
        state.advance(1.5);
        assert_eq!(state.direction(), Direction::Reverse);
        assert!((state.elapsed() - 0.5).abs() < 1e-9);
        assert!(state.is_animating());
        assert!(state.repeat_forever());
    }

    #[test]
    fn ping_pong_runs_forward_again_after_returning() {
        let start = gradient(2, 2.0);
        let mut state = AnimationState::new(start.clone());
        state.animate_to(
            gradient(2, 10.0),
            AnimationSpec::linear(1.0).repeat_forever(),
            ColorInterpolation::Rgb,
        );
        for _ in 0..10 {
            state.advance(0.25);
        }
        // 2.5s into a 1s ping-pong: one full round trip plus half a leg.
        assert_eq!(state.direction(), Direction::Forward);
        assert!((state.elapsed() - 0.5).abs() < 1e-9);

        state.advance(0.5);
        state.advance(0.5);
        assert_eq!(state.direction(), Direction::Reverse);
        assert!((state.elapsed() - 0.5).abs() < 1e-9);
        assert_eq!(state.current(), &start);
    }

    #[test]
    fn delay_holds_current_parameters() {
        let start = gradient(2, 2.0);
        let mut state = AnimationState::new(start.clone());
        state.animate_to(
            gradient(2, 10.0),
            AnimationSpec::linear(1.0).with_delay(Duration::from_millis(500)),
            ColorInterpolation::Rgb,
        );
        assert!((state.elapsed() + 0.5).abs() < 1e-9);

        state.advance(0.25);
        assert!(state.is_delayed());
        assert_eq!(state.progress(), None);
        assert_eq!(state.resolve(), start);

        state.advance(0.5);
        assert!(!state.is_delayed());
        assert_eq!(state.direction(), Direction::Forward);
        assert!((state.elapsed() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn interrupting_captures_blended_parameters() {
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.animate_to(gradient(2, 10.0), AnimationSpec::linear(1.0), ColorInterpolation::Rgb);
        state.advance(0.5);
        let midway = state.resolve();

        state.animate_to(gradient(2, 4.0), AnimationSpec::linear(2.0), ColorInterpolation::Hsb);
        assert_eq!(state.current(), &midway);
        assert_eq!(state.elapsed(), 0.0);
        assert_eq!(state.direction(), Direction::Forward);
        assert_eq!(state.color_interpolation(), ColorInterpolation::Hsb);
        assert_eq!(state.duration(), Some(2.0));
    }

    #[test]
    fn mismatched_stop_count_snaps_to_target() {
        let target = gradient(3, 5.0);
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.animate_to(target.clone(), AnimationSpec::linear(1.0), ColorInterpolation::Rgb);
        state.advance(0.5);
        assert_eq!(state.progress(), Some(0.5));
        assert_eq!(state.resolve(), target);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let target = gradient(2, 9.0);
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.animate_to(target.clone(), AnimationSpec::linear(0.0), ColorInterpolation::Rgb);
        assert_eq!(state.progress(), Some(1.0));
        assert_eq!(state.resolve(), target);

        state.advance(0.0);
        assert!(!state.is_animating());
        assert_eq!(state.current(), &target);
    }

    #[test]
    fn repeating_zero_duration_stays_on_target() {
        let target = gradient(2, 9.0);
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.animate_to(
            target.clone(),
            AnimationSpec::linear(0.0).repeat_forever(),
            ColorInterpolation::Rgb,
        );
        state.advance(0.3);
        assert!(state.is_animating());
        assert_eq!(state.resolve(), target);
    }

    #[test]
    fn linear_saturates_unrepresentable_lengths() {
        assert_eq!(AnimationSpec::linear(f64::INFINITY).duration, Duration::MAX);
        assert_eq!(AnimationSpec::linear(1e30).duration, Duration::MAX);
        assert_eq!(AnimationSpec::linear(f64::NAN).duration, Duration::ZERO);
        assert_eq!(AnimationSpec::linear(-2.0).duration, Duration::ZERO);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut state = AnimationState::new(gradient(2, 2.0));
        state.animate_to(gradient(2, 10.0), AnimationSpec::linear(1.0), ColorInterpolation::Rgb);
        state.advance(0.25);
        state.advance(-1.0);
        state.advance(f64::NAN);
        assert!((state.elapsed() - 0.25).abs() < 1e-9);
    }
}
