use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use gradient::{MulticolorGradient, Update};
use presets::{PresetFile, RepeatMode};
use scheduler::{FrameSample, FrameScheduler};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::cli::{OutputFormat, RunArgs};

const BUNDLED_PRESETS: &str = include_str!("../presets/default.toml");

/// Upper bound for the frame count derived from the sequence length.
const MAX_DEFAULT_FRAMES: u64 = 1_000_000;

/// Frame interval multipliers cycled through by `--jitter`.
const JITTER_PATTERN: [f64; 6] = [1.0, 0.5, 1.5, 1.0, 2.0, 0.75];

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

struct TimedUpdate {
    at: Duration,
    name: String,
    gradient: MulticolorGradient,
    update: Update,
}

pub fn run(args: RunArgs) -> Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be a positive number (got {})", args.fps);
    }

    let file = load_presets(args.presets.as_deref())?;
    let initial_name = args
        .gradient
        .as_deref()
        .or_else(|| file.initial_gradient())
        .ok_or_else(|| anyhow!("preset file defines no gradients"))?;
    let initial = file
        .gradient(initial_name)
        .with_context(|| format!("failed to build initial gradient '{initial_name}'"))?;

    let timeline = resolve_timeline(&file)?;
    let frames = args
        .frames
        .unwrap_or_else(|| default_frame_count(&timeline, args.fps));
    tracing::info!(
        gradient = initial_name,
        steps = timeline.len(),
        frames,
        fps = args.fps,
        jitter = args.jitter,
        "starting headless gradient preview"
    );

    let mut scheduler = FrameScheduler::from_gradient(&initial);
    let start = Instant::now();
    let interval = 1.0 / args.fps;
    let mut offset = 0.0_f64;
    let mut pending = timeline.iter().peekable();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for frame in 0..frames {
        if frame > 0 {
            let scale = if args.jitter {
                JITTER_PATTERN[(frame as usize) % JITTER_PATTERN.len()]
            } else {
                1.0
            };
            offset += interval * scale;
        }
        let elapsed = Duration::try_from_secs_f64(offset)
            .with_context(|| format!("frame {frame} falls outside the clock range"))?;
        let now = start
            .checked_add(elapsed)
            .ok_or_else(|| anyhow!("frame {frame} at {offset}s falls outside the clock range"))?;

        while let Some(step) = pending.next_if(|step| step.at <= elapsed) {
            tracing::info!(
                gradient = %step.name,
                at = step.at.as_secs_f64(),
                update = ?step.update,
                "applying sequence step"
            );
            scheduler.apply(&step.gradient, step.update);
        }

        let sample = scheduler.tick_frame(now);
        write_sample(&mut out, args.format, offset, &sample)?;
    }

    out.flush().context("failed to flush preview output")?;
    tracing::info!(
        frames,
        animating = scheduler.state().is_animating(),
        "preview finished"
    );
    Ok(())
}

pub fn list(path: Option<&Path>) -> Result<()> {
    let file = load_presets(path)?;

    println!("Gradients:");
    for name in file.gradient_names() {
        let gradient = file.gradient(name)?;
        let params = gradient.parameters();
        let marker = if file.initial_gradient() == Some(name) {
            "*"
        } else {
            " "
        };
        println!(
            " {marker}{name:<20} stops={} interpolation={} bias={:.4} power={:.3} noise={:.3}",
            params.stop_count(),
            gradient.interpolation(),
            params.bias,
            params.power,
            params.noise
        );
    }

    let steps = file.timeline();
    if steps.is_empty() {
        return Ok(());
    }
    println!("Sequence:");
    for step in steps {
        let timing = match step.duration {
            None => "immediate".to_string(),
            Some(duration) => format!(
                "animate {:.3}s delay {:.3}s repeat={}",
                duration.as_secs_f64(),
                step.delay.unwrap_or_default().as_secs_f64(),
                match step.repeat {
                    RepeatMode::Once => "once",
                    RepeatMode::Forever => "forever",
                }
            ),
        };
        println!(
            "  at {:>8.3}s  {:<20} {timing}",
            step.at.as_secs_f64(),
            step.gradient
        );
    }
    Ok(())
}

fn load_presets(path: Option<&Path>) -> Result<PresetFile> {
    match path {
        Some(path) => {
            let file = PresetFile::load(path)
                .with_context(|| format!("failed to load presets from {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded preset file");
            Ok(file)
        }
        None => {
            tracing::debug!("using bundled presets");
            PresetFile::from_toml_str(BUNDLED_PRESETS).context("bundled presets are invalid")
        }
    }
}

fn resolve_timeline(file: &PresetFile) -> Result<Vec<TimedUpdate>> {
    file.timeline()
        .into_iter()
        .map(|step| {
            let gradient = file
                .gradient(&step.gradient)
                .with_context(|| format!("failed to build gradient '{}'", step.gradient))?;
            Ok(TimedUpdate {
                at: step.at,
                name: step.gradient.clone(),
                gradient,
                update: step.update(),
            })
        })
        .collect()
}

/// Long enough to see every step play out, plus one extra second. Looping
/// steps get two full legs. Capped at [`MAX_DEFAULT_FRAMES`].
fn default_frame_count(timeline: &[TimedUpdate], fps: f64) -> u64 {
    let end = timeline
        .iter()
        .map(|step| match step.update {
            Update::Immediate => step.at,
            Update::Animated(spec) => {
                let legs = if spec.repeat_forever { 2 } else { 1 };
                step.at
                    .saturating_add(spec.delay)
                    .saturating_add(spec.duration.saturating_mul(legs))
            }
        })
        .max()
        .unwrap_or(Duration::ZERO);
    let frames = ((end.as_secs_f64() + 1.0) * fps).ceil();
    (frames as u64).clamp(1, MAX_DEFAULT_FRAMES)
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: u64,
    time: f64,
    dt: f64,
    animating: bool,
    stop_count: i32,
    bias: f32,
    power: f32,
    noise: f32,
    positions: &'a [[f32; 2]],
    colors: Vec<[f32; 3]>,
}

fn write_sample(
    out: &mut impl Write,
    format: OutputFormat,
    time: f64,
    sample: &FrameSample,
) -> Result<()> {
    let uniforms = &sample.uniforms;
    let count = uniforms.stop_count.max(0) as usize;
    match format {
        OutputFormat::JsonLines => {
            let record = FrameRecord {
                frame: sample.frame_index,
                time,
                dt: sample.dt,
                animating: sample.animating,
                stop_count: uniforms.stop_count,
                bias: uniforms.bias,
                power: uniforms.power,
                noise: uniforms.noise,
                positions: &uniforms.positions[..count],
                colors: uniforms.colors[..count]
                    .iter()
                    .map(|color| color.value)
                    .collect(),
            };
            serde_json::to_writer(&mut *out, &record).context("failed to encode frame")?;
            writeln!(out)?;
        }
        OutputFormat::Summary => {
            let first = uniforms.colors.first().map(|color| color.value);
            writeln!(
                out,
                "frame {:>5} t={:>8.3}s dt={:.4} stops={} bias={:.4} power={:.3} noise={:.3} color0={:?}{}",
                sample.frame_index,
                time,
                sample.dt,
                uniforms.stop_count,
                uniforms.bias,
                uniforms.power,
                uniforms.noise,
                first.unwrap_or_default(),
                if sample.animating { " animating" } else { "" }
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use gradient::AnimationSpec;

    use super::*;

    fn step(at: f64, update: Update) -> TimedUpdate {
        let file = PresetFile::from_toml_str(BUNDLED_PRESETS).unwrap();
        TimedUpdate {
            at: Duration::from_secs_f64(at),
            name: "sunrise".into(),
            gradient: file.gradient("sunrise").unwrap(),
            update,
        }
    }

    #[test]
    fn bundled_presets_are_valid() {
        let file = PresetFile::from_toml_str(BUNDLED_PRESETS).unwrap();
        assert_eq!(file.initial_gradient(), Some("sunrise"));
        assert_eq!(resolve_timeline(&file).unwrap().len(), 3);
    }

    #[test]
    fn default_frame_count_covers_sequence() {
        assert_eq!(default_frame_count(&[], 60.0), 60);
        let timeline = vec![
            step(0.0, Update::Immediate),
            step(1.0, AnimationSpec::linear(2.0).into()),
        ];
        assert_eq!(default_frame_count(&timeline, 10.0), 40);

        let looping = vec![step(
            1.0,
            AnimationSpec::linear(1.0)
                .with_delay(Duration::from_millis(500))
                .repeat_forever()
                .into(),
        )];
        assert_eq!(default_frame_count(&looping, 10.0), 45);
    }

    #[test]
    fn default_frame_count_caps_huge_sequences() {
        let endless = vec![step(
            1.0,
            AnimationSpec::new(Duration::from_secs(u64::MAX / 2 + 1))
                .repeat_forever()
                .into(),
        )];
        assert_eq!(default_frame_count(&endless, 60.0), MAX_DEFAULT_FRAMES);
        assert_eq!(default_frame_count(&[], 1e-300), 1);
    }
}
