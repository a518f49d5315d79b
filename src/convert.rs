use std::path::{Path, PathBuf};

use crate::{
    encode_gif::{EncodeConfig, encode_looping_gif},
    error::{GifloopError, GifloopResult},
    media::{self, ClipInfo},
    preset::Quality,
    scale,
};

/// Soft advisory threshold for the output size; crossing it is reported as a
/// tip, never as an error.
pub const SIZE_ADVISORY_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Input clips, in playback order.
    pub inputs: Vec<PathBuf>,
    /// Explicit output path; wins over the derived name.
    pub output: Option<PathBuf>,
    pub quality: Quality,
    /// Explicit sampling rate; wins over the preset rate.
    pub fps: Option<u32>,
    /// Explicit output width; wins over the preset scale factor. Height is
    /// derived proportionally from the first clip.
    pub width: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ClipSummary {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub source_fps: f64,
    pub duration_sec: f64,
    pub frame_count: usize,
}

#[derive(Clone, Debug)]
pub struct ConvertReport {
    pub output_path: PathBuf,
    pub clips: Vec<ClipSummary>,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub frame_count: usize,
    pub total_duration_sec: f64,
    pub output_bytes: u64,
}

impl ConvertReport {
    pub fn oversized(&self) -> bool {
        self.output_bytes > SIZE_ADVISORY_BYTES
    }
}

/// Derive the output path when `--output` is absent: a single input keeps its
/// stem with a `.gif` extension; multiple inputs combine into
/// `combined_video.gif` next to the first one.
pub fn default_output_path(inputs: &[PathBuf]) -> PathBuf {
    match inputs {
        [single] => single.with_extension("gif"),
        _ => {
            let dir = inputs
                .first()
                .and_then(|p| p.parent())
                .unwrap_or_else(|| Path::new(""));
            dir.join("combined_video.gif")
        }
    }
}

/// Transcode the input clips into one looping GIF.
///
/// Pipeline: probe every clip, resolve the target size from the first one,
/// sample each clip at the effective rate and resize it, concatenate in input
/// order, encode with an infinite loop flag, write in a single call. Any
/// per-file failure aborts the run before the output file is created.
pub fn convert(opts: &ConvertOptions) -> GifloopResult<ConvertReport> {
    if opts.inputs.is_empty() {
        return Err(GifloopError::NoInputFiles);
    }
    let fps = opts.fps.unwrap_or_else(|| opts.quality.fps());
    if fps == 0 {
        return Err(anyhow::anyhow!("--fps must be non-zero").into());
    }

    let infos: Vec<ClipInfo> = opts
        .inputs
        .iter()
        .map(|p| media::probe_clip(p))
        .collect::<GifloopResult<_>>()?;

    let reference = &infos[0];
    let target = scale::target_size(
        (reference.width, reference.height),
        opts.width,
        opts.quality.scale(),
    )?;
    tracing::debug!(width = target.0, height = target.1, fps, "resolved output geometry");

    let mut clips = Vec::with_capacity(infos.len());
    let mut frames = Vec::new();
    for info in &infos {
        let sampled = media::sample_clip_rgba8(info, fps)?;
        let count = sampled.len();
        for data in sampled {
            frames.push(scale::resize_rgba8(data, (info.width, info.height), target)?);
        }
        clips.push(ClipSummary {
            source_path: info.source_path.clone(),
            width: info.width,
            height: info.height,
            source_fps: info.source_fps(),
            duration_sec: info.duration_sec,
            frame_count: count,
        });
    }

    let frame_count = frames.len();
    let cfg = EncodeConfig {
        width: target.0,
        height: target.1,
        fps,
    };
    let bytes = encode_looping_gif(&cfg, frames)?;

    let output_path = opts
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&opts.inputs));
    std::fs::write(&output_path, &bytes)
        .map_err(|e| GifloopError::write_failure(&output_path, e.to_string()))?;

    Ok(ConvertReport {
        output_path,
        clips,
        width: target.0,
        height: target.1,
        fps,
        frame_count,
        total_duration_sec: infos.iter().map(|i| i.duration_sec).sum(),
        output_bytes: bytes.len() as u64,
    })
}
