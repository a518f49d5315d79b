use std::path::{Path, PathBuf};

use crate::error::{GifloopError, GifloopResult};

/// Probed facts about one input clip, as reported by `ffprobe`.
#[derive(Clone, Debug)]
pub struct ClipInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
}

impl ClipInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(name: &str) -> bool {
    std::process::Command::new(name)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Probe a clip's dimensions, frame rate, and duration.
///
/// Fails with [`GifloopError::InputNotFound`] when `source_path` is not a
/// readable file and [`GifloopError::UnsupportedFormat`] when ffprobe cannot
/// parse it or it carries no video stream.
#[tracing::instrument]
pub fn probe_clip(source_path: &Path) -> GifloopResult<ClipInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    if !source_path.is_file() {
        return Err(GifloopError::not_found(source_path));
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| anyhow::anyhow!("failed to run ffprobe (is it installed and on PATH?): {e}"))?;
    if !out.status.success() {
        return Err(GifloopError::unsupported(
            source_path,
            String::from_utf8_lossy(&out.stderr).trim(),
        ));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| anyhow::anyhow!("ffprobe json parse failed: {e}"))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| GifloopError::unsupported(source_path, "no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| GifloopError::unsupported(source_path, "missing video width"))?;
    let height = video_stream
        .height
        .ok_or_else(|| GifloopError::unsupported(source_path, "missing video height"))?;

    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| GifloopError::unsupported(source_path, "invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let info = ClipInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
    };
    tracing::debug!(
        width = info.width,
        height = info.height,
        duration_sec = info.duration_sec,
        "probed clip"
    );
    Ok(info)
}

/// Decode a clip sampled at `fps`, returning raw RGBA8 frames at the clip's
/// native dimensions.
///
/// Uses the ffmpeg `fps` filter so frame timing is the encoder's problem, not
/// ours; the returned sequence plays back at exactly `fps`.
pub fn sample_clip_rgba8(source: &ClipInfo, fps: u32) -> GifloopResult<Vec<Vec<u8>>> {
    if fps == 0 {
        return Err(anyhow::anyhow!("sampling fps must be non-zero").into());
    }

    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(&source.source_path)
        .args([
            "-vf",
            &format!("fps={fps}"),
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| anyhow::anyhow!("failed to run ffmpeg for video decode: {e}"))?;

    if !out.status.success() {
        return Err(GifloopError::unsupported(
            &source.source_path,
            String::from_utf8_lossy(&out.stderr).trim(),
        ));
    }

    let expected_len = source.width as usize * source.height as usize * 4;
    if expected_len == 0 {
        return Err(GifloopError::unsupported(
            &source.source_path,
            "decoded video frame size is zero (invalid source dimensions)",
        ));
    }
    if out.stdout.is_empty() || !out.stdout.len().is_multiple_of(expected_len) {
        return Err(GifloopError::unsupported(
            &source.source_path,
            format!(
                "decoded video batch has invalid size: got {} bytes, expected multiples of {expected_len}",
                out.stdout.len()
            ),
        ));
    }

    let count = out.stdout.len() / expected_len;
    let mut frames = Vec::with_capacity(count);
    for idx in 0..count {
        let off = idx * expected_len;
        frames.push(out.stdout[off..off + expected_len].to_vec());
    }
    tracing::debug!(frames = frames.len(), fps, "sampled clip");
    Ok(frames)
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}
