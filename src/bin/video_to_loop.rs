use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use gifloop::{ConvertOptions, Quality};

/// Stitch one or more video clips into a single continuously looping GIF
/// (requires `ffmpeg` and `ffprobe` on PATH).
#[derive(Parser, Debug)]
#[command(name = "video-to-loop", version)]
struct Cli {
    /// Input video path(s) or glob pattern(s), stitched in argument order.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output GIF path (default: input stem + `.gif`, or `combined_video.gif`
    /// for multiple inputs).
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Quality preset.
    #[arg(long, value_enum, default_value_t = Quality::Medium)]
    quality: Quality,

    /// Sampling rate in frames per second; overrides the preset rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Output width in pixels (height scaled proportionally); overrides the
    /// preset scale factor.
    #[arg(long)]
    width: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let opts = ConvertOptions {
        inputs: expand_inputs(&cli.inputs)?,
        output: cli.output,
        quality: cli.quality,
        fps: cli.fps,
        width: cli.width,
    };
    let report = gifloop::convert(&opts)?;

    println!("stitched {} clip(s):", report.clips.len());
    for (i, clip) in report.clips.iter().enumerate() {
        println!(
            "  {}. {} ({:.1}s, {}x{}, {:.1} fps, {} frames sampled)",
            i + 1,
            clip.source_path.display(),
            clip.duration_sec,
            clip.width,
            clip.height,
            clip.source_fps,
            clip.frame_count
        );
    }
    println!(
        "wrote {} ({}x{} at {} fps, {} frames, {:.1}s total)",
        report.output_path.display(),
        report.width,
        report.height,
        report.fps,
        report.frame_count,
        report.total_duration_sec
    );
    println!(
        "  file size: {} bytes ({:.1} MB)",
        report.output_bytes,
        report.output_bytes as f64 / 1024.0 / 1024.0
    );
    if report.oversized() {
        println!("tip: for a smaller file, retry with --quality low or a smaller --width");
    }
    Ok(())
}

/// Expand raw input arguments, globbing patterns the shell left untouched.
/// A pattern matching nothing warns and contributes no inputs.
fn expand_inputs(raw: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for arg in raw {
        if arg.contains(['*', '?', '[']) {
            let mut matches: Vec<PathBuf> = glob::glob(arg)
                .with_context(|| format!("invalid glob pattern '{arg}'"))?
                .filter_map(Result::ok)
                .collect();
            if matches.is_empty() {
                eprintln!("warning: no files match pattern '{arg}'");
            }
            matches.sort();
            inputs.extend(matches);
        } else {
            inputs.push(PathBuf::from(arg));
        }
    }
    Ok(inputs)
}
