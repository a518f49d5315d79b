use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::error::{GifloopError, GifloopResult};

#[derive(Clone, Debug)]
pub struct RewriteReport {
    pub output_path: PathBuf,
    pub frame_count: usize,
    pub mean_delay_ms: f64,
    pub output_bytes: u64,
}

/// Default output path: input stem + `_looped.gif`, next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_looped.gif"))
}

/// Re-save a GIF with the loop counter forced to infinite.
///
/// Frames, per-frame delays, disposal, transparency and palettes are carried
/// over unchanged; the re-encode is a fresh LZW pass over the same indexed
/// data, so the output is pixel-identical to the input.
pub fn rewrite_gif(input: &Path, output: Option<&Path>) -> GifloopResult<RewriteReport> {
    if !input.is_file() {
        return Err(GifloopError::not_found(input));
    }
    let file = File::open(input).map_err(|_| GifloopError::not_found(input))?;

    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = opts
        .read_info(BufReader::new(file))
        .map_err(|e| GifloopError::unsupported(input, e.to_string()))?;

    let screen_width = decoder.width();
    let screen_height = decoder.height();
    let global_palette = decoder.global_palette().map(|p| p.to_vec());

    let mut frames = Vec::new();
    loop {
        match decoder.read_next_frame() {
            Ok(Some(frame)) => {
                let mut owned = frame.clone();
                // Decoded buffers come back in display order.
                owned.interlaced = false;
                frames.push(owned);
            }
            Ok(None) => break,
            Err(e) => return Err(GifloopError::unsupported(input, e.to_string())),
        }
    }
    if frames.is_empty() {
        return Err(GifloopError::unsupported(input, "no frames in input"));
    }

    let mut buf = Vec::new();
    {
        let mut encoder = gif::Encoder::new(
            &mut buf,
            screen_width,
            screen_height,
            global_palette.as_deref().unwrap_or(&[]),
        )
        .map_err(|e| anyhow::anyhow!("gif encoder init failed: {e}"))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| anyhow::anyhow!("gif loop flag write failed: {e}"))?;
        for frame in &frames {
            encoder
                .write_frame(frame)
                .map_err(|e| anyhow::anyhow!("gif frame write failed: {e}"))?;
        }
    }

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    std::fs::write(&output_path, &buf)
        .map_err(|e| GifloopError::write_failure(&output_path, e.to_string()))?;

    let total_delay_cs: u64 = frames.iter().map(|f| u64::from(f.delay)).sum();
    let report = RewriteReport {
        output_path,
        frame_count: frames.len(),
        mean_delay_ms: total_delay_cs as f64 * 10.0 / frames.len() as f64,
        output_bytes: buf.len() as u64,
    };
    tracing::debug!(
        frames = report.frame_count,
        bytes = report.output_bytes,
        "rewrote gif with infinite loop"
    );
    Ok(report)
}
