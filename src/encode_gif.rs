use gif::Repeat;

use crate::error::GifloopResult;

/// NeuQuant speed passed to [`gif::Frame::from_rgba_speed`]; 1 is best,
/// 30 is fastest.
const QUANTIZER_SPEED: i32 = 10;

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl EncodeConfig {
    pub fn validate(&self) -> GifloopResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow::anyhow!("encode width/height must be non-zero").into());
        }
        if self.fps == 0 {
            return Err(anyhow::anyhow!("encode fps must be non-zero").into());
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            // The GIF logical screen is described with 16-bit fields.
            return Err(anyhow::anyhow!(
                "encode dimensions {}x{} exceed the GIF limit of {}",
                self.width,
                self.height,
                u16::MAX
            )
            .into());
        }
        Ok(())
    }

    /// Per-frame delay in centiseconds, the GIF timing unit.
    pub fn delay_cs(&self) -> u16 {
        ((100.0 / f64::from(self.fps)).round() as u16).max(1)
    }
}

/// Encode raw RGBA8 frames as a GIF with the loop counter set to infinite.
///
/// The whole image is produced in memory so callers can defer creating the
/// output file until encoding has succeeded.
pub fn encode_looping_gif(cfg: &EncodeConfig, mut frames: Vec<Vec<u8>>) -> GifloopResult<Vec<u8>> {
    cfg.validate()?;
    if frames.is_empty() {
        return Err(anyhow::anyhow!("no frames to encode").into());
    }

    let expected_len = cfg.width as usize * cfg.height as usize * 4;
    let delay = cfg.delay_cs();
    let mut buf = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut buf, cfg.width as u16, cfg.height as u16, &[])
            .map_err(|e| anyhow::anyhow!("gif encoder init failed: {e}"))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| anyhow::anyhow!("gif loop flag write failed: {e}"))?;

        for rgba in &mut frames {
            if rgba.len() != expected_len {
                return Err(anyhow::anyhow!(
                    "frame buffer size mismatch: got {} bytes, expected {expected_len}",
                    rgba.len()
                )
                .into());
            }
            let mut frame = gif::Frame::from_rgba_speed(
                cfg.width as u16,
                cfg.height as u16,
                rgba,
                QUANTIZER_SPEED,
            );
            frame.delay = delay;
            encoder
                .write_frame(&frame)
                .map_err(|e| anyhow::anyhow!("gif frame write failed: {e}"))?;
        }
    }

    tracing::debug!(
        frames = frames.len(),
        bytes = buf.len(),
        delay_cs = delay,
        "encoded looping gif"
    );
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation_catches_bad_values() {
        assert!(
            EncodeConfig {
                width: 0,
                height: 10,
                fps: 10,
            }
            .validate()
            .is_err()
        );
        assert!(
            EncodeConfig {
                width: 10,
                height: 10,
                fps: 0,
            }
            .validate()
            .is_err()
        );
        assert!(
            EncodeConfig {
                width: 70_000,
                height: 10,
                fps: 10,
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn delay_follows_the_sampling_rate() {
        let cfg = |fps| EncodeConfig {
            width: 2,
            height: 2,
            fps,
        };
        assert_eq!(cfg(10).delay_cs(), 10);
        assert_eq!(cfg(8).delay_cs(), 13);
        assert_eq!(cfg(15).delay_cs(), 7);
        // Rates past 100fps still get a representable delay.
        assert_eq!(cfg(300).delay_cs(), 1);
    }

    #[test]
    fn encoded_gif_loops_forever() {
        let cfg = EncodeConfig {
            width: 2,
            height: 2,
            fps: 10,
        };
        let frames = vec![vec![255u8; 2 * 2 * 4], vec![0u8; 2 * 2 * 4]];
        let bytes = encode_looping_gif(&cfg, frames).unwrap();

        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = opts.read_info(&bytes[..]).unwrap();
        assert!(matches!(decoder.repeat(), Repeat::Infinite));
        assert_eq!(decoder.width(), 2);
        assert_eq!(decoder.height(), 2);

        let mut count = 0;
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            assert_eq!(frame.delay, 10);
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn mismatched_frame_buffer_is_rejected() {
        let cfg = EncodeConfig {
            width: 2,
            height: 2,
            fps: 10,
        };
        assert!(encode_looping_gif(&cfg, vec![vec![0u8; 3]]).is_err());
    }

    #[test]
    fn zero_frames_is_rejected() {
        let cfg = EncodeConfig {
            width: 2,
            height: 2,
            fps: 10,
        };
        assert!(encode_looping_gif(&cfg, Vec::new()).is_err());
    }
}
