use std::{
    path::{Path, PathBuf},
    process::Command,
};

use gifloop::{ConvertOptions, Quality, convert, media};

fn ffmpeg_tools_available() -> bool {
    media::is_ffmpeg_on_path() && media::is_ffprobe_on_path()
}

fn scratch_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "gifloop_convert_{}_{}_{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&root).unwrap();
    root
}

fn synth_clip(path: &Path, seconds: f64, size: &str) -> anyhow::Result<()> {
    let status = Command::new("ffmpeg")
        .args([
            "-v",
            "error",
            "-y",
            "-f",
            "lavfi",
            "-i",
            &format!("testsrc=size={size}:rate=30"),
            "-t",
            &format!("{seconds}"),
            "-pix_fmt",
            "yuv420p",
            "-c:v",
            "libx264",
        ])
        .arg(path)
        .status()?;
    anyhow::ensure!(status.success(), "ffmpeg failed creating {}", path.display());
    Ok(())
}

struct DecodedGif {
    repeat: gif::Repeat,
    width: u16,
    height: u16,
    delays: Vec<u16>,
}

fn decode_gif(path: &Path) -> DecodedGif {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let file = std::fs::File::open(path).unwrap();
    let mut decoder = opts.read_info(file).unwrap();
    let (width, height) = (decoder.width(), decoder.height());
    let repeat = decoder.repeat();
    let mut delays = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        // Every frame must cover the full logical screen.
        assert_eq!((frame.left, frame.top), (0, 0));
        assert_eq!((frame.width, frame.height), (width, height));
        delays.push(frame.delay);
    }
    DecodedGif {
        repeat,
        width,
        height,
        delays,
    }
}

#[test]
fn stitched_clips_sum_durations_and_share_dimensions() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    if !ffmpeg_tools_available() {
        return;
    }
    let root = scratch_root("stitch");
    let a = root.join("a.mp4");
    let b = root.join("b.mp4");
    synth_clip(&a, 3.0, "640x360").unwrap();
    synth_clip(&b, 2.0, "640x360").unwrap();

    let report = convert(&ConvertOptions {
        inputs: vec![a, b],
        output: None,
        quality: Quality::Medium,
        fps: None,
        width: None,
    })
    .unwrap();

    // Medium preset: 10fps, 70% of 640x360.
    assert_eq!(report.output_path, root.join("combined_video.gif"));
    assert_eq!((report.width, report.height), (448, 252));
    assert_eq!(report.fps, 10);
    assert!((report.total_duration_sec - 5.0).abs() < 0.25);
    // ~50 frames, one frame-interval tolerance per clip boundary.
    assert!((48..=52).contains(&report.frame_count), "{}", report.frame_count);

    let decoded = decode_gif(&report.output_path);
    assert!(matches!(decoded.repeat, gif::Repeat::Infinite));
    assert_eq!((decoded.width, decoded.height), (448, 252));
    assert_eq!(decoded.delays.len(), report.frame_count);
    assert!(decoded.delays.iter().all(|&d| d == 10));
}

#[test]
fn width_override_beats_preset_scale() {
    if !ffmpeg_tools_available() {
        return;
    }
    let root = scratch_root("width");
    let clip = root.join("clip.mp4");
    synth_clip(&clip, 1.0, "640x360").unwrap();

    let report = convert(&ConvertOptions {
        inputs: vec![clip],
        output: Some(root.join("narrow.gif")),
        quality: Quality::Low,
        fps: None,
        width: Some(320),
    })
    .unwrap();

    assert_eq!((report.width, report.height), (320, 180));
    assert_eq!(report.fps, 8);

    let decoded = decode_gif(&report.output_path);
    assert_eq!((decoded.width, decoded.height), (320, 180));
    // 8fps rounds to 13 centiseconds per frame.
    assert!(decoded.delays.iter().all(|&d| d == 13));
}

#[test]
fn fps_override_beats_preset_rate() {
    if !ffmpeg_tools_available() {
        return;
    }
    let root = scratch_root("fps");
    let clip = root.join("clip.mp4");
    synth_clip(&clip, 1.0, "320x240").unwrap();

    let report = convert(&ConvertOptions {
        inputs: vec![clip],
        output: Some(root.join("fast.gif")),
        quality: Quality::Low,
        fps: Some(12),
        width: None,
    })
    .unwrap();

    assert_eq!(report.fps, 12);
    assert!((11..=13).contains(&report.frame_count), "{}", report.frame_count);
}

#[test]
fn single_input_names_output_after_the_stem() {
    if !ffmpeg_tools_available() {
        return;
    }
    let root = scratch_root("stem");
    let clip = root.join("x.mp4");
    synth_clip(&clip, 1.0, "320x240").unwrap();

    let report = convert(&ConvertOptions {
        inputs: vec![clip],
        output: None,
        quality: Quality::Medium,
        fps: None,
        width: None,
    })
    .unwrap();

    assert_eq!(report.output_path, root.join("x.gif"));
    // Medium preset applies when no flags are given.
    assert_eq!(report.fps, 10);
    assert_eq!((report.width, report.height), (224, 168));
}

#[test]
fn mismatched_clips_normalize_to_the_first() {
    if !ffmpeg_tools_available() {
        return;
    }
    let root = scratch_root("mixed");
    let a = root.join("wide.mp4");
    let b = root.join("small.mp4");
    synth_clip(&a, 1.0, "640x360").unwrap();
    synth_clip(&b, 1.0, "320x240").unwrap();

    let report = convert(&ConvertOptions {
        inputs: vec![a, b],
        output: Some(root.join("mixed.gif")),
        quality: Quality::High,
        fps: None,
        width: None,
    })
    .unwrap();

    // High preset keeps the first clip's size; the second is stretched to it.
    assert_eq!((report.width, report.height), (640, 360));
    let decoded = decode_gif(&report.output_path);
    assert_eq!((decoded.width, decoded.height), (640, 360));
}

#[test]
fn aborts_on_first_missing_clip_without_output() {
    if !ffmpeg_tools_available() {
        return;
    }
    let root = scratch_root("abort");
    let good = root.join("good.mp4");
    synth_clip(&good, 1.0, "320x240").unwrap();
    let out = root.join("out.gif");

    let err = convert(&ConvertOptions {
        inputs: vec![good, root.join("missing.mp4")],
        output: Some(out.clone()),
        quality: Quality::Medium,
        fps: None,
        width: None,
    })
    .unwrap_err();

    assert!(matches!(err, gifloop::GifloopError::InputNotFound(_)));
    assert!(!out.exists());
}
