use std::path::PathBuf;

use clap::Parser;

/// Re-save an animated GIF so it loops forever.
#[derive(Parser, Debug)]
#[command(name = "loop-rewrite", version)]
struct Cli {
    /// Input GIF path.
    input: PathBuf,

    /// Output GIF path (default: input stem + `_looped.gif`).
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let report = gifloop::rewrite_gif(&cli.input, cli.output.as_deref())?;

    println!("wrote {}", report.output_path.display());
    println!("  frames:     {}", report.frame_count);
    println!("  mean delay: {:.1} ms per frame", report.mean_delay_ms);
    println!("  file size:  {} bytes", report.output_bytes);
    Ok(())
}
