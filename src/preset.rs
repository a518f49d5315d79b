use clap::ValueEnum;

/// Named bundle of sampling-rate and scale defaults for the converter.
///
/// `--fps` and `--width` flags take precedence over the corresponding
/// preset field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Quality {
    /// 8 fps, half size. Smallest files.
    Low,
    /// 10 fps, 70% size. Balanced.
    #[default]
    Medium,
    /// 15 fps, full size. Largest files.
    High,
}

impl Quality {
    pub fn fps(self) -> u32 {
        match self {
            Quality::Low => 8,
            Quality::Medium => 10,
            Quality::High => 15,
        }
    }

    pub fn scale(self) -> f64 {
        match self {
            Quality::Low => 0.5,
            Quality::Medium => 0.7,
            Quality::High => 1.0,
        }
    }
}
