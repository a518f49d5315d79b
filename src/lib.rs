#![forbid(unsafe_code)]

pub mod convert;
pub mod encode_gif;
pub mod error;
pub mod media;
pub mod preset;
pub mod rewrite;
pub mod scale;

pub use convert::{ConvertOptions, ConvertReport, SIZE_ADVISORY_BYTES, convert};
pub use error::{GifloopError, GifloopResult};
pub use media::ClipInfo;
pub use preset::Quality;
pub use rewrite::{RewriteReport, rewrite_gif};
