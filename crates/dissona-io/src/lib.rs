//! Audio file I/O for dissona.
//!
//! The analyzer works on one channel at a time, so reading comes in two
//! flavours:
//!
//! - [`read_wav`] mixes every channel down to mono
//! - [`read_wav_channel`] extracts a single channel
//!
//! [`read_wav_info`] reads only the header, and [`write_wav`] exists for
//! generating test material.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dissona_io::read_wav;
//!
//! let (samples, spec) = read_wav("input.wav")?;
//! println!("{} samples at {} Hz", samples.len(), spec.sample_rate);
//! ```

mod wav;

pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_channel, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested channel does not exist in the file.
    #[error("Channel {channel} out of range (file has {channels})")]
    ChannelOutOfRange {
        /// Requested channel, zero-based.
        channel: u16,
        /// Channels in the file.
        channels: u16,
    },

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
