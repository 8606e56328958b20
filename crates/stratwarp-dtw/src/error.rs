//! Error types for series validation and DTW configuration.

/// Errors from multichannel series validation and metric construction.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when a series has no samples.
    #[error("series must be non-empty")]
    EmptySeries,

    /// Returned when a series is declared with zero channels.
    #[error("series must have at least one channel")]
    NoChannels,

    /// Returned when the flat buffer length is not a multiple of the channel count.
    #[error("buffer of length {len} cannot be split into samples of {n_channels} channels")]
    RaggedSample {
        /// Length of the flat value buffer.
        len: usize,
        /// Declared number of channels.
        n_channels: usize,
    },

    /// Returned when a series contains NaN, infinity, or negative infinity.
    #[error("series contains non-finite value at sample {sample}, channel {channel}")]
    NonFiniteValue {
        /// Sample (row) of the first non-finite value found.
        sample: usize,
        /// Channel (column) of the first non-finite value found.
        channel: usize,
    },

    /// Returned when two series being aligned have different channel counts.
    #[error("cannot align series with {left} and {right} channels")]
    ChannelMismatch {
        /// Channel count of the first series.
        left: usize,
        /// Channel count of the second series.
        right: usize,
    },

    /// Returned when a norm order is zero, negative, or NaN.
    #[error("norm order must be positive, got {p}")]
    InvalidNormOrder {
        /// The rejected order.
        p: f64,
    },
}
