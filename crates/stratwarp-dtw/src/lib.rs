//! Multichannel dynamic time warping.
//!
//! Pure math library with zero I/O. Provides validated multichannel series,
//! per-sample metrics (p-norms including fractional orders, or a custom
//! closure), FastDTW with radius-limited refinement, exact DTW, and warping
//! path extraction.

mod dtw;
mod error;
mod metric;
mod series;
mod warp;
mod window;

pub use dtw::Dtw;
pub use error::DtwError;
pub use metric::{DistanceFn, SampleMetric};
pub use series::{MultiSeries, SeriesView};
pub use warp::{Warping, WarpingStep};
pub use window::SearchWindow;
