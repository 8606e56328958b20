//! Multichannel series types with validation guarantees.

use crate::error::DtwError;

/// Owned, validated multichannel series.
///
/// Stored row-major: sample `i` occupies `data[i * n_channels..(i + 1) * n_channels]`.
/// Guaranteed non-empty, at least one channel, all values finite.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSeries {
    n_channels: usize,
    data: Vec<f64>,
}

impl MultiSeries {
    /// Create a series from a row-major buffer of `n_channels` values per sample.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::NoChannels`] | `n_channels` is zero |
    /// | [`DtwError::EmptySeries`] | `data` is empty |
    /// | [`DtwError::RaggedSample`] | `data.len()` is not a multiple of `n_channels` |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(n_channels: usize, data: Vec<f64>) -> Result<Self, DtwError> {
        validate(n_channels, &data)?;
        Ok(Self { n_channels, data })
    }

    /// Create a single-channel series.
    ///
    /// # Errors
    ///
    /// Same as [`MultiSeries::new`] with one channel.
    pub fn univariate(values: Vec<f64>) -> Result<Self, DtwError> {
        Self::new(1, values)
    }

    /// Create a series from per-sample rows. Every row must have the same length.
    ///
    /// # Errors
    ///
    /// Same as [`MultiSeries::new`]; a row of the wrong width yields
    /// [`DtwError::RaggedSample`].
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, DtwError> {
        let n_channels = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != n_channels) {
            return Err(DtwError::RaggedSample {
                len: bad.len(),
                n_channels,
            });
        }
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(n_channels, data)
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SeriesView<'_> {
        SeriesView::new(self.n_channels, &self.data)
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.n_channels
    }

    /// Return true if the series has no samples.
    ///
    /// Always `false` for series built through the validating constructors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of channels per sample.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }
}

impl TryFrom<Vec<f64>> for MultiSeries {
    type Error = DtwError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::univariate(values)
    }
}

/// Borrowed, validated view into a multichannel series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    n_channels: usize,
    data: &'a [f64],
}

impl<'a> SeriesView<'a> {
    /// `data` must already have passed `validate`.
    pub(crate) fn new(n_channels: usize, data: &'a [f64]) -> Self {
        Self { n_channels, data }
    }

    /// Return the channel values of sample `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[must_use]
    pub fn sample(&self, i: usize) -> &'a [f64] {
        &self.data[i * self.n_channels..(i + 1) * self.n_channels]
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.n_channels
    }

    /// Return true if the view has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of channels per sample.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Return the underlying row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Average adjacent sample pairs into a series of half the length.
    ///
    /// An odd trailing sample is dropped. The caller guarantees `len() >= 2`.
    pub(crate) fn halve(&self) -> MultiSeries {
        let c = self.n_channels;
        let half = self.len() / 2;
        let mut data = Vec::with_capacity(half * c);
        for i in 0..half {
            let lo = self.sample(2 * i);
            let hi = self.sample(2 * i + 1);
            data.extend(lo.iter().zip(hi).map(|(x, y)| (x + y) / 2.0));
        }
        MultiSeries {
            n_channels: c,
            data,
        }
    }
}

fn validate(n_channels: usize, data: &[f64]) -> Result<(), DtwError> {
    if n_channels == 0 {
        return Err(DtwError::NoChannels);
    }
    if data.is_empty() {
        return Err(DtwError::EmptySeries);
    }
    if data.len() % n_channels != 0 {
        return Err(DtwError::RaggedSample {
            len: data.len(),
            n_channels,
        });
    }
    if let Some(flat) = data.iter().position(|v| !v.is_finite()) {
        return Err(DtwError::NonFiniteValue {
            sample: flat / n_channels,
            channel: flat % n_channels,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert!(matches!(MultiSeries::new(2, vec![]), Err(DtwError::EmptySeries)));
    }

    #[test]
    fn rejects_zero_channels() {
        assert!(matches!(MultiSeries::new(0, vec![1.0]), Err(DtwError::NoChannels)));
    }

    #[test]
    fn rejects_ragged_buffer() {
        let result = MultiSeries::new(2, vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(DtwError::RaggedSample { len: 3, n_channels: 2 })
        ));
    }

    #[test]
    fn reports_position_of_nan() {
        let result = MultiSeries::new(2, vec![1.0, 2.0, 3.0, f64::NAN]);
        assert!(matches!(
            result,
            Err(DtwError::NonFiniteValue { sample: 1, channel: 1 })
        ));
    }

    #[test]
    fn from_rows_rejects_mismatched_widths() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            MultiSeries::from_rows(&rows),
            Err(DtwError::RaggedSample { .. })
        ));
    }

    #[test]
    fn sample_access_is_row_major() {
        let rows = [vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let s = MultiSeries::from_rows(&rows).unwrap();
        let v = s.as_view();
        assert_eq!(v.len(), 3);
        assert_eq!(v.n_channels(), 2);
        assert_eq!(v.sample(1), &[2.0, 20.0]);
    }

    #[test]
    fn halve_averages_pairs_and_drops_odd_tail() {
        let s = MultiSeries::univariate(vec![0.0, 2.0, 4.0, 6.0, 100.0]).unwrap();
        let h = s.as_view().halve();
        assert_eq!(h.as_view().as_slice(), &[1.0, 5.0]);
    }

    #[test]
    fn halve_keeps_channels_separate() {
        let s = MultiSeries::from_rows(&[vec![0.0, 10.0], vec![2.0, 30.0]]).unwrap();
        let h = s.as_view().halve();
        assert_eq!(h.as_view().sample(0), &[1.0, 20.0]);
    }

    #[test]
    fn try_from_vec_is_univariate() {
        let s: MultiSeries = vec![1.0, 2.0].try_into().unwrap();
        assert_eq!(s.n_channels(), 1);
        assert_eq!(s.len(), 2);
    }
}
