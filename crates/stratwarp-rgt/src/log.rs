//! Well-log data model.

use stratwarp_dtw::MultiSeries;

use crate::error::RgtError;

/// One named measurement channel. `None` marks a missing sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    name: String,
    values: Vec<Option<f64>>,
}

impl Channel {
    /// Return the channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the per-sample values.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Option<f64>] {
        &mut self.values
    }

    /// Iterate over the observed (non-missing) values.
    pub fn observed(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied()
    }

    /// Return the number of missing samples.
    #[must_use]
    pub fn n_missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// A depth-indexed well log.
///
/// Every channel has exactly one value slot per depth sample. After RGT
/// estimation the log also carries one RGT value per depth sample.
#[derive(Debug, Clone, PartialEq)]
pub struct WellLog {
    name: String,
    depths: Vec<f64>,
    channels: Vec<Channel>,
    rgt: Option<Vec<f64>>,
}

impl WellLog {
    /// Create a log with the given depth index and no channels.
    pub fn new(name: impl Into<String>, depths: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            depths,
            channels: Vec::new(),
            rgt: None,
        }
    }

    /// Create a log whose depth index is the sample number `0, 1, .., len-1`.
    pub fn indexed(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, (0..len).map(|i| i as f64).collect())
    }

    /// Add a channel.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::ChannelLengthMismatch`] | `values.len()` differs from the depth count |
    /// | [`RgtError::DuplicateChannel`] | A channel with this name already exists |
    pub fn with_channel(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, RgtError> {
        let name = name.into();
        if values.len() != self.depths.len() {
            return Err(RgtError::ChannelLengthMismatch {
                log: self.name,
                channel: name,
                expected: self.depths.len(),
                got: values.len(),
            });
        }
        if self.channel(&name).is_some() {
            return Err(RgtError::DuplicateChannel {
                log: self.name,
                channel: name,
            });
        }
        self.channels.push(Channel { name, values });
        Ok(self)
    }

    /// Add a channel from raw readings, treating NaN as missing.
    ///
    /// # Errors
    ///
    /// Same as [`WellLog::with_channel`].
    pub fn with_raw_channel(self, name: impl Into<String>, raw: &[f64]) -> Result<Self, RgtError> {
        let values = raw.iter().map(|&v| (!v.is_nan()).then_some(v)).collect();
        self.with_channel(name, values)
    }

    /// Return the log name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the depth of every sample.
    #[must_use]
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// Return the number of depth samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Return true if the log has no depth samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Return all channels in insertion order.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Channel] {
        &mut self.channels
    }

    /// Look up a channel by name.
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Return the channel names in insertion order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }

    /// Return the names of channels present in both logs, sorted.
    #[must_use]
    pub fn shared_channels<'a>(&'a self, other: &WellLog) -> Vec<&'a str> {
        let mut shared: Vec<&str> = self
            .channel_names()
            .filter(|name| other.channel(name).is_some())
            .collect();
        shared.sort_unstable();
        shared
    }

    /// Return the RGT of each depth sample, once estimated.
    #[must_use]
    pub fn rgt(&self) -> Option<&[f64]> {
        self.rgt.as_deref()
    }

    pub(crate) fn set_rgt(&mut self, rgt: Vec<f64>) {
        debug_assert_eq!(rgt.len(), self.len());
        self.rgt = Some(rgt);
    }

    /// Gather the named channels into a row-major series for alignment.
    ///
    /// `index` is this log's position in the input slice and is only used to
    /// label errors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::MissingValue`] | A selected channel has a missing sample |
    /// | [`RgtError::Dtw`] | No channels were selected or the log is empty |
    pub fn samples(&self, index: usize, names: &[&str]) -> Result<MultiSeries, RgtError> {
        let selected: Vec<&Channel> = names.iter().filter_map(|n| self.channel(n)).collect();
        let mut data = Vec::with_capacity(self.len() * selected.len());
        for sample in 0..self.len() {
            for channel in &selected {
                let value = channel.values[sample].ok_or_else(|| RgtError::MissingValue {
                    log: index,
                    channel: channel.name.clone(),
                    sample,
                })?;
                data.push(value);
            }
        }
        Ok(MultiSeries::new(selected.len(), data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> WellLog {
        WellLog::indexed("W1", 3)
            .with_raw_channel("GR", &[1.0, f64::NAN, 3.0])
            .unwrap()
            .with_raw_channel("DT", &[10.0, 20.0, 30.0])
            .unwrap()
    }

    #[test]
    fn raw_nan_becomes_missing() {
        let log = sample_log();
        assert_eq!(log.channel("GR").unwrap().values(), &[Some(1.0), None, Some(3.0)]);
        assert_eq!(log.channel("GR").unwrap().n_missing(), 1);
    }

    #[test]
    fn rejects_length_mismatch() {
        let result = WellLog::indexed("W1", 3).with_raw_channel("GR", &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(RgtError::ChannelLengthMismatch { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_channel() {
        let result = sample_log().with_raw_channel("GR", &[0.0, 0.0, 0.0]);
        assert!(matches!(result, Err(RgtError::DuplicateChannel { .. })));
    }

    #[test]
    fn shared_channels_are_sorted_intersection() {
        let a = sample_log();
        let b = WellLog::indexed("W2", 2)
            .with_raw_channel("RHOB", &[1.0, 2.0])
            .unwrap()
            .with_raw_channel("GR", &[1.0, 2.0])
            .unwrap()
            .with_raw_channel("DT", &[1.0, 2.0])
            .unwrap();
        assert_eq!(a.shared_channels(&b), vec!["DT", "GR"]);
    }

    #[test]
    fn samples_are_row_major_in_requested_order() {
        let log = WellLog::indexed("W", 2)
            .with_raw_channel("A", &[1.0, 2.0])
            .unwrap()
            .with_raw_channel("B", &[10.0, 20.0])
            .unwrap();
        let s = log.samples(0, &["B", "A"]).unwrap();
        assert_eq!(s.as_view().as_slice(), &[10.0, 1.0, 20.0, 2.0]);
    }

    #[test]
    fn samples_reject_missing_values() {
        let result = sample_log().samples(4, &["GR"]);
        assert!(matches!(
            result,
            Err(RgtError::MissingValue { log: 4, sample: 1, .. })
        ));
    }

    #[test]
    fn indexed_depths_count_samples() {
        let log = WellLog::indexed("W", 4);
        assert_eq!(log.depths(), &[0.0, 1.0, 2.0, 3.0]);
        assert!(log.rgt().is_none());
    }
}
