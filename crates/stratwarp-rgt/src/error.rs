use stratwarp_dtw::DtwError;

/// Errors from RGT estimation.
#[derive(Debug, thiserror::Error)]
pub enum RgtError {
    /// Returned when fewer than two logs are supplied.
    #[error("need at least 2 logs to estimate RGT, got {n_logs}")]
    TooFewLogs {
        /// Number of logs provided.
        n_logs: usize,
    },

    /// Returned when a log has no depth samples.
    #[error("log {index} has no samples")]
    EmptyLog {
        /// Index of the empty log in the input slice.
        index: usize,
    },

    /// Returned when two logs have no channel in common.
    #[error("logs {i} and {j} share no channels")]
    NoSharedChannels {
        /// Index of the first log.
        i: usize,
        /// Index of the second log.
        j: usize,
    },

    /// Returned when a channel's length differs from its log's depth index.
    #[error("channel \"{channel}\" of log \"{log}\" has {got} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Log name.
        log: String,
        /// Channel name.
        channel: String,
        /// Number of depth samples in the log.
        expected: usize,
        /// Number of values supplied for the channel.
        got: usize,
    },

    /// Returned when a log already has a channel with the same name.
    #[error("log \"{log}\" already has a channel named \"{channel}\"")]
    DuplicateChannel {
        /// Log name.
        log: String,
        /// Duplicated channel name.
        channel: String,
    },

    /// Returned when a missing value reaches alignment. Run the fill-missing
    /// preparation step first.
    #[error("log {log} has a missing value in channel \"{channel}\" at sample {sample}")]
    MissingValue {
        /// Index of the log.
        log: usize,
        /// Channel holding the missing value.
        channel: String,
        /// Depth sample index.
        sample: usize,
    },

    /// Returned when a warping path does not fit the preallocated path table.
    /// Raise the path multiplier.
    #[error("path between logs {i} and {j} has {len} steps, exceeding capacity {capacity}")]
    PathCapacityExceeded {
        /// Index of the first log.
        i: usize,
        /// Index of the second log.
        j: usize,
        /// Length of the offending path.
        len: usize,
        /// Preallocated path capacity.
        capacity: usize,
    },

    /// Returned when the constraint matrix needs more nonzeros than were
    /// preallocated. Raise the row multiplier.
    #[error("constraint matrix needs at least {required} nonzeros, capacity is {capacity}")]
    NonzeroCapacityExceeded {
        /// Nonzero count reached when the buffer overflowed.
        required: usize,
        /// Preallocated nonzero capacity.
        capacity: usize,
    },

    /// Returned when faer rejects the assembled constraint entries.
    #[error("cannot assemble sparse constraint matrix: {reason}")]
    SparseAssembly {
        /// faer's description of the failure.
        reason: String,
    },

    /// Returned when a sizing multiplier is not a positive finite number.
    #[error("{name} must be positive and finite, got {value}")]
    InvalidMultiplier {
        /// Which multiplier was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when the dRGT lower bound is not a positive finite number.
    /// A bound at or below zero would allow RGT to stall or decrease with
    /// depth.
    #[error("lower bound must be positive and finite, got {value}")]
    InvalidLowerBound {
        /// The rejected bound.
        value: f64,
    },

    /// Returned when the solver iteration budget is zero.
    #[error("solver iteration budget must be at least 1")]
    InvalidIterationBudget,

    /// Returned when the solver tolerance is not a non-negative finite number.
    #[error("solver tolerance must be non-negative and finite, got {value}")]
    InvalidTolerance {
        /// The rejected tolerance.
        value: f64,
    },

    /// Returned by [`RgtResult::require_converged`](crate::RgtResult::require_converged)
    /// when the solver stopped on its iteration budget.
    #[error(
        "bounded least-squares solve did not converge in {iterations} iterations (cost {cost})"
    )]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
        /// Cost of the best iterate.
        cost: f64,
    },

    /// Wraps an error from warping-path computation.
    #[error("DTW error: {0}")]
    Dtw(#[from] DtwError),
}

/// Errors from log preparation.
#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    /// Returned when a channel's interquartile range is zero, so it cannot
    /// be scaled to unit spread.
    #[error("channel \"{channel}\" of log {log} has zero interquartile range")]
    ZeroSpread {
        /// Index of the log.
        log: usize,
        /// Channel name.
        channel: String,
    },
}
