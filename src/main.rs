use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use stratwarp_io::{DistanceSummary, ExperimentName, ResultWriter, RunSummary, read_log};
use stratwarp_rgt::{PrepareConfig, RgtConfig, SampleMetric, WellLog};

#[derive(Parser)]
#[command(name = "stratwarp")]
#[command(about = "Relative geologic time estimation from multichannel well-log warping")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for filling missing samples
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Log per-pair and per-iteration detail
    #[arg(long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for pairwise alignment (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Inputs and alignment parameters shared by every subcommand.
#[derive(Args, Debug, Clone)]
struct AlignArgs {
    /// Log files to align (.las or .csv), at least two
    #[arg(long, num_args = 2.., required = true)]
    logs: Vec<PathBuf>,

    /// Prefix for every artifact written, from [a-zA-Z0-9_-]
    #[arg(long)]
    experiment: String,

    /// Directory receiving the artifacts (created if absent)
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Order of the per-sample p-norm (fractional values allowed, "inf" for max)
    #[arg(long, default_value_t = 0.125)]
    p: f64,

    /// FastDTW refinement radius
    #[arg(long, default_value_t = 1)]
    radius: usize,

    /// Path-table capacity as a multiple of the longest log
    #[arg(long, default_value_t = 1.5)]
    path_multiplier: f64,

    /// Skip median/IQR normalization of each channel
    #[arg(long, default_value_t = false)]
    no_normalize: bool,

    /// Skip filling missing samples with random values
    #[arg(long, default_value_t = false)]
    no_fill_missing: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate RGT for every log and write curves and a run summary
    Align {
        #[command(flatten)]
        align: AlignArgs,

        /// Maximum solver iterations
        #[arg(long)]
        max_iter: Option<usize>,

        /// Nonzero budget per constraint row as a multiple of the longest log
        #[arg(long, default_value_t = 2.0)]
        row_multiplier: f64,

        /// Minimum RGT increment per sample
        #[arg(long, default_value_t = 1.0)]
        lower_bound: f64,

        /// Fail if the solver stops on its iteration budget
        #[arg(long, default_value_t = false)]
        require_convergence: bool,
    },

    /// Compute pairwise warping distances and path lengths only
    Distances {
        #[command(flatten)]
        align: AlignArgs,
    },
}

// --- summaries printed to stdout ---

#[derive(Serialize)]
struct AlignOutput {
    experiment: String,
    n_logs: usize,
    n_samples: usize,
    converged: bool,
    iterations: usize,
    cost: f64,
    rgt_path: PathBuf,
    summary_path: PathBuf,
}

#[derive(Serialize)]
struct DistancesOutput {
    experiment: String,
    n_logs: usize,
    distances: Vec<Vec<f64>>,
    distances_path: PathBuf,
}

/// Load every log and apply the requested preparation.
fn load_logs(args: &AlignArgs, seed: u64) -> Result<Vec<WellLog>> {
    let mut logs = args
        .logs
        .iter()
        .map(|path| read_log(path).with_context(|| format!("failed to read {}", path.display())))
        .collect::<Result<Vec<_>>>()?;
    info!(n_logs = logs.len(), "logs loaded");

    PrepareConfig::default()
        .with_normalize(!args.no_normalize)
        .with_fill_missing(!args.no_fill_missing)
        .with_seed(seed)
        .apply(&mut logs)
        .context("log preparation failed")?;
    Ok(logs)
}

fn base_config(args: &AlignArgs) -> Result<RgtConfig> {
    let metric = SampleMetric::norm(args.p).context("invalid --p")?;
    Ok(RgtConfig::new()
        .with_metric(metric)
        .with_radius(args.radius)
        .with_path_multiplier(args.path_multiplier))
}

/// Full estimation settings, checked before any log is read.
fn estimate_config(
    args: &AlignArgs,
    max_iter: Option<usize>,
    row_multiplier: f64,
    lower_bound: f64,
) -> Result<RgtConfig> {
    let mut config = base_config(args)?
        .with_row_multiplier(row_multiplier)
        .with_lower_bound(lower_bound);
    if let Some(max_iter) = max_iter {
        config = config.with_max_iter(max_iter);
    }
    config.validate().context("invalid solver settings")?;
    Ok(config)
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("cannot size the alignment thread pool")?;
        info!(threads, "alignment threads set");
    }

    match cli.command {
        Command::Align {
            align,
            max_iter,
            row_multiplier,
            lower_bound,
            require_convergence,
        } => {
            let config = estimate_config(&align, max_iter, row_multiplier, lower_bound)?;

            let experiment = ExperimentName::new(align.experiment.clone())?;
            let writer = ResultWriter::new(&align.output_dir, experiment.clone())?;
            let mut logs = load_logs(&align, cli.seed)?;

            let mut result = config.estimate(&mut logs).context("RGT estimation failed")?;
            if require_convergence {
                result = result.require_converged()?;
            }

            let rgt_path = writer.write_rgt(&logs)?;
            let summary = RunSummary::new(&experiment, &logs, &result);
            let summary_path = writer.write_summary(&summary)?;

            let report = result.report();
            let output = AlignOutput {
                experiment: experiment.as_str().to_string(),
                n_logs: logs.len(),
                n_samples: logs.iter().map(WellLog::len).sum(),
                converged: report.converged,
                iterations: report.iterations,
                cost: report.cost,
                rgt_path,
                summary_path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Distances { align } => {
            let experiment = ExperimentName::new(align.experiment.clone())?;
            let writer = ResultWriter::new(&align.output_dir, experiment.clone())?;
            let logs = load_logs(&align, cli.seed)?;

            let alignment = base_config(&align)?
                .distances(&logs)
                .context("pairwise alignment failed")?;
            let summary =
                DistanceSummary::new(&experiment, &logs, &alignment.distances, &alignment.paths);
            let distances_path = writer.write_distances(&summary)?;

            let output = DistancesOutput {
                experiment: experiment.as_str().to_string(),
                n_logs: logs.len(),
                distances: summary.distances,
                distances_path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use stratwarp_rgt::RgtError;

    fn align_args(extra: &[&str]) -> Command {
        let base = ["stratwarp", "align", "--logs", "a.las", "b.las", "--experiment", "run"];
        Cli::try_parse_from(base.iter().chain(extra)).unwrap().command
    }

    fn config_from(command: Command) -> Result<RgtConfig> {
        match command {
            Command::Align {
                align,
                max_iter,
                row_multiplier,
                lower_bound,
                ..
            } => estimate_config(&align, max_iter, row_multiplier, lower_bound),
            Command::Distances { .. } => unreachable!(),
        }
    }

    #[test]
    fn default_align_settings_are_valid() {
        let config = config_from(align_args(&[])).unwrap();
        assert_eq!(config.radius(), 1);
    }

    #[test]
    fn non_positive_lower_bound_flag_is_rejected() {
        for flag in ["--lower-bound=0", "--lower-bound=-1"] {
            let err = config_from(align_args(&[flag])).unwrap_err();
            let cause = err.downcast_ref::<RgtError>();
            assert!(
                matches!(cause, Some(RgtError::InvalidLowerBound { .. })),
                "{flag}: {err:#}"
            );
        }
    }
}
