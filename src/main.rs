use std::path::PathBuf;

use clap::Parser;
use fuzzy_clustering::{PipelineConfig, SeedingPolicy};

/// Cluster a point sample with fuzzy c-means and write per-point labels.
#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Sample file, one point per row
    data: PathBuf,

    /// Label output file (default: cluster_labels_<stem>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of clusters
    #[arg(short = 'k', long, default_value_t = 15)]
    clusters: usize,

    /// Center seeding policy
    #[arg(long, value_enum, default_value = "farthest-candidate")]
    seeding: SeedingPolicy,

    /// Membership exponent (must be greater than 1)
    #[arg(long, default_value_t = 2.0)]
    fuzziness: f64,

    /// Convergence tolerance on the largest center movement
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f64,

    /// Iteration cap
    #[arg(long, default_value_t = 100)]
    max_iterations: u64,

    /// Seed for the random generator driving the center seeding
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let mut config = PipelineConfig::new(opts.data);
    if let Some(output) = opts.output {
        config.output_path = output;
    }
    config.cluster_count = opts.clusters;
    config.seeding_policy = opts.seeding;
    config.fuzziness = opts.fuzziness;
    config.tolerance = opts.tolerance;
    config.max_iterations = opts.max_iterations;
    config.seed = opts.seed;

    let report = config.run()?;

    println!(
        "loaded {} points with {} features from {}",
        report.n_samples,
        report.n_features,
        config.dataset_path.display()
    );
    println!("iteration: {}", report.n_iterations);
    println!(
        "total_iteration_time: {:.3} ms",
        report.total_iteration_time.as_secs_f64() * 1e3
    );
    println!(
        "average_iteration_time: {:.3} ms",
        report.average_iteration_time.as_secs_f64() * 1e3
    );
    println!(
        "classify_time: {:.3} ms",
        report.classification_time.as_secs_f64() * 1e3
    );
    println!("labels written to {}", config.output_path.display());
    println!("success");
    Ok(())
}
