use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use linfa::traits::Fit;
use linfa::DatasetBase;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use thiserror::Error;

use crate::fuzzy_c_means::{CenterInit, FcmError, FuzzyCMeans};
use crate::labels::{labels_from_clusters, write_labels, LabelError};
use crate::sample::{read_sample, SampleError};

/// An error from one of the pipeline stages
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to load the sample: {0}")]
    Sample(#[from] SampleError),
    #[error("clustering failed: {0}")]
    Clustering(#[from] FcmError),
    #[error("failed to write the labels: {0}")]
    Labels(#[from] LabelError),
}

/// The center seeding heuristic handed to the clusterer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeedingPolicy {
    /// Centers drawn uniformly from the sample
    Random,
    /// Probabilistic k-means++
    KMeansPlusPlus,
    /// Deterministic k-means++, always taking the farthest candidate
    FarthestCandidate,
}

impl SeedingPolicy {
    fn init_method(self) -> CenterInit<f64> {
        match self {
            SeedingPolicy::Random => CenterInit::Random,
            SeedingPolicy::KMeansPlusPlus => CenterInit::KMeansPlusPlus,
            SeedingPolicy::FarthestCandidate => CenterInit::FarthestCandidate,
        }
    }
}

/// Everything the labeling pipeline needs, in one place.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Sample file to cluster
    pub dataset_path: PathBuf,
    /// Where the label file goes
    pub output_path: PathBuf,
    /// Number of clusters to look for
    pub cluster_count: usize,
    /// How the initial centers are seeded
    pub seeding_policy: SeedingPolicy,
    /// Membership exponent of the clusterer
    pub fuzziness: f64,
    /// Convergence tolerance on the largest center movement
    pub tolerance: f64,
    /// Iteration cap of the clusterer
    pub max_iterations: u64,
    /// Seed of the random generator driving the center seeding
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("../DataSet/S1.csv"),
            output_path: PathBuf::from("cluster_labels_S1.csv"),
            cluster_count: 15,
            seeding_policy: SeedingPolicy::FarthestCandidate,
            fuzziness: 2.0,
            tolerance: 1e-3,
            max_iterations: 100,
            seed: 42,
        }
    }
}

impl PipelineConfig {
    /// A configuration for clustering `dataset_path`, with the label file
    /// named `cluster_labels_<stem>.csv` in the working directory.
    pub fn new<P: Into<PathBuf>>(dataset_path: P) -> Self {
        let dataset_path = dataset_path.into();
        let output_path = output_path_for(&dataset_path);
        Self {
            dataset_path,
            output_path,
            ..Self::default()
        }
    }

    /// Run the pipeline: load the sample, seed and fit the clusterer, flatten
    /// the partition into labels and write them to the output file.
    ///
    /// Any stage failure aborts the run; a partially written output file is
    /// left as is.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let sample = read_sample(&self.dataset_path)?;
        let dataset = DatasetBase::from(sample);
        let (n_samples, n_features) = dataset.records().dim();

        let rng = Xoshiro256Plus::seed_from_u64(self.seed);
        let model = FuzzyCMeans::params_with_rng(self.cluster_count, rng)
            .init_method(self.seeding_policy.init_method())
            .fuzziness(self.fuzziness)
            .tolerance(self.tolerance)
            .max_n_iterations(self.max_iterations)
            .fit(&dataset)?;

        let labels = labels_from_clusters(model.clusters(), n_samples)?;
        write_labels(&self.output_path, &labels)?;

        Ok(PipelineReport {
            n_samples,
            n_features,
            n_iterations: model.n_iterations(),
            total_iteration_time: model.total_iteration_time(),
            average_iteration_time: model.average_iteration_time(),
            classification_time: model.classification_time(),
        })
    }
}

fn output_path_for(dataset_path: &Path) -> PathBuf {
    let stem = dataset_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("sample"));
    PathBuf::from(format!("cluster_labels_{}.csv", stem))
}

/// What a pipeline run reports back: the sample shape and the clusterer's
/// iteration count and timing figures.
#[derive(Clone, Debug)]
pub struct PipelineReport {
    pub n_samples: usize,
    pub n_features: usize,
    pub n_iterations: u64,
    pub total_iteration_time: Duration,
    pub average_iteration_time: Duration,
    pub classification_time: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_targets_the_s1_dataset() {
        let config = PipelineConfig::default();
        assert_eq!(config.dataset_path, PathBuf::from("../DataSet/S1.csv"));
        assert_eq!(config.output_path, PathBuf::from("cluster_labels_S1.csv"));
        assert_eq!(config.cluster_count, 15);
        assert_eq!(config.seeding_policy, SeedingPolicy::FarthestCandidate);
        assert_eq!(config.fuzziness, 2.0);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn output_name_derives_from_the_dataset_stem() {
        let config = PipelineConfig::new("data/S2.txt");
        assert_eq!(config.output_path, PathBuf::from("cluster_labels_S2.csv"));
    }
}
