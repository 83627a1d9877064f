use std::fs;
use std::path::PathBuf;

use fuzzy_clustering::{PipelineConfig, PipelineError, SampleError};

const TWO_PAIRS: &str = "0.0,0.0\n0.1,0.0\n10.0,10.0\n10.1,10.0\n";

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fuzzy-clustering-{}-{}", std::process::id(), name))
}

fn write_sample(name: &str, contents: &str) -> PathBuf {
    let path = scratch_path(name);
    fs::write(&path, contents).unwrap();
    path
}

fn pair_config(name: &str) -> PipelineConfig {
    let mut config = PipelineConfig::new(write_sample(&format!("{}.csv", name), TWO_PAIRS));
    config.output_path = scratch_path(&format!("{}-labels.csv", name));
    config.cluster_count = 2;
    config
}

#[test]
fn two_pairs_get_two_clusters() {
    let config = pair_config("two-pairs");
    let report = config.run().unwrap();
    assert_eq!(report.n_samples, 4);
    assert_eq!(report.n_features, 2);
    assert!(report.n_iterations >= 1);

    let contents = fs::read_to_string(&config.output_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Cluster_Labels");

    let labels: Vec<i64> = lines[1..].iter().map(|line| line.parse().unwrap()).collect();
    assert!(labels.iter().all(|&label| label == 0 || label == 1));
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[2], labels[3]);
    assert_ne!(labels[0], labels[2]);
}

#[test]
fn reruns_produce_identical_label_files() {
    let config = pair_config("rerun-a");
    config.run().unwrap();
    let first = fs::read_to_string(&config.output_path).unwrap();

    let mut again = config.clone();
    again.output_path = scratch_path("rerun-b-labels.csv");
    again.run().unwrap();
    let second = fs::read_to_string(&again.output_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn empty_input_is_a_sample_error() {
    let mut config = PipelineConfig::new(write_sample("empty.csv", ""));
    config.output_path = scratch_path("empty-labels.csv");
    config.cluster_count = 2;

    match config.run() {
        Err(PipelineError::Sample(SampleError::Empty)) => {}
        other => panic!("expected an empty-sample error, got {:?}", other),
    }
    assert!(!config.output_path.exists());
}

#[test]
fn missing_input_is_a_sample_error() {
    let mut config = PipelineConfig::new(scratch_path("never-written.csv"));
    config.output_path = scratch_path("never-written-labels.csv");

    match config.run() {
        Err(PipelineError::Sample(SampleError::Io(_))) => {}
        other => panic!("expected an io error, got {:?}", other),
    }
}

#[test]
fn requesting_more_clusters_than_points_fails() {
    let mut config = pair_config("too-many");
    config.cluster_count = 10;

    match config.run() {
        Err(PipelineError::Clustering(_)) => {}
        other => panic!("expected a clustering error, got {:?}", other),
    }
}

#[test]
fn whitespace_delimited_samples_also_load() {
    let mut config = PipelineConfig::new(write_sample(
        "whitespace.csv",
        "  0.0   0.0\n  0.1   0.0\n  10.0   10.0\n  10.1   10.0\n",
    ));
    config.output_path = scratch_path("whitespace-labels.csv");
    config.cluster_count = 2;

    let report = config.run().unwrap();
    assert_eq!(report.n_samples, 4);
    assert_eq!(report.n_features, 2);
}
