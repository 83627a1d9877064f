use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use ndarray::Array1;
use thiserror::Error;

/// An error when turning a cluster assignment into per-point labels or when
/// writing them out
#[derive(Error, Debug)]
pub enum LabelError {
    /// When two clusters claim the same point. A sound assignment is a
    /// partition; resolving the conflict silently would make the labels
    /// depend on cluster order.
    #[error("point {index} is claimed by clusters {first} and {second}")]
    Overlap {
        index: usize,
        first: usize,
        second: usize,
    },
    /// When a cluster references a point the sample does not have
    #[error("cluster {cluster} references point {index}, but the sample holds {n_samples} points")]
    OutOfBounds {
        cluster: usize,
        index: usize,
        n_samples: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Flatten a cluster assignment into one label per point: the label of a
/// point is the position of the cluster containing it; points covered by no
/// cluster stay `None`.
pub fn labels_from_clusters(
    clusters: &[Vec<usize>],
    n_samples: usize,
) -> Result<Array1<Option<usize>>, LabelError> {
    let mut labels = Array1::from_elem(n_samples, None);
    for (cluster, members) in clusters.iter().enumerate() {
        for &index in members {
            if index >= n_samples {
                return Err(LabelError::OutOfBounds {
                    cluster,
                    index,
                    n_samples,
                });
            }
            if let Some(first) = labels[index] {
                return Err(LabelError::Overlap {
                    index,
                    first,
                    second: cluster,
                });
            }
            labels[index] = Some(cluster);
        }
    }
    Ok(labels)
}

/// Write the labels to `path`, one integer per line behind a
/// `Cluster_Labels` header. Unassigned points are written as `-1`.
///
/// The destination file is created or overwritten.
pub fn write_labels<P: AsRef<Path>>(
    path: P,
    labels: &Array1<Option<usize>>,
) -> Result<(), LabelError> {
    write_labels_to(File::create(path)?, labels)
}

/// Like [`write_labels`], but serializes into any writer.
pub fn write_labels_to<W: Write>(
    writer: W,
    labels: &Array1<Option<usize>>,
) -> Result<(), LabelError> {
    let mut writer = WriterBuilder::new().delimiter(b',').from_writer(writer);
    writer.write_record(&["Cluster_Labels"])?;
    for &label in labels {
        let value = label.map(|cluster| cluster as i64).unwrap_or(-1);
        writer.write_record(&[value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
