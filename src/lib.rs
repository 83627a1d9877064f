//! `fuzzy-clustering` provides a pure Rust implementation of the fuzzy
//! c-means (FCM) soft-clustering algorithm, together with the small pipeline
//! built on top of it: load a point sample from a delimited file, seed
//! initial centers with a k-means++ heuristic, cluster, and write one hard
//! label per point to a CSV file.
//!
//! ## The big picture
//!
//! * [FuzzyCMeans] — the clustering algorithm itself, configured through the
//!   builder pattern and fitted via the `linfa` [Fit](linfa::traits::Fit)
//!   trait. The fitted model exposes the final centers, the membership
//!   matrix, the hard partition and the iteration/timing figures.
//! * [CenterInit] — center seeding strategies: uniform random, k-means++,
//!   its deterministic farthest-candidate variant, and precomputed centers.
//! * [read_sample] / [write_labels] — the file formats at both ends of the
//!   pipeline.
//! * [PipelineConfig] — the whole load → seed → cluster → label run behind
//!   one configuration structure; the `fcm` binary is a thin CLI over it.
mod fuzzy_c_means;
mod labels;
mod pipeline;
mod sample;
mod utils;

pub use crate::fuzzy_c_means::*;
pub use crate::labels::*;
pub use crate::pipeline::*;
pub use crate::sample::*;
pub use crate::utils::*;
