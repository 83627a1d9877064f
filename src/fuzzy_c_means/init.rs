use linfa::Float;
use linfa_nn::distance::Distance;
use ndarray::{s, Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix1, Ix2, Zip};
use ndarray_rand::rand;
use ndarray_rand::rand::distributions::{Distribution, WeightedIndex};
use ndarray_rand::rand::Rng;
use ndarray_stats::QuantileExt;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Specifies how the initial cluster centers are seeded from the sample.
pub enum CenterInit<F: Float> {
    /// Pick centers uniformly at random among the observations.
    Random,
    /// Standard k-means++: pick the first center uniformly at random, then
    /// sample each subsequent center with probability proportional to the
    /// squared distance to its nearest already-chosen center.
    KMeansPlusPlus,
    /// Deterministic k-means++ variant: instead of sampling, always take the
    /// single observation farthest from the already-chosen centers.
    FarthestCandidate,
    /// Use the given centers verbatim.
    Precomputed(Array2<F>),
}

impl<F: Float> CenterInit<F> {
    pub(crate) fn run<D: Distance<F>>(
        &self,
        dist_fn: &D,
        n_clusters: usize,
        observations: ArrayView2<F>,
        rng: &mut impl Rng,
    ) -> Array2<F> {
        match self {
            Self::Random => random_init(n_clusters, observations, rng),
            Self::KMeansPlusPlus => k_means_pp(dist_fn, n_clusters, observations, rng),
            Self::FarthestCandidate => farthest_candidate(dist_fn, n_clusters, observations, rng),
            Self::Precomputed(centroids) => centroids.clone(),
        }
    }
}

fn random_init<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, _) = observations.dim();
    let indices = rand::seq::index::sample(rng, n_samples, n_clusters).into_vec();
    observations.select(Axis(0), &indices)
}

fn k_means_pp<F: Float, D: Distance<F>>(
    dist_fn: &D,
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    centroids
        .row_mut(0)
        .assign(&observations.row(rng.gen_range(0..n_samples)));

    let mut dists = Array1::zeros(n_samples);
    for c_cnt in 1..n_clusters {
        update_min_dists(
            dist_fn,
            &centroids.slice(s![0..c_cnt, ..]),
            &observations,
            &mut dists,
        );
        let centroid_idx = WeightedIndex::new(dists.iter())
            .expect("invalid weights")
            .sample(rng);
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));
    }
    centroids
}

fn farthest_candidate<F: Float, D: Distance<F>>(
    dist_fn: &D,
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    centroids
        .row_mut(0)
        .assign(&observations.row(rng.gen_range(0..n_samples)));

    let mut dists = Array1::zeros(n_samples);
    for c_cnt in 1..n_clusters {
        update_min_dists(
            dist_fn,
            &centroids.slice(s![0..c_cnt, ..]),
            &observations,
            &mut dists,
        );
        let centroid_idx = dists.argmax().expect("non-empty distances");
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));
    }
    centroids
}

// Updates `dists` with the distance of each observation from its closest
// centroid.
fn update_min_dists<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayView2<F>,
    dists: &mut Array1<F>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(dists)
        .for_each(|observation, dist| {
            *dist = closest_centroid(dist_fn, centroids, &observation).1
        });
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an
/// observation, return the index of the closest centroid and its rdistance.
fn closest_centroid<F: Float, D: Distance<F>>(
    dist_fn: &D,
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let first_centroid = centroids.row(0);
    let (mut closest_index, mut minimum_distance) = (
        0,
        dist_fn.rdistance(first_centroid.view(), observation.view()),
    );

    for (centroid_index, centroid) in centroids.rows().into_iter().enumerate() {
        let distance = dist_fn.rdistance(centroid.view(), observation.view());
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}
