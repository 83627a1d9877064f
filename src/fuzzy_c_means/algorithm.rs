use std::time::{Duration, Instant};

use crate::fuzzy_c_means::errors::{FcmError, Result};
use crate::fuzzy_c_means::hyperparams::{FuzzyCMeansParams, FuzzyCMeansValidParams};
use crate::fuzzy_c_means::init::CenterInit;
use linfa::{prelude::*, DatasetBase, Float};
use linfa_nn::distance::{Distance, L2Dist};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix1, Ix2, Zip};
use ndarray_rand::rand::{Rng, SeedableRng};
use ndarray_stats::QuantileExt;
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Fuzzy c-means (FCM) clusters a set of observations softly: instead of a
/// single hard assignment, every observation holds a degree of membership in
/// each cluster, and every cluster center is the membership-weighted mean of
/// all observations.
///
/// ## The algorithm
///
/// Fitting starts from a set of initial centers produced by one of the
/// [seeding strategies](CenterInit) and then alternates two steps:
///
/// - membership update: the membership of observation *i* in cluster *j* is
///   the inverse of `Σ_k (d_ij / d_ik)^(2 / (m - 1))`, where `d` are the
///   squared distances between observations and centers and `m` is the
///   `fuzziness` exponent. An observation sitting exactly on a center keeps
///   full membership there.
/// - center update: each center moves to the membership-weighted mean of all
///   observations; the step's change is the largest distance any center
///   moved.
///
/// The loop stops once the change drops to `tolerance` or after
/// `max_n_iterations`, whichever comes first. Hitting the iteration cap is
/// not an error: the last iterate is returned. The fitted model records how
/// long the iteration loop ran, and how long the final hard-partition
/// extraction (per-observation argmax over memberships) took.
///
/// ## Tutorial
///
/// ```
/// use linfa::DatasetBase;
/// use linfa::traits::{Fit, Predict};
/// use fuzzy_clustering::{generate_blobs, CenterInit, FuzzyCMeans};
/// use ndarray::array;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// // Our random number generator, seeded for reproducibility
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
///
/// // Three blobs of a hundred points each around known centroids
/// let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
/// let dataset = DatasetBase::from(generate_blobs(100, &expected_centroids, &mut rng));
///
/// let model = FuzzyCMeans::params_with_rng(3, rng)
///     .init_method(CenterInit::FarthestCandidate)
///     .tolerance(1e-3)
///     .fit(&dataset)
///     .expect("fuzzy c-means fitted");
///
/// // Every training observation has a membership row across the clusters...
/// assert_eq!(model.memberships().dim(), (300, 3));
/// // ...and the hard partition covers all of them
/// assert_eq!(model.clusters().iter().map(Vec::len).sum::<usize>(), 300);
///
/// // New observations are assigned to the cluster they belong to the most
/// let dataset = model.predict(dataset);
/// assert_eq!(dataset.targets().len(), 300);
/// ```
pub struct FuzzyCMeans<F: Float, D: Distance<F>> {
    centroids: Array2<F>,
    memberships: Array2<F>,
    clusters: Vec<Vec<usize>>,
    fuzziness: F,
    n_iterations: u64,
    total_iteration_time: Duration,
    classification_time: Duration,
    dist_fn: D,
}

impl<F: Float> FuzzyCMeans<F, L2Dist> {
    pub fn params(n_clusters: usize) -> FuzzyCMeansParams<F, Xoshiro256Plus, L2Dist> {
        FuzzyCMeansParams::new(n_clusters, Xoshiro256Plus::seed_from_u64(42), L2Dist)
    }

    pub fn params_with_rng<R: Rng>(n_clusters: usize, rng: R) -> FuzzyCMeansParams<F, R, L2Dist> {
        FuzzyCMeansParams::new(n_clusters, rng, L2Dist)
    }
}

impl<F: Float, D: Distance<F>> FuzzyCMeans<F, D> {
    pub fn params_with<R: Rng>(n_clusters: usize, rng: R, dist_fn: D) -> FuzzyCMeansParams<F, R, D> {
        FuzzyCMeansParams::new(n_clusters, rng, dist_fn)
    }

    /// Return the set of centers as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Return the membership matrix of the training observations, with shape
    /// `(n_observations, n_centroids)`.
    pub fn memberships(&self) -> &Array2<F> {
        &self.memberships
    }

    /// Return the hard partition of the training observations: cluster `c`
    /// holds the indices of the observations whose membership attains its
    /// maximum in column `c`.
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// The membership exponent the model was fitted with.
    pub fn fuzziness(&self) -> F {
        self.fuzziness
    }

    /// Number of iterations the fitting loop actually ran.
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }

    /// Wall-clock time spent in the fitting loop.
    pub fn total_iteration_time(&self) -> Duration {
        self.total_iteration_time
    }

    /// Wall-clock time spent in the fitting loop, averaged per iteration.
    pub fn average_iteration_time(&self) -> Duration {
        self.total_iteration_time / self.n_iterations.max(1) as u32
    }

    /// Wall-clock time spent extracting the hard partition from the
    /// memberships.
    pub fn classification_time(&self) -> Duration {
        self.classification_time
    }

    fn memberships_for(&self, observations: &ArrayView2<F>) -> Array2<F> {
        let mut memberships = Array2::zeros((observations.nrows(), self.centroids.nrows()));
        update_memberships(
            &self.dist_fn,
            membership_exponent(self.fuzziness),
            &self.centroids,
            observations,
            &mut memberships,
        );
        memberships
    }
}

impl<F: Float, R: Rng + SeedableRng + Clone, DA: Data<Elem = F>, T, D: Distance<F>>
    Fit<ArrayBase<DA, Ix2>, T, FcmError> for FuzzyCMeansValidParams<F, R, D>
{
    type Object = FuzzyCMeans<F, D>;

    /// Given an input matrix `observations`, with shape
    /// `(n_observations, n_features)`, `fit` seeds `n_clusters` centers and
    /// refines memberships and centers until convergence.
    ///
    /// An instance of `FuzzyCMeans` is returned.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>) -> Result<Self::Object> {
        let observations = dataset.records().view();
        let (n_samples, n_features) = observations.dim();
        let n_clusters = self.n_clusters();

        if n_samples == 0 {
            return Err(FcmError::EmptyDataset);
        }
        if n_clusters > n_samples {
            return Err(FcmError::TooManyClusters {
                n_clusters,
                n_samples,
            });
        }
        if let CenterInit::Precomputed(centroids) = self.init_method() {
            if centroids.dim() != (n_clusters, n_features) {
                return Err(FcmError::InvalidCentroids {
                    expected: (n_clusters, n_features),
                    actual: centroids.dim(),
                });
            }
        }

        let mut rng = self.rng().clone();
        let mut centroids = self
            .init_method()
            .run(self.dist_fn(), n_clusters, observations, &mut rng);

        let exponent = membership_exponent(self.fuzziness());
        let mut memberships = Array2::zeros((n_samples, n_clusters));
        let mut change = F::infinity();
        let mut n_iterations = 0;

        let start = Instant::now();
        while n_iterations < self.max_n_iterations() && change > self.tolerance() {
            update_memberships(
                self.dist_fn(),
                exponent,
                &centroids,
                &observations,
                &mut memberships,
            );
            change = update_centroids(self.dist_fn(), &observations, &memberships, &mut centroids)?;
            n_iterations += 1;
        }
        let total_iteration_time = start.elapsed();

        let start = Instant::now();
        let clusters = extract_clusters(&memberships)?;
        let classification_time = start.elapsed();

        Ok(FuzzyCMeans {
            centroids,
            memberships,
            clusters,
            fuzziness: self.fuzziness(),
            n_iterations,
            total_iteration_time,
            classification_time,
            dist_fn: self.dist_fn().clone(),
        })
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> Transformer<&ArrayBase<DA, Ix2>, Array2<F>>
    for FuzzyCMeans<F, D>
{
    /// Given an input matrix `observations`, with shape
    /// `(n_observations, n_features)`, `transform` returns, for each
    /// observation, its degree of membership in each cluster.
    fn transform(&self, observations: &ArrayBase<DA, Ix2>) -> Array2<F> {
        self.memberships_for(&observations.view())
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> PredictInplace<ArrayBase<DA, Ix2>, Array1<usize>>
    for FuzzyCMeans<F, D>
{
    /// Given an input matrix `observations`, with shape
    /// `(n_observations, n_features)`, `predict` returns, for each
    /// observation, the index of the cluster it belongs to the most.
    ///
    /// You can retrieve the center associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observations: &ArrayBase<DA, Ix2>, targets: &mut Array1<usize>) {
        assert_eq!(
            observations.nrows(),
            targets.len(),
            "The number of data points must match the number of targets."
        );

        let memberships = self.memberships_for(&observations.view());
        Zip::from(memberships.rows())
            .and(targets)
            .for_each(|membership, target| *target = membership.argmax().unwrap());
    }

    fn default_target(&self, x: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, DA: Data<Elem = F>, D: Distance<F>> PredictInplace<ArrayBase<DA, Ix1>, usize>
    for FuzzyCMeans<F, D>
{
    /// Given one input observation, return the index of the cluster it
    /// belongs to the most.
    fn predict_inplace(&self, observation: &ArrayBase<DA, Ix1>, target: &mut usize) {
        let observations = observation.view().insert_axis(Axis(0));
        let memberships = self.memberships_for(&observations);
        *target = memberships.row(0).argmax().unwrap();
    }

    fn default_target(&self, _x: &ArrayBase<DA, Ix1>) -> usize {
        0
    }
}

fn membership_exponent<F: Float>(fuzziness: F) -> F {
    F::cast(2.) / (fuzziness - F::one())
}

/// Recompute the membership of every observation in every cluster from the
/// current centers.
///
/// An observation coinciding with a center contributes a degenerate zero
/// divider; it keeps full membership in that cluster.
fn update_memberships<F: Float, D: Distance<F>>(
    dist_fn: &D,
    exponent: F,
    centroids: &Array2<F>,
    observations: &ArrayView2<F>,
    memberships: &mut Array2<F>,
) {
    Zip::from(observations.rows())
        .and(memberships.rows_mut())
        .for_each(|observation, mut membership| {
            let sq_dists = centroids
                .rows()
                .into_iter()
                .map(|centroid| dist_fn.rdistance(observation.view(), centroid.view()))
                .collect::<Array1<F>>();

            Zip::indexed(&mut membership).for_each(|cluster, value| {
                let mut divider = F::zero();
                for &sq_dist in sq_dists.iter() {
                    if sq_dist != F::zero() {
                        divider += (sq_dists[cluster] / sq_dist).powf(exponent);
                    }
                }
                *value = if divider == F::zero() {
                    F::one()
                } else {
                    F::one() / divider
                };
            });
        });
}

/// Move every center to the membership-weighted mean of all observations and
/// return the largest distance any center moved.
fn update_centroids<F: Float, D: Distance<F>>(
    dist_fn: &D,
    observations: &ArrayView2<F>,
    memberships: &Array2<F>,
    centroids: &mut Array2<F>,
) -> Result<F> {
    let nk = memberships.sum_axis(Axis(0));
    if nk.min()? < &(F::cast(10.) * F::epsilon()) {
        return Err(FcmError::EmptyCluster(nk.argmin()?));
    }

    let nk2 = nk.insert_axis(Axis(1));
    let new_centroids = memberships.t().dot(observations) / nk2;

    let mut change = F::zero();
    for (old, new) in centroids.rows().into_iter().zip(new_centroids.rows()) {
        change = change.max(dist_fn.distance(old, new));
    }
    centroids.assign(&new_centroids);
    Ok(change)
}

/// Harden the memberships into a partition: each observation goes to the
/// cluster where its membership attains its maximum (ties resolve to the
/// lowest cluster index).
fn extract_clusters<F: Float>(memberships: &Array2<F>) -> Result<Vec<Vec<usize>>> {
    let mut clusters = vec![Vec::new(); memberships.ncols()];
    for (index, membership) in memberships.rows().into_iter().enumerate() {
        clusters[membership.argmax()?].push(index);
    }
    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_blobs;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn two_pairs() -> Array2<f64> {
        array![[0.0, 0.0], [0.1, 0.0], [10.0, 10.0], [10.1, 10.0]]
    }

    #[test]
    fn memberships_sum_to_one() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
        let dataset = DatasetBase::from(generate_blobs(50, &centroids, &mut rng));

        let model = FuzzyCMeans::params_with_rng(3, rng)
            .init_method(CenterInit::FarthestCandidate)
            .fit(&dataset)
            .expect("fuzzy c-means fitted");

        for membership in model.memberships().rows() {
            assert_abs_diff_eq!(membership.sum(), 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn well_separated_pairs_form_two_clusters() {
        let dataset = DatasetBase::from(two_pairs());
        let model = FuzzyCMeans::params(2)
            .init_method(CenterInit::FarthestCandidate)
            .fit(&dataset)
            .expect("fuzzy c-means fitted");

        let pair_a = model
            .clusters()
            .iter()
            .position(|cluster| cluster.contains(&0))
            .unwrap();
        assert_eq!(model.clusters()[pair_a], vec![0, 1]);
        assert_eq!(model.clusters()[1 - pair_a], vec![2, 3]);

        // The centers end up near the pair means
        let centroid_a = model.centroids().row(pair_a);
        assert_abs_diff_eq!(centroid_a[0], 0.05, epsilon = 0.05);
        assert_abs_diff_eq!(centroid_a[1], 0.0, epsilon = 0.05);
    }

    #[test]
    fn predict_agrees_with_the_training_partition() {
        let dataset = DatasetBase::from(two_pairs());
        let model = FuzzyCMeans::params(2)
            .init_method(CenterInit::FarthestCandidate)
            .fit(&dataset)
            .expect("fuzzy c-means fitted");

        let predicted = model.predict(dataset.records());
        for (index, &cluster) in predicted.iter().enumerate() {
            assert!(model.clusters()[cluster].contains(&index));
        }

        let single: usize = model.predict(&dataset.records().row(0));
        assert_eq!(single, predicted[0]);
    }

    #[test]
    fn transform_yields_memberships_for_new_observations() {
        let dataset = DatasetBase::from(two_pairs());
        let model = FuzzyCMeans::params(2)
            .init_method(CenterInit::FarthestCandidate)
            .fit(&dataset)
            .expect("fuzzy c-means fitted");

        let memberships = model.transform(&array![[0.05, 0.0], [10.05, 10.0]]);
        assert_eq!(memberships.dim(), (2, 2));
        for membership in memberships.rows() {
            assert_abs_diff_eq!(membership.sum(), 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn membership_is_full_on_a_seeded_point() {
        let observations = array![[0.0, 0.0], [10.0, 0.0]];
        let dataset = DatasetBase::from(observations.clone());
        let model = FuzzyCMeans::params(2)
            .init_method(CenterInit::Precomputed(observations))
            .max_n_iterations(1)
            .fit(&dataset)
            .expect("fuzzy c-means fitted");

        // Each observation sits exactly on one of the seeded centers, so the
        // degenerate-divider rule grants it full membership everywhere and
        // the argmax tie resolves to the first cluster.
        assert_eq!(model.n_iterations(), 1);
        assert_abs_diff_eq!(*model.memberships(), array![[1.0, 1.0], [1.0, 1.0]]);
        assert_eq!(model.clusters()[0], vec![0, 1]);
        assert!(model.clusters()[1].is_empty());
    }

    #[test]
    fn cluster_count_may_equal_sample_count() {
        let dataset = DatasetBase::from(array![[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]]);
        let model = FuzzyCMeans::params(3)
            .init_method(CenterInit::FarthestCandidate)
            .fit(&dataset)
            .expect("fuzzy c-means fitted");

        let covered: usize = model.clusters().iter().map(Vec::len).sum();
        assert_eq!(covered, 3);
    }

    #[test]
    fn more_clusters_than_samples_is_an_error() {
        let dataset = DatasetBase::from(array![[0.0, 0.0], [1.0, 1.0]]);
        let result = FuzzyCMeans::<f64, _>::params(3).fit(&dataset);
        assert!(matches!(
            result,
            Err(FcmError::TooManyClusters {
                n_clusters: 3,
                n_samples: 2
            })
        ));
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let dataset = DatasetBase::from(Array2::<f64>::zeros((0, 2)));
        let result = FuzzyCMeans::<f64, _>::params(1).fit(&dataset);
        assert!(matches!(result, Err(FcmError::EmptyDataset)));
    }

    #[test]
    fn mismatched_precomputed_centers_are_an_error() {
        let dataset = DatasetBase::from(two_pairs());
        let result = FuzzyCMeans::params(2)
            .init_method(CenterInit::Precomputed(array![[0.0, 0.0, 0.0]]))
            .fit(&dataset);
        assert!(matches!(result, Err(FcmError::InvalidCentroids { .. })));
    }

    #[test]
    fn iteration_cap_returns_the_last_iterate() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
        let dataset = DatasetBase::from(generate_blobs(50, &centroids, &mut rng));

        let model = FuzzyCMeans::params_with_rng(3, rng)
            .max_n_iterations(1)
            .fit(&dataset)
            .expect("fuzzy c-means fitted");
        assert_eq!(model.n_iterations(), 1);
    }
}
