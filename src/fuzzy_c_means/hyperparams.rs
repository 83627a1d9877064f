use crate::fuzzy_c_means::errors::FcmParamsError;
use crate::fuzzy_c_means::init::CenterInit;
use linfa::{Float, ParamGuard};
use linfa_nn::distance::Distance;
use ndarray_rand::rand::Rng;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [fuzzy c-means algorithm](crate::FuzzyCMeans).
pub struct FuzzyCMeansValidParams<F: Float, R: Rng, D: Distance<F>> {
    /// The membership exponent m. Larger values smear the memberships out
    /// across clusters; values close to 1 approach a hard assignment.
    fuzziness: F,
    /// The training is considered complete once no center moves farther
    /// than `tolerance` during an iteration.
    tolerance: F,
    /// We exit the training loop when the number of training iterations
    /// exceeds `max_n_iterations` even if the `tolerance` convergence
    /// condition has not been met.
    max_n_iterations: u64,
    /// The number of clusters we will be looking for in the training dataset.
    n_clusters: usize,
    /// The initialization strategy used to seed the centers.
    init: CenterInit<F>,
    /// The random number generator
    rng: R,
    /// Distance metric used for the membership and convergence computations
    dist_fn: D,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](FuzzyCMeansValidParams) for
/// the [fuzzy c-means algorithm](crate::FuzzyCMeans) (using the builder pattern).
pub struct FuzzyCMeansParams<F: Float, R: Rng, D: Distance<F>>(FuzzyCMeansValidParams<F, R, D>);

impl<F: Float, R: Rng, D: Distance<F>> FuzzyCMeansParams<F, R, D> {
    /// `new` lets us configure our training algorithm parameters:
    /// * we will be looking for `n_clusters` in the training dataset;
    /// * the training is considered complete if the largest distance any
    ///   center moves during an iteration is lower or equal than `tolerance`;
    /// * we exit the training loop when the number of training iterations
    ///   exceeds `max_n_iterations` even if the `tolerance` convergence
    ///   condition has not been met.
    ///
    /// Defaults are provided if optional parameters are not specified:
    /// * `fuzziness = 2.0`
    /// * `tolerance = 1e-3`
    /// * `max_n_iterations = 100`
    /// * `init = KMeansPlusPlus`
    pub fn new(n_clusters: usize, rng: R, dist_fn: D) -> Self {
        Self(FuzzyCMeansValidParams {
            fuzziness: F::cast(2.),
            tolerance: F::cast(1e-3),
            max_n_iterations: 100,
            n_clusters,
            init: CenterInit::KMeansPlusPlus,
            rng,
            dist_fn,
        })
    }

    /// Change the value of `fuzziness`
    pub fn fuzziness(mut self, fuzziness: F) -> Self {
        self.0.fuzziness = fuzziness;
        self
    }

    /// Change the value of `tolerance`
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Change the value of `max_n_iterations`
    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }

    /// Change the value of `init`
    pub fn init_method(mut self, init: CenterInit<F>) -> Self {
        self.0.init = init;
        self
    }
}

impl<F: Float, R: Rng, D: Distance<F>> ParamGuard for FuzzyCMeansParams<F, R, D> {
    type Checked = FuzzyCMeansValidParams<F, R, D>;
    type Error = FcmParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            Err(FcmParamsError::NClusters)
        } else if self.0.fuzziness <= F::one() {
            Err(FcmParamsError::Fuzziness)
        } else if self.0.tolerance <= F::zero() {
            Err(FcmParamsError::Tolerance)
        } else if self.0.max_n_iterations == 0 {
            Err(FcmParamsError::MaxIterations)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng, D: Distance<F>> FuzzyCMeansValidParams<F, R, D> {
    /// The membership exponent m of the fitting procedure.
    pub fn fuzziness(&self) -> F {
        self.fuzziness
    }

    /// The training is considered complete once no center moves farther
    /// than `tolerance` during an iteration.
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    /// We exit the training loop when the number of training iterations
    /// exceeds `max_n_iterations` even if the `tolerance` convergence
    /// condition has not been met.
    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    /// The number of clusters we will be looking for in the training dataset.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Center initialization strategy
    pub fn init_method(&self) -> &CenterInit<F> {
        &self.init
    }

    /// Returns the random generator
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Returns the distance metric
    pub fn dist_fn(&self) -> &D {
        &self.dist_fn
    }
}
