use ndarray::{s, Array, Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob
/// centroids, sampled from a normal distribution with unit variance.
///
/// `generate_blobs` can be used to quickly assemble a synthetic dataset to
/// test or benchmark a clustering algorithm on a best-case scenario input.
pub fn generate_blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> =
        Array::random_using((n_centroids * blob_size, n_features), StandardNormal, rng);

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let mut blob = blobs.slice_mut(s![blob_index * blob_size..(blob_index + 1) * blob_size, ..]);
        blob += &blob_centroid;
    }
    blobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn blobs_gather_around_their_centroids() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centroids = array![[0.0, 0.0], [100.0, 100.0]];
        let blobs = generate_blobs(500, &centroids, &mut rng);
        assert_eq!(blobs.dim(), (1000, 2));

        let first_mean = blobs.slice(s![0..500, ..]).mean_axis(Axis(0)).unwrap();
        assert!(first_mean[0].abs() < 0.5 && first_mean[1].abs() < 0.5);
        let second_mean = blobs.slice(s![500..1000, ..]).mean_axis(Axis(0)).unwrap();
        assert!((second_mean[0] - 100.0).abs() < 0.5);
    }
}
