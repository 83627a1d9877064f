use fuzzy_clustering::{
    generate_blobs, labels_from_clusters, write_labels, CenterInit, FuzzyCMeans,
};
use linfa::traits::Fit;
use linfa::DatasetBase;
use ndarray::array;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// A routine clustering task: build a synthetic dataset, fit fuzzy c-means on
// it and save the hard labels to disk the same way the `fcm` binary does.
fn main() -> anyhow::Result<()> {
    // Our random number generator, seeded for reproducibility
    let mut rng = Xoshiro256Plus::seed_from_u64(42);

    // For each of our expected centroids, generate 100 data points around it
    // (a "blob")
    let expected_centroids = array![[10., 10.], [1., 12.], [-20., 30.]];
    let dataset = DatasetBase::from(generate_blobs(100, &expected_centroids, &mut rng));

    let model = FuzzyCMeans::params_with_rng(3, rng)
        .init_method(CenterInit::FarthestCandidate)
        .fit(&dataset)?;

    println!("centers:\n{:?}", model.centroids());
    println!(
        "converged after {} iterations ({:.3} ms)",
        model.n_iterations(),
        model.total_iteration_time().as_secs_f64() * 1e3
    );

    let labels = labels_from_clusters(model.clusters(), model.memberships().nrows())?;
    write_labels("blob_labels.csv", &labels)?;
    Ok(())
}
