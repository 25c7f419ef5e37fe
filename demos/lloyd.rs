use clusterer::*;

fn main() {
    let (k, max_iter) = (3, 10);

    let samples = [[73.0f64, 72.6], [61.0, 54.4], [67.0, 99.9], [68.0, 97.3], [62.0, 59.0],
                   [75.0, 81.6], [74.0, 77.1], [66.0, 97.3], [68.0, 93.3], [61.0, 59.0]];

    // Seeded, so repeated runs print the same partition
    let conf = ClustererConfig::build()
        .seed(1337)
        .iteration_done(&|s, nr, moved|
            println!("Iteration {} - {} clusters in use, {} observations moved", nr, s.used_centroids_cnt(), moved))
        .build();

    let result = match cluster_with_config(&samples, k, max_iter, &conf) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Clustering failed: {}", e);
            std::process::exit(1);
        }
    };

    for (cluster_id, members) in &result {
        println!("Cluster {}: {:?}", cluster_id, members);
    }
    println!("Centroids: {:?}", result.centroids());
    println!("Iterations: {} (converged: {})", result.iterations, result.converged);
}
