//! End-to-end walkthrough over a small character network: clique census,
//! core decomposition, and both community detectors with modularity
//! summaries. Run with `RUST_LOG=debug` to watch the algorithms work.

use kith::{
    core_numbers, main_core, main_corona, main_crust, main_shell, modularity, CliqueStats,
    CommunityDetection, GirvanNewman, Interaction, InteractionGraph, Louvain, Partition,
};

fn build_network() -> Result<InteractionGraph, kith::Error> {
    // Two tight families, a handful of cross-family interactions, and a
    // late-season outsider. Weights are co-occurrence counts.
    let edges: &[(&str, &str, u32, u32)] = &[
        ("ned", "catelyn", 9, 1),
        ("ned", "robb", 7, 1),
        ("ned", "arya", 6, 1),
        ("catelyn", "robb", 8, 1),
        ("robb", "arya", 3, 1),
        ("arya", "sandor", 5, 4),
        ("tywin", "cersei", 8, 1),
        ("tywin", "jaime", 7, 1),
        ("tywin", "tyrion", 5, 1),
        ("cersei", "jaime", 9, 1),
        ("cersei", "tyrion", 4, 2),
        ("jaime", "tyrion", 6, 2),
        ("ned", "cersei", 2, 1),
        ("arya", "tyrion", 1, 3),
        ("sandor", "tyrion", 2, 4),
    ];

    let mut g = InteractionGraph::new();
    for &(a, b, w, s) in edges {
        g.add_edge(a, b, Interaction::new(w, s))?;
    }
    Ok(g)
}

fn summarize(label: &str, g: &InteractionGraph, partition: &Partition) -> Result<(), kith::Error> {
    let q = modularity(g, partition)?;
    println!("\n== {label} ==");
    println!("communities: {}", partition.n_communities());
    println!(
        "largest: {} members, smallest: {} members",
        partition.largest_community().unwrap_or(0),
        partition.smallest_community().unwrap_or(0)
    );
    println!("modularity: {q:.4}");
    for (name, community) in partition.named(g) {
        println!("  {name}: community {community}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let g = build_network()?;
    println!(
        "network: {} characters, {} interactions",
        g.node_count(),
        g.edge_count()
    );
    if let Some(stats) = g.degree_stats() {
        println!(
            "degrees: min {}, max {}, mean {:.2}",
            stats.min, stats.max, stats.mean
        );
    }

    // Clique census.
    let cliques = CliqueStats::of(&g);
    println!("\nmaximal cliques: {}", cliques.count);
    println!("largest clique size: {}", cliques.max_size);
    println!("cliques of largest size: {}", cliques.n_max);

    // Core decomposition.
    let cores = core_numbers(&g);
    let core = main_core(&g, &cores)?;
    println!("\nmain core (k = {}): {} nodes", cores.max_core(), core.node_count());
    println!("main crust: {} nodes", main_crust(&g, &cores)?.node_count());
    println!("main shell: {} nodes", main_shell(&g, &cores)?.node_count());
    println!("main corona: {} nodes", main_corona(&g, &cores)?.node_count());

    // Louvain.
    let louvain = Louvain::new().detect(&g)?;
    summarize("louvain", &g, &louvain)?;

    // Girvan-Newman: full dendrogram, then the best level by modularity.
    let dendrogram = GirvanNewman::new().dendrogram(&g)?;
    println!("\ngirvan-newman dendrogram: {} levels", dendrogram.len());
    let (best, _) = dendrogram.best_partition(&g)?;
    summarize("girvan-newman (best level)", &g, best)?;

    Ok(())
}
