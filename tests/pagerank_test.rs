use graphrank::graph::{GraphStore, GraphView, NodeId};
use graphrank::pagerank::{PageRank, PageRankConfig, Storage, ABSENT_RANK};
use rand::prelude::*;

const ALL_STORAGES: [Storage; 3] = [
    Storage::SequentialDense,
    Storage::ParallelFixedPoint,
    Storage::SparseMap,
];

fn compute(store: &GraphStore, config: &PageRankConfig, storage: Storage) -> PageRank {
    let view = GraphView::new(store);
    let mut engine = PageRank::new(storage);
    engine.compute(&view, config).unwrap();
    engine
}

#[test]
fn test_two_node_scenario() {
    // A -> B, damping 0.85, one iteration:
    // rank(A) = 0.15, rank(B) = 0.15 + 0.85 * 0.15 = 0.2775
    let mut store = GraphStore::new();
    let a = store.create_node("Profile");
    let b = store.create_node("Profile");
    store.create_edge(a, b, "FOLLOWS").unwrap();

    let config = PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(1);

    for storage in ALL_STORAGES {
        let engine = compute(&store, &config, storage);
        assert_eq!(engine.number_of_nodes(), 2);
        assert!(
            (engine.result(a) - 0.15).abs() < 1e-9,
            "{storage:?}: rank(A) = {}",
            engine.result(a)
        );
        assert!(
            (engine.result(b) - 0.2775).abs() < 1e-9,
            "{storage:?}: rank(B) = {}",
            engine.result(b)
        );
    }
}

#[test]
fn test_zero_iterations_yield_base_rank() {
    let mut store = GraphStore::new();
    let a = store.create_node("Profile");
    let b = store.create_node("Profile");
    store.create_edge(a, b, "FOLLOWS").unwrap();

    let config = PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(0);

    for storage in ALL_STORAGES {
        let engine = compute(&store, &config, storage);
        assert!((engine.result(a) - 0.15).abs() < 1e-9, "{storage:?}");
        assert!((engine.result(b) - 0.15).abs() < 1e-9, "{storage:?}");
    }
}

#[test]
fn test_dangling_isolated_node_keeps_base_rank() {
    let mut store = GraphStore::new();
    let lone = store.create_node("Profile");

    for iterations in [1, 10, 100] {
        let config = PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(iterations);
        for storage in ALL_STORAGES {
            let engine = compute(&store, &config, storage);
            assert!(
                (engine.result(lone) - 0.15).abs() < 1e-9,
                "{storage:?} after {iterations} iterations"
            );
        }
    }
}

#[test]
fn test_mass_conservation_without_dangling_nodes() {
    // 4-cycle plus a chord: every node has outgoing edges, so no mass is
    // dropped and sum_{k+1} = n * (1 - d) + d * sum_k holds exactly.
    let mut store = GraphStore::new();
    let nodes: Vec<NodeId> = (0..4).map(|_| store.create_node("Profile")).collect();
    for i in 0..4 {
        store.create_edge(nodes[i], nodes[(i + 1) % 4], "FOLLOWS").unwrap();
    }
    store.create_edge(nodes[0], nodes[2], "FOLLOWS").unwrap();

    let n = 4.0;
    let d = 0.85;
    for k in [0, 1, 3, 7] {
        let sum_k: f64 = compute(
            &store,
            &PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(k),
            Storage::SequentialDense,
        )
        .ranks()
        .values()
        .sum();
        let sum_next: f64 = compute(
            &store,
            &PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(k + 1),
            Storage::SequentialDense,
        )
        .ranks()
        .values()
        .sum();

        assert!(
            (sum_next - (n * (1.0 - d) + d * sum_k)).abs() < 1e-9,
            "k={k}: sum_k={sum_k}, sum_next={sum_next}"
        );
    }
}

/// Plain unweighted formulation: normalization by out-degree, same damping
/// and base-rank reset.
fn unweighted_reference(
    node_count: usize,
    edges: &[(usize, usize)],
    damping: f64,
    iterations: usize,
) -> Vec<f64> {
    let base = 1.0 - damping;
    let mut out_degree = vec![0usize; node_count];
    for &(u, _) in edges {
        out_degree[u] += 1;
    }

    let mut dst = vec![base; node_count];
    let mut src = vec![0.0; node_count];
    for _ in 0..iterations {
        for i in 0..node_count {
            src[i] = damping * dst[i];
        }
        dst.fill(base);
        for &(u, v) in edges {
            if out_degree[u] > 0 {
                dst[v] += src[u] / out_degree[u] as f64;
            }
        }
    }
    dst
}

#[test]
fn test_uniform_weights_match_unweighted_formulation() {
    let edges = [(0, 1), (0, 2), (1, 2), (2, 0), (3, 2), (1, 3)];
    let mut store = GraphStore::new();
    let nodes: Vec<NodeId> = (0..4).map(|_| store.create_node("Profile")).collect();
    for &(u, v) in &edges {
        store.create_edge(nodes[u], nodes[v], "FOLLOWS").unwrap();
    }

    let iterations = 25;
    let expected = unweighted_reference(4, &edges, 0.85, iterations);

    // Explicit 1.0 override and no override must both match the plain
    // out-degree formulation.
    for config in [
        PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(iterations),
        PageRankConfig::new(["Profile"], ["FOLLOWS"])
            .with_iterations(iterations)
            .with_weight("FOLLOWS", 1.0),
    ] {
        let engine = compute(&store, &config, Storage::SequentialDense);
        for (i, &node) in nodes.iter().enumerate() {
            assert!(
                (engine.result(node) - expected[i]).abs() < 1e-9,
                "node {i}: {} vs {}",
                engine.result(node),
                expected[i]
            );
        }
    }
}

fn random_graph(seed: u64) -> (GraphStore, Vec<NodeId>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = GraphStore::new();
    let nodes: Vec<NodeId> = (0..30).map(|_| store.create_node("Profile")).collect();
    let types = ["FOLLOWS", "COMMENTED_ON", "LICENSED"];
    for _ in 0..120 {
        let u = nodes[rng.gen_range(0..nodes.len())];
        let v = nodes[rng.gen_range(0..nodes.len())];
        let ty = types[rng.gen_range(0..types.len())];
        store.create_edge(u, v, ty).unwrap();
    }
    (store, nodes)
}

fn weighted_config(iterations: usize) -> PageRankConfig {
    // Dyadic weights keep the direct and degree-based normalization sums
    // bit-identical, so the real-valued strategies can be compared exactly.
    PageRankConfig::new(["Profile"], ["FOLLOWS", "COMMENTED_ON", "LICENSED"])
        .with_iterations(iterations)
        .with_weight("COMMENTED_ON", 0.5)
        .with_weight("LICENSED", 2.0)
}

#[test]
fn test_strategy_equivalence() {
    let (store, nodes) = random_graph(7);
    let config = weighted_config(10);

    let dense = compute(&store, &config, Storage::SequentialDense);
    let sparse = compute(&store, &config, Storage::SparseMap);
    let parallel = compute(&store, &config, Storage::ParallelFixedPoint);

    for &node in &nodes {
        let exact = dense.result(node);
        assert!(
            (exact - sparse.result(node)).abs() < 1e-12,
            "sparse diverges at {node}: {} vs {exact}",
            sparse.result(node)
        );
        // Fixed-point quantization: bounded by 1/SCALE per accumulation.
        assert!(
            (exact - parallel.result(node)).abs() < 1e-3,
            "parallel diverges at {node}: {} vs {exact}",
            parallel.result(node)
        );
    }
}

#[test]
fn test_determinism_under_edge_reordering() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut edges = Vec::new();
    for _ in 0..80 {
        let u = rng.gen_range(0..20u64);
        let v = rng.gen_range(0..20u64);
        let ty = ["FOLLOWS", "COMMENTED_ON"][rng.gen_range(0..2)];
        edges.push((u, v, ty));
    }

    let build = |order: &[(u64, u64, &'static str)]| {
        let mut store = GraphStore::new();
        let nodes: Vec<NodeId> = (0..20).map(|_| store.create_node("Profile")).collect();
        for &(u, v, ty) in order {
            store.create_edge(nodes[u as usize], nodes[v as usize], ty).unwrap();
        }
        (store, nodes)
    };

    let (store_a, nodes_a) = build(&edges);
    let mut shuffled = edges.clone();
    shuffled.shuffle(&mut rng);
    let (store_b, nodes_b) = build(&shuffled);

    let config = PageRankConfig::new(["Profile"], ["FOLLOWS", "COMMENTED_ON"])
        .with_iterations(15)
        .with_weight("COMMENTED_ON", 0.5);

    let a = compute(&store_a, &config, Storage::SequentialDense);
    let b = compute(&store_b, &config, Storage::SequentialDense);
    for (&na, &nb) in nodes_a.iter().zip(nodes_b.iter()) {
        assert!(
            (a.result(na) - b.result(nb)).abs() < 1e-9,
            "reordered insertion changed rank: {} vs {}",
            a.result(na),
            b.result(nb)
        );
    }

    // Parallel scheduling must also be stable up to fixed-point rounding.
    let p1 = compute(&store_a, &config, Storage::ParallelFixedPoint);
    let p2 = compute(&store_a, &config, Storage::ParallelFixedPoint);
    for &node in &nodes_a {
        assert!((p1.result(node) - p2.result(node)).abs() < 1e-3);
    }
}

#[test]
fn test_heavier_edges_attract_more_rank() {
    // Two followers of equal standing; one endorsement is twice the weight.
    let mut store = GraphStore::new();
    let hub = store.create_node("Profile");
    let light = store.create_node("Profile");
    let heavy = store.create_node("Profile");
    store.create_edge(hub, light, "FOLLOWS").unwrap();
    store.create_edge(hub, heavy, "LICENSED").unwrap();

    let config = PageRankConfig::new(["Profile"], ["FOLLOWS", "LICENSED"])
        .with_iterations(20)
        .with_weight("LICENSED", 2.0);

    for storage in ALL_STORAGES {
        let engine = compute(&store, &config, storage);
        assert!(
            engine.result(heavy) > engine.result(light),
            "{storage:?}: {} <= {}",
            engine.result(heavy),
            engine.result(light)
        );
    }
}

#[test]
fn test_multi_label_nodes_counted_once() {
    let mut store = GraphStore::new();
    let both = store.create_node("Profile");
    store.add_label(both, "Project").unwrap();
    let single = store.create_node("Project");
    store.create_edge(both, single, "LICENSED").unwrap();

    let config = PageRankConfig::new(["Profile", "Project"], ["LICENSED"]).with_iterations(2);

    for storage in ALL_STORAGES {
        let engine = compute(&store, &config, storage);
        assert_eq!(engine.number_of_nodes(), 2, "{storage:?}");
    }
}

#[test]
fn test_absent_node_sentinel_after_compute() {
    let mut store = GraphStore::new();
    let a = store.create_node("Profile");
    let outsider = store.create_node("Other");
    store.create_edge(a, a, "FOLLOWS").unwrap();

    let config = PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(3);
    for storage in ALL_STORAGES {
        let engine = compute(&store, &config, storage);
        assert_eq!(engine.result(outsider), ABSENT_RANK, "{storage:?}");
        assert_eq!(engine.result(NodeId::new(4096)), ABSENT_RANK, "{storage:?}");
    }
}

#[test]
fn test_long_run_converges_toward_node_count() {
    // Classical mass-conservation limit: with no dangling nodes the total
    // rank approaches the node count.
    let mut store = GraphStore::new();
    let nodes: Vec<NodeId> = (0..6).map(|_| store.create_node("Profile")).collect();
    for i in 0..6 {
        store.create_edge(nodes[i], nodes[(i + 1) % 6], "FOLLOWS").unwrap();
        store.create_edge(nodes[i], nodes[(i + 2) % 6], "FOLLOWS").unwrap();
    }

    let config = PageRankConfig::new(["Profile"], ["FOLLOWS"]).with_iterations(200);
    let engine = compute(&store, &config, Storage::SequentialDense);
    let total: f64 = engine.ranks().values().sum();
    assert!((total - 6.0).abs() < 1e-6, "total = {total}");
}
