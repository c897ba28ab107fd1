//! Stepviz CLI - drives an algorithm engine over random input and prints
//! every step it emits.
//!
//! The library is the product; this binary is a consumer for inspection
//! and demos: it generates a seeded input, runs the chosen engine to
//! exhaustion, and prints each step's narration (or the full step as JSON
//! lines).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use stepviz_common::NodeId;
use stepviz_core::generate::{random_array, RandomGraphConfig};
use stepviz_core::{
    AStar, AlgorithmKey, BellmanFord, BinarySearch, BubbleSort, Dijkstra, FloydWarshall, Kruskal,
    LinearSearch, MergeSort, Prim, QuickSort,
};

/// Stepviz algorithm step runner.
///
/// Generates a random input from a seed, runs the chosen algorithm
/// engine, and prints each emitted step.
#[derive(Parser)]
#[command(name = "stepviz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print full steps as JSON lines instead of narration
    #[arg(long, global = true)]
    json: bool,

    /// Seed for input generation (same seed, same run)
    #[arg(long, short, global = true, default_value_t = 42)]
    seed: u64,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run a search engine over a random array
    Search {
        /// Algorithm key: linear-search or binary-search
        algorithm: AlgorithmKey,

        /// Array length
        #[arg(long, default_value_t = 12)]
        size: usize,

        /// Maximum element value
        #[arg(long, default_value_t = 50)]
        max_value: i64,

        /// Target value (random in 0..=max-value when omitted)
        #[arg(long)]
        target: Option<i64>,
    },

    /// Run a sort engine over a random array
    Sort {
        /// Algorithm key: bubble-sort, merge-sort, or quick-sort
        algorithm: AlgorithmKey,

        /// Array length
        #[arg(long, default_value_t = 10)]
        size: usize,

        /// Maximum element value
        #[arg(long, default_value_t = 50)]
        max_value: i64,
    },

    /// Run a graph engine over a random graph
    Graph {
        /// Algorithm key: dijkstra, bellman-ford, a-star, floyd-warshall,
        /// kruskal, or prim
        algorithm: AlgorithmKey,

        /// Node count
        #[arg(long, default_value_t = 6)]
        nodes: usize,

        /// Edge count (best effort)
        #[arg(long, default_value_t = 9)]
        edges: usize,

        /// Maximum edge weight
        #[arg(long, default_value_t = 10.0)]
        max_weight: f64,

        /// Generate directed edges
        #[arg(long)]
        directed: bool,

        /// Allow negative edge weights
        #[arg(long)]
        negative_weights: bool,

        /// Start node id (first node when omitted)
        #[arg(long)]
        start: Option<String>,

        /// Target node id (last node for a-star when omitted)
        #[arg(long)]
        target: Option<String>,
    },
}

fn emit<S: Serialize>(index: usize, message: &str, step: &S, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(step).context("serializing step")?);
    } else {
        println!("{index:4}  {message}");
    }
    Ok(())
}

fn run_search(
    algorithm: AlgorithmKey,
    size: usize,
    max_value: i64,
    target: Option<i64>,
    seed: u64,
    json: bool,
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut array = random_array(&mut rng, size, max_value);
    let target = target.unwrap_or_else(|| rng.gen_range(0..=max_value));

    let steps: Vec<_> = match algorithm {
        AlgorithmKey::LinearSearch => LinearSearch::new(array, target).collect(),
        AlgorithmKey::BinarySearch => {
            // Binary search requires sorted input; sorting is the
            // caller's job, and here the CLI is the caller.
            array.sort_unstable();
            BinarySearch::new(array, target).collect()
        }
        other => bail!("{other} is not a search algorithm"),
    };
    for (i, step) in steps.iter().enumerate() {
        emit(i, &step.message, step, json)?;
    }
    Ok(())
}

fn run_sort(
    algorithm: AlgorithmKey,
    size: usize,
    max_value: i64,
    seed: u64,
    json: bool,
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let array = random_array(&mut rng, size, max_value);

    let steps: Vec<_> = match algorithm {
        AlgorithmKey::BubbleSort => BubbleSort::new(array).collect(),
        AlgorithmKey::MergeSort => MergeSort::new(array).collect(),
        AlgorithmKey::QuickSort => QuickSort::new(array).collect(),
        other => bail!("{other} is not a sort algorithm"),
    };
    for (i, step) in steps.iter().enumerate() {
        emit(i, &step.message, step, json)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_graph(
    algorithm: AlgorithmKey,
    nodes: usize,
    edges: usize,
    max_weight: f64,
    directed: bool,
    negative_weights: bool,
    start: Option<String>,
    target: Option<String>,
    seed: u64,
    json: bool,
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut config = RandomGraphConfig::new(nodes, edges).with_max_weight(max_weight);
    if directed {
        config = config.directed();
    }
    if negative_weights {
        config = config.with_negative_weights();
    }
    if matches!(algorithm, AlgorithmKey::AStar) {
        config = config.with_coordinates(100.0, 100.0);
    }
    let graph = config.generate(&mut rng).context("generating graph")?;

    let start: NodeId = match start {
        Some(id) => id.into(),
        None => match graph.nodes.first() {
            Some(node) => node.id.clone(),
            None => "n0".into(),
        },
    };
    let target: Option<NodeId> = target.map(Into::into);

    let steps: Vec<_> = match algorithm {
        AlgorithmKey::Dijkstra => Dijkstra::new(graph, start, target).collect(),
        AlgorithmKey::BellmanFord => BellmanFord::new(graph, start, target).collect(),
        AlgorithmKey::AStar => {
            let target = target
                .or_else(|| graph.nodes.last().map(|n| n.id.clone()))
                .context("a-star requires a target and the graph is empty")?;
            AStar::new(graph, start, target).collect()
        }
        AlgorithmKey::FloydWarshall => FloydWarshall::new(graph).collect(),
        AlgorithmKey::Kruskal => Kruskal::new(graph).collect(),
        AlgorithmKey::Prim => Prim::new(graph, Some(start)).collect(),
        other => bail!("{other} is not a graph algorithm"),
    };
    for (i, step) in steps.iter().enumerate() {
        emit(i, &step.message, step, json)?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let result = match cli.command {
        Commands::Search {
            algorithm,
            size,
            max_value,
            target,
        } => run_search(algorithm, size, max_value, target, cli.seed, cli.json),
        Commands::Sort {
            algorithm,
            size,
            max_value,
        } => run_sort(algorithm, size, max_value, cli.seed, cli.json),
        Commands::Graph {
            algorithm,
            nodes,
            edges,
            max_weight,
            directed,
            negative_weights,
            start,
            target,
        } => run_graph(
            algorithm,
            nodes,
            edges,
            max_weight,
            directed,
            negative_weights,
            start,
            target,
            cli.seed,
            cli.json,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
