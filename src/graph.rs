//! Dependency maps over operations, keyed by handle.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::operation::Operation;
use crate::tensor::Tensor;

/// Each reachable operation mapped to the tensors it reads.
pub type ReadGraph = FxHashMap<Operation, Vec<Tensor>>;

/// Each tensor mapped to the operations that read it.
pub type FeedGraph = FxHashMap<Tensor, Vec<Operation>>;

/// Collects every operation reachable from `roots` through
/// [`Operation::input_tensors`].
///
/// Tensors without a producing operation end the walk.
pub fn create_read_graph(roots: &[Operation]) -> ReadGraph {
    let mut graph = ReadGraph::default();
    let mut stack: Vec<Operation> = roots.to_vec();

    while let Some(op) = stack.pop() {
        if graph.contains_key(&op) {
            continue;
        }
        let inputs = op.input_tensors();
        for producer in inputs.iter().filter_map(Tensor::op) {
            if !graph.contains_key(producer) {
                stack.push(producer.clone());
            }
        }
        graph.insert(op, inputs);
    }

    debug!(
        "read graph: {} operation(s) from {} root(s)",
        graph.len(),
        roots.len()
    );
    graph
}

/// Orders the operations reachable from `roots` so that every producer comes
/// before its consumers. Each operation appears once.
///
/// Operations missing from `graph` are treated as having no inputs.
pub fn post_dfs_order(roots: &[Operation], graph: &ReadGraph) -> Vec<Operation> {
    let mut visited = FxHashSet::default();
    let mut order = Vec::new();
    for root in roots {
        post_dfs_visit(root, graph, &mut visited, &mut order);
    }
    order
}

fn post_dfs_visit(
    op: &Operation,
    graph: &ReadGraph,
    visited: &mut FxHashSet<Operation>,
    order: &mut Vec<Operation>,
) {
    if !visited.insert(op.clone()) {
        return;
    }
    if let Some(inputs) = graph.get(op) {
        for producer in inputs.iter().filter_map(Tensor::op) {
            post_dfs_visit(producer, graph, visited, order);
        }
    }
    order.push(op.clone());
}

/// Inverts a read graph.
///
/// Keys are the tensor handles stored in the read lists, so a reader is only
/// found through the handle it actually reads.
pub fn create_feed_graph(graph: &ReadGraph) -> FeedGraph {
    let mut feed = FeedGraph::default();
    for (op, inputs) in graph {
        for tensor in inputs {
            feed.entry(tensor.clone()).or_default().push(op.clone());
        }
    }
    feed
}
