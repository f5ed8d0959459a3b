//! Topological build order over the `DEPENDS_ON` subgraph.

use super::GraphQueries;
use super::snapshot::GraphSnapshot;
use super::types::ImplementationOrder;
use crate::domain::{EdgeType, NodeId};
use crate::error::Result;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;

/// DFS state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Order non-layer nodes so that every dependency precedes its dependents.
///
/// Only `DEPENDS_ON` edges whose endpoints are both non-layer nodes take
/// part. If the subgraph has a cycle, the result is a witness cycle
/// `[x, .., x]` instead of an order.
#[must_use]
pub fn implementation_order(snapshot: &GraphSnapshot) -> ImplementationOrder {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for node in snapshot.components() {
        graph.add_node(node.id.as_str());
    }
    for edge in snapshot.edges() {
        if edge.edge_type != EdgeType::DependsOn {
            continue;
        }
        let (source, target) = (edge.source_id.as_str(), edge.target_id.as_str());
        if graph.contains_node(source) && graph.contains_node(target) {
            graph.add_edge(source, target, ());
        }
    }
    topological_order(&graph)
}

/// Post-order DFS with an explicit stack.
///
/// A node is emitted once all of its dependencies are emitted, so the
/// output runs dependencies first. Reaching a node that is still on the
/// stack means the stack from that node onward is a cycle.
fn topological_order(graph: &DiGraphMap<&str, ()>) -> ImplementationOrder {
    let mut marks: HashMap<&str, Mark> = graph.nodes().map(|n| (n, Mark::Unvisited)).collect();
    let mut order = Vec::with_capacity(graph.node_count());

    for start in graph.nodes() {
        if marks[&start] != Mark::Unvisited {
            continue;
        }
        marks.insert(start, Mark::InProgress);
        let mut stack = vec![(start, graph.neighbors(start))];

        while let Some((node, neighbours)) = stack.last_mut() {
            let node = *node;
            match neighbours.next() {
                Some(next) => match marks[&next] {
                    Mark::Unvisited => {
                        marks.insert(next, Mark::InProgress);
                        stack.push((next, graph.neighbors(next)));
                    }
                    Mark::InProgress => {
                        let from = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                        let mut cycle: Vec<NodeId> =
                            stack[from..].iter().map(|(n, _)| NodeId::from(*n)).collect();
                        cycle.push(NodeId::from(next));
                        return ImplementationOrder::Cycle(cycle);
                    }
                    Mark::Done => {}
                },
                None => {
                    marks.insert(node, Mark::Done);
                    order.push(NodeId::from(node));
                    stack.pop();
                }
            }
        }
    }

    ImplementationOrder::Order(order)
}

impl GraphQueries {
    /// Build order of all non-layer nodes; see [`implementation_order`].
    ///
    /// # Errors
    ///
    /// Propagates repository failures. A cycle is a successful result.
    pub async fn implementation_order(&self) -> Result<ImplementationOrder> {
        let snapshot = self.snapshot_of_type(EdgeType::DependsOn).await?;
        let result = implementation_order(&snapshot);
        if let ImplementationOrder::Cycle(cycle) = &result {
            let path: Vec<&str> = cycle.iter().map(NodeId::as_str).collect();
            tracing::warn!(cycle = %path.join(" -> "), "Dependency cycle detected");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::GraphFixture;

    fn position(order: &[NodeId], id: &str) -> usize {
        order
            .iter()
            .position(|n| n.as_str() == id)
            .unwrap_or_else(|| panic!("{id} missing from order"))
    }

    #[tokio::test]
    async fn test_chain_orders_dependencies_first() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .component("c")
            .depends_on("a", "b")
            .depends_on("b", "c")
            .queries()
            .await;

        let result = queries.implementation_order().await.unwrap();
        let order: Vec<_> = result.order().unwrap().iter().map(NodeId::as_str).collect();

        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_every_edge_respected() {
        let queries = GraphFixture::new()
            .component("api")
            .component("auth")
            .component("db")
            .component("ui")
            .component("cache")
            .depends_on("ui", "api")
            .depends_on("api", "auth")
            .depends_on("api", "db")
            .depends_on("auth", "db")
            .depends_on("api", "cache")
            .queries()
            .await;

        let result = queries.implementation_order().await.unwrap();
        let order = result.order().unwrap();

        assert_eq!(order.len(), 5);
        for (dependent, dependency) in
            [("ui", "api"), ("api", "auth"), ("api", "db"), ("auth", "db"), ("api", "cache")]
        {
            assert!(position(order, dependency) < position(order, dependent));
        }
    }

    #[tokio::test]
    async fn test_cycle_witness() {
        let queries = GraphFixture::new()
            .component("a")
            .component("b")
            .component("c")
            .depends_on("a", "b")
            .depends_on("b", "c")
            .depends_on("c", "a")
            .queries()
            .await;

        let result = queries.implementation_order().await.unwrap();
        let cycle = result.cycle().unwrap();

        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 4);
        for id in ["a", "b", "c"] {
            assert!(cycle.iter().any(|n| n.as_str() == id));
        }
    }

    #[tokio::test]
    async fn test_self_loop_is_cycle() {
        let queries = GraphFixture::new()
            .component("a")
            .depends_on("a", "a")
            .queries()
            .await;

        let result = queries.implementation_order().await.unwrap();
        let cycle: Vec<_> = result.cycle().unwrap().iter().map(NodeId::as_str).collect();
        assert_eq!(cycle, vec!["a", "a"]);
    }

    #[tokio::test]
    async fn test_layers_and_dangling_edges_ignored() {
        let queries = GraphFixture::new()
            .layer("core")
            .component_in("a", "core")
            .component("b")
            .depends_on("a", "core")
            .depends_on("core", "a")
            .depends_on("b", "ghost")
            .queries()
            .await;

        let result = queries.implementation_order().await.unwrap();
        let mut order: Vec<_> = result.order().unwrap().iter().map(NodeId::as_str).collect();
        order.sort_unstable();

        assert_eq!(order, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_graph() {
        let queries = GraphFixture::new().queries().await;
        let result = queries.implementation_order().await.unwrap();
        assert_eq!(result, ImplementationOrder::Order(vec![]));
    }
}
