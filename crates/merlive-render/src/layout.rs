//! Force-directed placement of allocation graph nodes
//!
//! Nodes are seeded evenly on a circle and relaxed with a fixed number of
//! simulation ticks, so the same graph always lands in the same place.
//! Positions are returned normalized to the unit square.

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use merlive_core::AllocationGraph;
use std::f64::consts::PI;

/// A normalized position, both coordinates in `[0, 1]`
pub type Point = (f64, f64);

/// Simulation step in seconds
const TICK: f32 = 0.035;

/// Radius of the seeding circle in simulation units
const SEED_RADIUS: f64 = 100.0;

/// Default number of relaxation ticks
pub const DEFAULT_ITERATIONS: usize = 300;

fn simulation_parameters() -> SimulationParameters {
    SimulationParameters {
        force_charge: 150.0,
        force_spring: 0.05,
        force_max: 100.0,
        node_speed: 3000.0,
        damping_factor: 0.9,
    }
}

/// Seed positions: node `i` of `n` at angle `i * 2π / n`
#[must_use]
pub fn circle_seed(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = i as f64 * 2.0 * PI / n as f64;
            (SEED_RADIUS * angle.cos(), SEED_RADIUS * angle.sin())
        })
        .collect()
}

/// Place every node of `graph`, indexed like [`AllocationGraph::nodes`]
///
/// An empty graph yields no points; a single node sits in the centre.
#[must_use]
pub fn spring_layout(graph: &AllocationGraph, iterations: usize) -> Vec<Point> {
    let n = graph.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![(0.5, 0.5)],
        _ => {}
    }

    let seed = circle_seed(n);
    let mut sim: ForceGraph<usize, ()> = ForceGraph::new(simulation_parameters());

    #[allow(clippy::cast_possible_truncation)]
    let handles: Vec<_> = seed
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            sim.add_node(NodeData {
                x: x as f32,
                y: y as f32,
                mass: 10.0,
                is_anchor: false,
                user_data: i,
            })
        })
        .collect();

    for (source, target, _) in graph.links() {
        // Self-loops have no length to relax
        if source != target {
            sim.add_edge(handles[source], handles[target], EdgeData::default());
        }
    }

    for _ in 0..iterations {
        sim.update(TICK);
    }

    let mut raw = seed.clone();
    sim.visit_nodes(|node| {
        raw[node.data.user_data] = (f64::from(node.x()), f64::from(node.y()));
    });

    if raw.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        tracing::warn!(nodes = n, "layout diverged, falling back to circle placement");
        raw = seed;
    }

    normalize(&raw)
}

/// Scale points into `[0, 1]` keeping the aspect ratio
///
/// A zero-width axis collapses to `0.5`.
#[must_use]
pub fn normalize(points: &[Point]) -> Vec<Point> {
    let Some(&(first_x, first_y)) = points.first() else {
        return Vec::new();
    };

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first_x, first_x, first_y, first_y);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let span = (max_x - min_x).max(max_y - min_y);
    if span <= f64::EPSILON {
        return vec![(0.5, 0.5); points.len()];
    }

    // Centre the shorter axis
    let offset_x = (span - (max_x - min_x)) / 2.0;
    let offset_y = (span - (max_y - min_y)) / 2.0;

    points
        .iter()
        .map(|&(x, y)| ((x - min_x + offset_x) / span, (y - min_y + offset_y) / span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use merlive_core::{Node, NodeCategory};

    fn in_unit_square(p: Point) -> bool {
        (0.0..=1.0).contains(&p.0) && (0.0..=1.0).contains(&p.1)
    }

    #[test]
    fn test_empty_and_single() {
        let empty = AllocationGraph::default();
        assert!(spring_layout(&empty, 10).is_empty());

        let mut builder = AllocationGraph::builder();
        builder.add_node(Node::new("u1", "Alice", NodeCategory::User)).unwrap();
        assert_eq!(spring_layout(&builder.build(), 10), vec![(0.5, 0.5)]);
    }

    #[test]
    fn test_circle_seed() {
        let seed = circle_seed(4);
        assert_eq!(seed.len(), 4);
        assert!((seed[0].0 - SEED_RADIUS).abs() < 1e-9);
        assert!(seed[1].0.abs() < 1e-9);
        assert!((seed[1].1 - SEED_RADIUS).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_bounds() {
        let points = normalize(&[(-10.0, 5.0), (30.0, 5.0), (10.0, 25.0)]);
        assert!(points.iter().all(|p| in_unit_square(*p)));
        assert!((points[0].0).abs() < 1e-9);
        assert!((points[1].0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(normalize(&[(3.0, 3.0), (3.0, 3.0)]), vec![(0.5, 0.5), (0.5, 0.5)]);
        assert!(normalize(&[]).is_empty());
    }
}
