//! Property-based tests for pipeline invariants.
//!
//! - Topological order respects every edge
//! - ES is monotone along edges and tight on at least one inbound edge
//! - The reported critical path sums to the makespan
//! - Schedules are feasible and bounded by the machine count
//! - Runs are reproducible
//! - Zero slack survives durations spanning many orders of magnitude

use cpm_sched::{Error, Graph, Pipeline, PipelineConfig};
use proptest::prelude::*;

/// Generate a DAG as (from, to, duration) triples.
///
/// Edges only point from lower to higher indices, so no cycles can appear.
/// Labels are shuffled relative to indices so first-observed order differs
/// from the acyclic order.
fn dag_with(
    max_tasks: usize,
    duration: BoxedStrategy<f64>,
) -> impl Strategy<Value = Vec<(String, String, f64)>> {
    (2..=max_tasks).prop_flat_map(move |n| {
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();
        let pair_count = pairs.len();
        (
            proptest::collection::vec(any::<bool>(), pair_count),
            proptest::collection::vec(duration.clone(), pair_count),
            Just(pairs),
        )
            .prop_flat_map(|(keep, durations, pairs)| {
                let edges: Vec<(String, String, f64)> = pairs
                    .iter()
                    .zip(keep.iter().zip(&durations))
                    .filter(|(_, (k, _))| **k)
                    .map(|(&(i, j), (_, &d))| (format!("t{i}"), format!("t{j}"), d))
                    .collect();
                Just(edges).prop_shuffle()
            })
    })
}

/// Small integer durations.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<(String, String, f64)>> {
    dag_with(max_tasks, (0u32..10).prop_map(f64::from).boxed())
}

/// Fractional durations mixed with durations in the millions to billions.
fn mixed_dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<(String, String, f64)>> {
    dag_with(max_tasks, prop_oneof![0.0f64..1.0, 1e6f64..1e9].boxed())
}

proptest! {
    #[test]
    fn order_respects_edges(edges in dag_strategy(10)) {
        let result = Pipeline::run(edges.clone(), &PipelineConfig::default()).unwrap();
        let order = result.order_labels();
        for (from, to, _) in &edges {
            let from_pos = order.iter().position(|t| *t == from.as_str()).unwrap();
            let to_pos = order.iter().position(|t| *t == to.as_str()).unwrap();
            prop_assert!(from_pos < to_pos);
        }
    }

    #[test]
    fn timing_is_monotone_and_tight(edges in dag_strategy(10)) {
        let result = Pipeline::run(edges, &PipelineConfig::default()).unwrap();
        let graph = &result.graph;
        let timing = &result.timing;
        let tolerance = timing.tolerance();

        for edge in graph.edges() {
            let from = timing.timing(edge.from).earliest_start;
            let to = timing.timing(edge.to).earliest_start;
            prop_assert!(to + tolerance >= from + edge.duration);
        }
        for id in graph.tasks() {
            let es = timing.timing(id).earliest_start;
            let mut incoming = graph.incoming(id).peekable();
            if incoming.peek().is_some() {
                let tight = incoming.any(|e| {
                    (timing.timing(e.from).earliest_start + e.duration - es).abs() <= tolerance
                });
                prop_assert!(tight);
            }
            prop_assert!(timing.timing(id).slack >= 0.0);
        }
    }

    #[test]
    fn critical_path_equals_makespan(edges in dag_strategy(10)) {
        let result = Pipeline::run(edges, &PipelineConfig::default()).unwrap();
        let timing = &result.timing;
        prop_assert!((timing.critical_path_length() - timing.makespan()).abs() <= timing.tolerance());

        // Consecutive edges chain, and every endpoint has zero slack
        for pair in timing.critical_path().windows(2) {
            prop_assert_eq!(pair[0].to, pair[1].from);
        }
        for edge in timing.critical_path() {
            prop_assert!(timing.timing(edge.from).is_critical());
            prop_assert!(timing.timing(edge.to).is_critical());
        }
        if let Some(last) = timing.critical_path().last() {
            prop_assert_eq!(result.graph.out_degree(last.to), 0);
        }
    }

    #[test]
    fn schedule_is_feasible(edges in dag_strategy(10), machines in 1usize..4) {
        let result = Pipeline::run(edges, &PipelineConfig::with_machines(machines)).unwrap();
        let schedule = &result.schedule;

        let placed: usize = schedule.slots().iter().map(Vec::len).sum();
        prop_assert_eq!(placed, result.graph.len());
        prop_assert!(schedule.cmax() <= result.graph.len());
        for slot in schedule.slots() {
            prop_assert!(!slot.is_empty());
            prop_assert!(slot.len() <= machines);
        }
        for edge in result.graph.edges() {
            prop_assert!(schedule.slot_of_id(edge.from) < schedule.slot_of_id(edge.to));
        }
    }

    #[test]
    fn runs_are_reproducible(edges in dag_strategy(8), machines in 1usize..4) {
        let config = PipelineConfig::with_machines(machines);
        let first = Pipeline::run(edges.clone(), &config).unwrap();
        let second = Pipeline::run(edges, &config).unwrap();
        prop_assert_eq!(first.order, second.order);
        prop_assert_eq!(first.timing, second.timing);
        prop_assert_eq!(first.schedule, second.schedule);
    }

    #[test]
    fn mixed_magnitudes_keep_critical_path(edges in mixed_dag_strategy(10)) {
        let result = Pipeline::run(edges, &PipelineConfig::default()).unwrap();
        let graph = &result.graph;
        let timing = &result.timing;
        let path = timing.critical_path();

        for id in graph.tasks() {
            let t = timing.timing(id);
            prop_assert!(t.slack >= 0.0);
            prop_assert!(t.latest_start >= t.earliest_start);
        }
        if graph.edge_count() > 0 {
            prop_assert!(!path.is_empty());
            prop_assert_eq!(graph.out_degree(path[path.len() - 1].to), 0);
        }
        let drift = timing.tolerance() * (path.len() as f64 + 1.0);
        prop_assert!((timing.critical_path_length() - timing.makespan()).abs() <= drift);
        for pair in path.windows(2) {
            prop_assert_eq!(pair[0].to, pair[1].from);
        }
        for edge in path {
            prop_assert!(timing.timing(edge.from).is_critical());
            prop_assert!(timing.timing(edge.to).is_critical());
        }
    }

    #[test]
    fn back_edge_creates_cycle(edges in dag_strategy(8)) {
        prop_assume!(!edges.is_empty());
        let graph = Graph::build(edges.clone()).unwrap();
        let order = cpm_sched::topological_sort(&graph, 0).unwrap();
        let first = graph.name(order.as_slice()[0]).to_string();
        let last = graph.name(*order.as_slice().last().unwrap()).to_string();
        // only a real cycle when last is reachable from first
        let mut cyclic = edges.clone();
        cyclic.push((last.clone(), first.clone(), 1.0));
        let result = Pipeline::run(cyclic, &PipelineConfig::default());
        if reachable(&graph, &first, &last) {
            let is_cycle = matches!(result, Err(Error::CyclicGraph { .. }));
            prop_assert!(is_cycle);
        }
    }
}

fn reachable(graph: &Graph, from: &str, to: &str) -> bool {
    let mut stack = vec![from];
    let mut seen = vec![from];
    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        for (next, _) in graph.neighbors(current) {
            if !seen.contains(&next) {
                seen.push(next);
                stack.push(next);
            }
        }
    }
    false
}

#[test]
fn three_cycle_is_rejected() {
    let result = Pipeline::run(
        [("a", "b", 1.0), ("b", "c", 1.0), ("c", "a", 1.0)],
        &PipelineConfig::default(),
    );
    assert!(matches!(result, Err(Error::CyclicGraph { .. })));
}
