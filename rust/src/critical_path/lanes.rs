//! Gantt lane packing of activities at their earliest start.
//!
//! Plain data for a renderer: every edge activity runs over
//! `[ES(from), ES(from) + duration)` and is placed on the lowest lane where it
//! does not overlap anything already placed.

use crate::graph::Graph;

use super::calculation::TimingAnalysis;
use super::types::ActivityBar;

/// Pack activities onto lanes in edge insertion order.
pub fn activity_lanes(graph: &Graph, timing: &TimingAnalysis) -> Vec<ActivityBar> {
    let mut lanes: Vec<Vec<ActivityBar>> = Vec::new();
    let mut bars = Vec::with_capacity(graph.edge_count());

    for edge in graph.edges() {
        let start = timing.timing(edge.from).earliest_start;
        let finish = start + edge.duration;

        let lane = lanes
            .iter()
            .position(|placed| !placed.iter().any(|bar| bar.overlaps(start, finish)))
            .unwrap_or(lanes.len());
        if lane == lanes.len() {
            lanes.push(Vec::new());
        }

        let bar = ActivityBar {
            from: edge.from,
            to: edge.to,
            start,
            finish,
            lane,
        };
        lanes[lane].push(bar);
        bars.push(bar);
    }
    bars
}

/// Number of lanes used by a packing.
pub fn lane_count(bars: &[ActivityBar]) -> usize {
    bars.iter().map(|b| b.lane + 1).max().unwrap_or(0)
}
