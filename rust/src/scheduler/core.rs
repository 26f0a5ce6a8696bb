//! Bounded list scheduling with level-synchronized admission.

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::interner::TaskId;
use crate::levels::Levels;
use crate::{log_changes, log_checks, log_debug};

use super::schedule::Schedule;
use super::state::SchedulerState;

/// Greedy list scheduler packing ready tasks into unit time slots.
///
/// Borrows the graph and levels read-only; every run owns its own
/// [`SchedulerState`].
pub struct MachineScheduler<'a> {
    graph: &'a Graph,
    levels: &'a Levels,
    machines: usize,
    verbosity: u8,
}

impl<'a> MachineScheduler<'a> {
    /// Create a new scheduler.
    ///
    /// `levels` are read as per-task priorities indexed by `TaskId`. Any
    /// assignment covering every task is accepted, so only the length is
    /// checked here; precedence is still enforced by the in-degree counters.
    ///
    /// # Returns
    /// * `Err(Error::InvalidMachineCount)` if `machines < 1`
    /// * `Err(Error::UnknownTask)` if `levels` does not cover every task
    pub fn new(graph: &'a Graph, levels: &'a Levels, machines: usize) -> Result<Self> {
        if machines < 1 {
            return Err(Error::InvalidMachineCount(machines));
        }
        if levels.len() != graph.len() {
            let missing = graph
                .tasks()
                .nth(levels.len())
                .map(|id| graph.name(id).to_string())
                .unwrap_or_default();
            return Err(Error::UnknownTask(missing));
        }
        Ok(Self {
            graph,
            levels,
            machines,
            verbosity: 0,
        })
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Run the scheduling algorithm.
    ///
    /// Each slot takes up to `machines` ready tasks in ascending level order.
    /// Successors released by a slot join the pool only after it is filled;
    /// a released task whose level is below the slot's highest level sits out
    /// the next slot before rejoining.
    pub fn schedule(&self) -> Result<Schedule> {
        let verbosity = self.verbosity;
        let mut state = SchedulerState::new(self.graph);
        let mut slots: Vec<Vec<TaskId>> = Vec::new();

        while !state.is_done() {
            if state.ready.is_empty() {
                if state.deferred.is_empty() {
                    return Err(Error::CyclicGraph {
                        ordered: state.placed,
                        total: self.graph.len(),
                    });
                }
                log_checks!(
                    verbosity,
                    "  Readmitting {} deferred tasks into empty pool",
                    state.deferred.len()
                );
                state.ready.append(&mut state.deferred);
            }

            // Stable sort keeps first-observed order among equal levels
            state.ready.sort_by_key(|&id| self.levels.get(id));
            let take = self.machines.min(state.ready.len());
            let slot: Vec<TaskId> = state.ready.drain(..take).collect();
            let slot_index = slots.len();

            let mut released = Vec::new();
            for &task in &slot {
                state.slot_of[task as usize] = Some(slot_index);
                state.placed += 1;
                for edge in self.graph.successors(task) {
                    if state.resolve(edge.to) {
                        log_debug!(
                            verbosity,
                            "    {} released by {}",
                            self.graph.name(edge.to),
                            self.graph.name(task)
                        );
                        released.push(edge.to);
                    }
                }
            }

            let max_level = slot
                .iter()
                .map(|&id| self.levels.get(id))
                .max()
                .unwrap_or(0);

            // Tasks deferred by the previous slot have now sat one out
            state.ready.append(&mut state.deferred);
            for task in released {
                if self.levels.get(task) < max_level {
                    log_checks!(
                        verbosity,
                        "  Deferring {} (level {} < {})",
                        self.graph.name(task),
                        self.levels.get(task),
                        max_level
                    );
                    state.deferred.push(task);
                } else {
                    state.ready.push(task);
                }
            }

            log_changes!(
                verbosity,
                "Slot {}: {:?}",
                slot_index,
                slot.iter().map(|&id| self.graph.name(id)).collect::<Vec<_>>()
            );
            slots.push(slot);
        }

        Ok(Schedule::new(slots, state.slot_of, self.machines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topological::topological_sort;
    use rustc_hash::FxHashMap;

    fn unit_graph(edges: &[(&str, &str)]) -> Graph {
        Graph::build(edges.iter().map(|&(from, to)| (from, to, 0.0))).unwrap()
    }

    fn rank_levels(graph: &Graph) -> Levels {
        Levels::from_order(&topological_sort(graph, 0).unwrap())
    }

    fn z_graph() -> Graph {
        unit_graph(&[
            ("z1", "z5"),
            ("z2", "z6"),
            ("z3", "z6"),
            ("z5", "z8"),
            ("z6", "z7"),
            ("z4", "z7"),
            ("z8", "z9"),
            ("z7", "z9"),
        ])
    }

    #[test]
    fn test_two_machine_scenario() {
        let graph = z_graph();
        let levels = rank_levels(&graph);
        let schedule = MachineScheduler::new(&graph, &levels, 2)
            .unwrap()
            .schedule()
            .unwrap();

        assert_eq!(
            schedule.named_slots(&graph),
            vec![
                vec!["z1", "z2"],
                vec!["z3", "z4"],
                vec!["z5", "z6"],
                vec!["z8", "z7"],
                vec!["z9"],
            ]
        );
        assert_eq!(schedule.cmax(), 5);

        let z9 = schedule.slot_of(&graph, "z9").unwrap();
        assert!(z9 > schedule.slot_of(&graph, "z8").unwrap());
        assert!(z9 > schedule.slot_of(&graph, "z7").unwrap());
    }

    #[test]
    fn test_feasibility() {
        let graph = z_graph();
        let levels = rank_levels(&graph);
        for machines in 1..=4 {
            let schedule = MachineScheduler::new(&graph, &levels, machines)
                .unwrap()
                .schedule()
                .unwrap();
            for slot in schedule.slots() {
                assert!(!slot.is_empty());
                assert!(slot.len() <= machines);
            }
            for edge in graph.edges() {
                assert!(schedule.slot_of_id(edge.from) < schedule.slot_of_id(edge.to));
            }
        }
    }

    #[test]
    fn test_single_machine_follows_levels() {
        let graph = z_graph();
        let levels = rank_levels(&graph);
        let schedule = MachineScheduler::new(&graph, &levels, 1)
            .unwrap()
            .schedule()
            .unwrap();
        assert_eq!(schedule.cmax(), graph.len());
        let flat: Vec<&str> = schedule.named_slots(&graph).concat();
        assert_eq!(
            flat,
            topological_sort(&graph, 0).unwrap().labels(&graph)
        );
    }

    #[test]
    fn test_successor_never_shares_slot() {
        // with ample machines, b must still wait for a
        let graph = unit_graph(&[("a", "b"), ("c", "d")]);
        let levels = rank_levels(&graph);
        let schedule = MachineScheduler::new(&graph, &levels, 8)
            .unwrap()
            .schedule()
            .unwrap();
        assert_eq!(
            schedule.named_slots(&graph),
            vec![vec!["a", "c"], vec!["b", "d"]]
        );
    }

    #[test]
    fn test_level_sync_defers_released_task() {
        let mut builder = crate::graph::GraphBuilder::default();
        builder.add_edge("a", "b", 0.0).unwrap();
        builder.add_task("c");
        builder.add_task("d");
        let graph = builder.build();
        let named = FxHashMap::from_iter([
            ("a".to_string(), 1),
            ("b".to_string(), 3),
            ("c".to_string(), 5),
            ("d".to_string(), 6),
        ]);
        let levels = Levels::from_named(&graph, &named).unwrap();

        let schedule = MachineScheduler::new(&graph, &levels, 2)
            .unwrap()
            .schedule()
            .unwrap();

        // b (level 3) is released by a slot topped by c (level 5), so d goes first
        assert_eq!(
            schedule.named_slots(&graph),
            vec![vec!["a", "c"], vec!["d"], vec!["b"]]
        );
    }

    #[test]
    fn test_deferred_task_sits_out_one_slot() {
        let mut builder = crate::graph::GraphBuilder::default();
        builder.add_edge("a", "b", 0.0).unwrap();
        for task in ["c", "d", "e", "f"] {
            builder.add_task(task);
        }
        let graph = builder.build();
        let named = FxHashMap::from_iter([
            ("a".to_string(), 1),
            ("b".to_string(), 3),
            ("c".to_string(), 5),
            ("d".to_string(), 6),
            ("e".to_string(), 7),
            ("f".to_string(), 8),
        ]);
        let levels = Levels::from_named(&graph, &named).unwrap();

        let schedule = MachineScheduler::new(&graph, &levels, 2)
            .unwrap()
            .schedule()
            .unwrap();

        // slot 1 tops out at level 7, yet b rejoins for slot 2 ahead of f
        assert_eq!(
            schedule.named_slots(&graph),
            vec![vec!["a", "c"], vec!["d", "e"], vec!["b", "f"]]
        );
    }

    #[test]
    fn test_deferred_readmitted_into_empty_pool() {
        let mut builder = crate::graph::GraphBuilder::default();
        builder.add_edge("a", "b", 0.0).unwrap();
        builder.add_task("c");
        let graph = builder.build();
        let named = FxHashMap::from_iter([
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("c".to_string(), 9),
        ]);
        let levels = Levels::from_named(&graph, &named).unwrap();

        let schedule = MachineScheduler::new(&graph, &levels, 2)
            .unwrap()
            .schedule()
            .unwrap();
        assert_eq!(
            schedule.named_slots(&graph),
            vec![vec!["a", "c"], vec!["b"]]
        );
    }

    #[test]
    fn test_invalid_machine_count() {
        let graph = z_graph();
        let levels = rank_levels(&graph);
        assert!(matches!(
            MachineScheduler::new(&graph, &levels, 0),
            Err(Error::InvalidMachineCount(0))
        ));
    }

    #[test]
    fn test_levels_from_other_graph_rejected() {
        let graph = z_graph();
        let small = unit_graph(&[("a", "b")]);
        let levels = rank_levels(&small);
        assert!(matches!(
            MachineScheduler::new(&graph, &levels, 2),
            Err(Error::UnknownTask(_))
        ));
    }

    #[test]
    fn test_empty_graph() {
        let graph = unit_graph(&[]);
        let levels = rank_levels(&graph);
        let schedule = MachineScheduler::new(&graph, &levels, 3)
            .unwrap()
            .schedule()
            .unwrap();
        assert_eq!(schedule.cmax(), 0);
        assert!(schedule.slots().is_empty());
    }

    #[test]
    fn test_cycle_guard() {
        let graph = unit_graph(&[("a", "b"), ("b", "a")]);
        let levels = Levels::from_named(
            &graph,
            &FxHashMap::from_iter([("a".to_string(), 1), ("b".to_string(), 2)]),
        )
        .unwrap();
        assert_eq!(
            MachineScheduler::new(&graph, &levels, 1)
                .unwrap()
                .schedule(),
            Err(Error::CyclicGraph {
                ordered: 0,
                total: 2
            })
        );
    }

    #[test]
    fn test_reproducible() {
        let graph = z_graph();
        let levels = rank_levels(&graph);
        let scheduler = MachineScheduler::new(&graph, &levels, 2).unwrap();
        assert_eq!(scheduler.schedule().unwrap(), scheduler.schedule().unwrap());
    }
}
