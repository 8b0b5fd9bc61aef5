//! Run diagnostics attached to every solution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The route-generation strategies the optimizer can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    Greedy,
    Genetic,
    Annealing,
    AntColony,
}

impl EngineKind {
    /// All engines, in the order the optimizer runs them.
    pub const ALL: [EngineKind; 4] = [
        EngineKind::Greedy,
        EngineKind::Genetic,
        EngineKind::Annealing,
        EngineKind::AntColony,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Greedy => "greedy",
            EngineKind::Genetic => "genetic",
            EngineKind::Annealing => "annealing",
            EngineKind::AntColony => "ant_colony",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How an engine run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineStatus {
    /// Ran to its own termination criterion.
    Completed,
    /// Stopped at the wall-clock budget; its result is the best seen so far.
    TimedOut,
}

/// Outcome of one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    pub engine: EngineKind,
    pub status: EngineStatus,
    /// Scalar score of the engine's best plan: normalized weighted sum plus
    /// 100 per unassigned location. Plans are ranked by `unassigned` first.
    pub score: f64,
    /// Generations, temperature steps or colony iterations; 1 for greedy.
    pub iterations: usize,
    pub unassigned: usize,
    pub elapsed_ms: u64,
}

/// What the 2-opt pass did to the selected plan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImprovementReport {
    pub moves_applied: usize,
    pub distance_before_km: f64,
    pub distance_after_km: f64,
}

/// Diagnostics for one optimization call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Engine whose plan was selected; `None` only for the default value.
    pub selected_engine: Option<EngineKind>,
    /// Objective score of the returned solution.
    pub objective_score: f64,
    pub elapsed_ms: u64,
    /// Seed the stochastic engines used; pass it back to reproduce the run.
    pub seed: u64,
    pub engines: Vec<EngineReport>,
    pub improvement: ImprovementReport,
}

impl Diagnostics {
    /// Engines that hit the wall-clock budget.
    pub fn timed_out(&self) -> Vec<EngineKind> {
        self.engines
            .iter()
            .filter(|r| r.status == EngineStatus::TimedOut)
            .map(|r| r.engine)
            .collect()
    }
}
