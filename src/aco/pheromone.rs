//! Pheromone trails over matrix nodes.

use crate::engine::{Plan, ProblemContext};

/// Dense pheromone matrix with trail bounds (MAX-MIN style).
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    data: Vec<f64>,
    size: usize,
    min: f64,
    max: f64,
}

impl PheromoneMatrix {
    /// All trails start at `initial`, clamped to `[min, max]`.
    pub fn new(size: usize, initial: f64, min: f64, max: f64) -> Self {
        Self {
            data: vec![initial.clamp(min, max); size * size],
            size,
            min,
            max,
        }
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Multiplies every trail by `1 - rate`.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        let min = self.min;
        for t in &mut self.data {
            *t = (*t * keep).max(min);
        }
    }

    pub fn deposit(&mut self, from: usize, to: usize, amount: f64) {
        let t = &mut self.data[from * self.size + to];
        *t = (*t + amount).clamp(self.min, self.max);
    }

    /// Deposits `amount` on every edge a plan drives, from each vehicle's
    /// start through its stops.
    pub fn reinforce(&mut self, ctx: &ProblemContext<'_>, plan: &Plan, amount: f64) {
        for (v, seq) in plan.routes().iter().enumerate() {
            let mut prev = ctx.start_node(v);
            for &loc in seq {
                self.deposit(prev, loc, amount);
                prev = loc;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_hold() {
        let mut p = PheromoneMatrix::new(3, 1.0, 0.1, 2.0);
        p.deposit(0, 1, 5.0);
        assert_eq!(p.get(0, 1), 2.0);
        for _ in 0..100 {
            p.evaporate(0.5);
        }
        assert_eq!(p.get(0, 1), 0.1);
        assert_eq!(p.get(2, 2), 0.1);
    }

    #[test]
    fn test_evaporate_scales() {
        let mut p = PheromoneMatrix::new(2, 1.0, 0.01, 10.0);
        p.evaporate(0.25);
        assert!((p.get(1, 0) - 0.75).abs() < 1e-12);
    }
}
