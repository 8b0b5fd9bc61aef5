//! Feasibility checking, route totals and plan scoring.
//!
//! - [`validator`] — incremental constraint checks ([`can_append`])
//! - [`RouteEvaluator`] — builds finalized routes with all totals
//! - [`objective`] — plan score: unassigned count, then normalized weighted sum

mod evaluator;
pub mod objective;
pub mod validator;

pub use evaluator::RouteEvaluator;
pub use objective::{
    plan_metrics, score_plan, Normalizer, PlanMetrics, PlanScore, UNASSIGNED_PENALTY,
};
pub use validator::{can_append, check_sequence, close_route, RouteState, Step};
