pub mod conditions;
pub mod dry_spell;
pub mod evaluator;
pub mod priority;

pub use evaluator::AlertEvaluator;

use crate::models::{AlertRule, ForecastDay, PriorityClass};

/// Alert that is part of the application rather than configured by an admin
pub trait BuiltinCheck: Send + Sync {
    /// Unique identifier for this check
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Fixed priority of the alert this check raises
    fn priority(&self) -> PriorityClass;

    /// Return the alert to raise if the forecast window meets the condition
    fn evaluate(&self, days: &[ForecastDay]) -> Option<AlertRule>;
}
