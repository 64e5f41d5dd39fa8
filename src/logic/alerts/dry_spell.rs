use super::BuiltinCheck;
use crate::models::{AlertRule, ForecastDay, PriorityClass, DRY_SPELL_RULE_ID};

/// Window length needed before a dry spell can be called
pub const DRY_SPELL_MIN_DAYS: usize = 7;

/// Dry spell check - warns when no rain at all is forecast for the week
///
/// Conditions:
/// - At least 7 forecast days
/// - Every day has exactly 0 mm precipitation
///
/// Raised at High priority, the same tier as wind alerts.
pub struct DrySpellCheck;

impl BuiltinCheck for DrySpellCheck {
    fn id(&self) -> &'static str {
        DRY_SPELL_RULE_ID
    }

    fn name(&self) -> &'static str {
        "Dry Spell"
    }

    fn priority(&self) -> PriorityClass {
        PriorityClass::High
    }

    fn evaluate(&self, days: &[ForecastDay]) -> Option<AlertRule> {
        if days.len() < DRY_SPELL_MIN_DAYS || !days.iter().all(ForecastDay::is_dry) {
            return None;
        }

        Some(AlertRule::new(
            DRY_SPELL_RULE_ID,
            format!(
                "Dry spell: no rain is forecast for the next {} days. Soil moisture will drop steadily.",
                days.len()
            ),
            "Plan irrigation for moisture-sensitive crops. Mulch beds to reduce evaporation \
             and irrigate in the early morning or late evening.",
        ))
    }
}
