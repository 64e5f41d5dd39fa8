use super::{conditions, dry_spell::DrySpellCheck, priority, BuiltinCheck};
use crate::models::{ActiveAlert, AlertRule, ForecastDay, PriorityClass};

/// A rule that fired during evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub rule: AlertRule,
    pub priority_class: PriorityClass,
}

/// Picks the single most urgent weather alert for a forecast window.
///
/// Evaluation is pure: no I/O and no state carried between calls, so one
/// evaluator can be shared freely.
pub struct AlertEvaluator {
    builtins: Vec<Box<dyn BuiltinCheck>>,
}

impl AlertEvaluator {
    pub fn new() -> Self {
        let builtins: Vec<Box<dyn BuiltinCheck>> = vec![Box::new(DrySpellCheck)];
        Self { builtins }
    }

    /// Every alert that fires, admin rules first in input order, then
    /// built-in checks, stably sorted by priority.
    pub fn candidates(&self, days: &[ForecastDay], rules: &[AlertRule]) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = rules
            .iter()
            .filter(|rule| rule.is_enabled)
            .filter(|rule| conditions::first_matching_day(rule, days).is_some())
            .map(|rule| Candidate {
                rule: rule.clone(),
                priority_class: priority::classify(rule),
            })
            .collect();

        candidates.extend(self.builtins.iter().filter_map(|check| {
            check.evaluate(days).map(|rule| Candidate {
                rule,
                priority_class: check.priority(),
            })
        }));

        // sort_by_key is stable: equal priorities keep input order
        candidates.sort_by_key(|c| c.priority_class.rank());
        candidates
    }

    pub fn evaluate(&self, days: &[ForecastDay], rules: &[AlertRule]) -> ActiveAlert {
        let candidates = self.candidates(days, rules);
        tracing::debug!(
            days = days.len(),
            rules = rules.len(),
            triggered = candidates.len(),
            "Evaluated weather alert rules"
        );

        match candidates.into_iter().next() {
            Some(top) => ActiveAlert::Triggered {
                rule: top.rule,
                priority_class: top.priority_class,
            },
            None => ActiveAlert::Normal,
        }
    }

    pub fn list_builtins(&self) -> Vec<(&'static str, &'static str)> {
        self.builtins.iter().map(|c| (c.id(), c.name())).collect()
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertIcon, AlertVariant, DRY_SPELL_RULE_ID};
    use chrono::NaiveDate;

    fn benign_week() -> Vec<ForecastDay> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        (0..7)
            .map(|i| ForecastDay {
                date: start + chrono::Duration::days(i),
                min_temp_c: 22.0,
                max_temp_c: 32.0,
                total_precip_mm: if i == 0 { 1.5 } else { 0.0 },
                max_wind_kph: 12.0,
                avg_humidity_pct: 55.0,
            })
            .collect()
    }

    fn dry_week() -> Vec<ForecastDay> {
        let mut days = benign_week();
        days[0].total_precip_mm = 0.0;
        days
    }

    #[test]
    fn no_rules_and_some_rain_is_normal() {
        let evaluator = AlertEvaluator::new();
        assert_eq!(evaluator.evaluate(&benign_week(), &[]), ActiveAlert::Normal);
    }

    #[test]
    fn rules_without_thresholds_are_normal() {
        let evaluator = AlertEvaluator::new();
        let rules = vec![
            AlertRule::new("a", "No thresholds", ""),
            AlertRule::new("b", "Disabled", "").with_rain(0.5).disabled(),
        ];
        assert!(evaluator.evaluate(&benign_week(), &rules).is_normal());
        // Short window with no rain cannot be a dry spell either
        assert!(evaluator.evaluate(&dry_week()[..5], &rules).is_normal());
    }

    #[test]
    fn empty_rules_on_dry_week_raise_dry_spell() {
        let evaluator = AlertEvaluator::new();
        let alert = evaluator.evaluate(&dry_week(), &[]);
        assert_eq!(alert.rule().map(|r| r.id.as_str()), Some(DRY_SPELL_RULE_ID));
        assert_eq!(alert.priority_class(), Some(PriorityClass::High));
        assert_eq!(alert.icon(), AlertIcon::Sun);
    }

    #[test]
    fn critical_beats_low() {
        let mut days = benign_week();
        days[2].min_temp_c = 3.0;
        days[4].avg_humidity_pct = 92.0;
        let rules = vec![
            AlertRule::new("humid", "Humid", "").with_humidity(85.0),
            AlertRule::new("frost", "Frost", "").with_frost_risk(),
        ];
        let alert = AlertEvaluator::new().evaluate(&days, &rules);
        assert_eq!(alert.rule().map(|r| r.id.as_str()), Some("frost"));
        assert_eq!(alert.priority_class(), Some(PriorityClass::Critical));
        assert_eq!(alert.variant(), AlertVariant::Destructive);
    }

    #[test]
    fn rain_threshold_boundary_is_strict() {
        let rules = vec![AlertRule::new("rain", "Rain", "").with_rain(10.0)];
        let evaluator = AlertEvaluator::new();

        let mut days = benign_week();
        days[3].total_precip_mm = 10.0;
        assert!(evaluator.evaluate(&days, &rules).is_normal());

        days[3].total_precip_mm = 10.1;
        let alert = evaluator.evaluate(&days, &rules);
        assert_eq!(alert.rule().map(|r| r.id.as_str()), Some("rain"));
        assert_eq!(alert.priority_class(), Some(PriorityClass::Medium));
        assert_eq!(alert.icon(), AlertIcon::Rain);
    }

    #[test]
    fn disabled_rule_never_becomes_a_candidate() {
        let mut days = benign_week();
        days[1].max_wind_kph = 60.0;
        let rules = vec![AlertRule::new("wind", "Wind", "").with_wind(30.0).disabled()];
        let evaluator = AlertEvaluator::new();
        assert!(evaluator.candidates(&days, &rules).is_empty());
        assert!(evaluator.evaluate(&days, &rules).is_normal());
    }

    #[test]
    fn heat_rule_beats_wind_rule() {
        let mut days = benign_week();
        days[2].max_temp_c = 41.0;
        days[4].max_wind_kph = 35.0;
        let rules = vec![
            AlertRule::new("r1", "Heat", "").with_temp_max(40.0),
            AlertRule::new("r2", "Wind", "").with_wind(30.0),
        ];
        let alert = AlertEvaluator::new().evaluate(&days, &rules);
        assert_eq!(alert.rule().map(|r| r.id.as_str()), Some("r1"));
        assert_eq!(alert.priority_class(), Some(PriorityClass::Critical));
    }

    #[test]
    fn wind_rule_wins_when_heat_stays_below_threshold() {
        let mut days = benign_week();
        days[2].max_temp_c = 39.0;
        days[4].max_wind_kph = 35.0;
        let rules = vec![
            AlertRule::new("r1", "Heat", "").with_temp_max(40.0),
            AlertRule::new("r2", "Wind", "").with_wind(30.0),
        ];
        let alert = AlertEvaluator::new().evaluate(&days, &rules);
        assert_eq!(alert.rule().map(|r| r.id.as_str()), Some("r2"));
        assert_eq!(alert.priority_class(), Some(PriorityClass::High));
        assert_eq!(alert.icon(), AlertIcon::Wind);
        assert_eq!(alert.variant(), AlertVariant::Warning);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut days = benign_week();
        days[5].total_precip_mm = 20.0;
        let rules = vec![
            AlertRule::new("light", "Light rain", "").with_rain(5.0),
            AlertRule::new("moderate", "Moderate rain", "").with_rain(15.0),
        ];
        let evaluator = AlertEvaluator::new();
        let alert = evaluator.evaluate(&days, &rules);
        assert_eq!(alert.rule().map(|r| r.id.as_str()), Some("light"));

        let reversed: Vec<_> = rules.into_iter().rev().collect();
        let alert = evaluator.evaluate(&days, &reversed);
        assert_eq!(alert.rule().map(|r| r.id.as_str()), Some("moderate"));
    }

    #[test]
    fn admin_wind_rule_precedes_dry_spell_at_same_priority() {
        let mut days = dry_week();
        days[6].max_wind_kph = 40.0;
        let rules = vec![AlertRule::new("wind", "Wind", "").with_wind(30.0)];
        let candidates = AlertEvaluator::new().candidates(&days, &rules);
        let ids: Vec<_> = candidates.iter().map(|c| c.rule.id.as_str()).collect();
        assert_eq!(ids, vec!["wind", DRY_SPELL_RULE_ID]);
    }

    #[test]
    fn critical_rule_beats_dry_spell() {
        let mut days = dry_week();
        days[0].min_temp_c = 2.0;
        let rules = vec![AlertRule::new("frost", "Frost", "").with_frost_risk()];
        let alert = AlertEvaluator::new().evaluate(&days, &rules);
        assert_eq!(alert.rule().map(|r| r.id.as_str()), Some("frost"));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let mut days = benign_week();
        days[3].total_precip_mm = 45.0;
        let rules = vec![
            AlertRule::new("rain-heavy", "Heavy rain", "").with_rain(40.0),
            AlertRule::new("humid", "Humid", "").with_humidity(50.0),
        ];
        let evaluator = AlertEvaluator::new();
        let first = evaluator.evaluate(&days, &rules);
        let second = evaluator.evaluate(&days, &rules);
        assert_eq!(first, second);
        assert_eq!(first.rule().map(|r| r.id.as_str()), Some("rain-heavy"));
    }

    #[test]
    fn builtins_are_listed() {
        let builtins = AlertEvaluator::new().list_builtins();
        assert_eq!(builtins, vec![(DRY_SPELL_RULE_ID, "Dry Spell")]);
    }
}
