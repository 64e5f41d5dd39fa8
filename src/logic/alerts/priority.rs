use crate::models::{AlertRule, PriorityClass};

/// A max-temperature threshold at or above this value marks a heat rule critical
pub const CRITICAL_HEAT_THRESHOLD_C: f64 = 40.0;

type Classifier = fn(&AlertRule) -> bool;

/// Checked top to bottom; the first predicate that matches decides the class.
/// Classification looks at which thresholds a rule configures, not at the
/// forecast.
const PRIORITY_TABLE: &[(Classifier, PriorityClass)] = &[
    (is_critical, PriorityClass::Critical),
    (watches_wind, PriorityClass::High),
    (watches_rain, PriorityClass::Medium),
];

fn is_critical(rule: &AlertRule) -> bool {
    rule.frost_risk
        || rule
            .threshold_temp_max_c
            .is_some_and(|t| t >= CRITICAL_HEAT_THRESHOLD_C)
        || rule.threshold_temp_min_c.is_some()
}

fn watches_wind(rule: &AlertRule) -> bool {
    rule.threshold_wind_kph.is_some()
}

fn watches_rain(rule: &AlertRule) -> bool {
    rule.threshold_rain_mm.is_some()
}

pub fn classify(rule: &AlertRule) -> PriorityClass {
    PRIORITY_TABLE
        .iter()
        .find(|(matches, _)| matches(rule))
        .map(|(_, class)| *class)
        .unwrap_or(PriorityClass::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> AlertRule {
        AlertRule::new("r", "m", "a")
    }

    #[test]
    fn frost_is_critical() {
        assert_eq!(classify(&rule().with_frost_risk()), PriorityClass::Critical);
    }

    #[test]
    fn heat_threshold_boundary() {
        assert_eq!(classify(&rule().with_temp_max(40.0)), PriorityClass::Critical);
        assert_eq!(classify(&rule().with_temp_max(42.0)), PriorityClass::Critical);
        assert_eq!(classify(&rule().with_temp_max(39.9)), PriorityClass::Low);
    }

    #[test]
    fn any_min_temp_threshold_is_critical() {
        // Even a mild cold threshold classifies as critical
        assert_eq!(classify(&rule().with_temp_min(20.0)), PriorityClass::Critical);
    }

    #[test]
    fn first_match_wins() {
        let frost_and_wind = rule().with_frost_risk().with_wind(30.0);
        assert_eq!(classify(&frost_and_wind), PriorityClass::Critical);

        let wind_and_rain = rule().with_wind(30.0).with_rain(10.0);
        assert_eq!(classify(&wind_and_rain), PriorityClass::High);

        let hot_wind = rule().with_temp_max(35.0).with_wind(20.0);
        assert_eq!(classify(&hot_wind), PriorityClass::High);
    }

    #[test]
    fn rain_is_medium() {
        assert_eq!(classify(&rule().with_rain(5.0)), PriorityClass::Medium);
        assert_eq!(
            classify(&rule().with_rain(5.0).with_humidity(80.0)),
            PriorityClass::Medium
        );
    }

    #[test]
    fn everything_else_is_low() {
        assert_eq!(classify(&rule().with_humidity(85.0)), PriorityClass::Low);
        assert_eq!(
            classify(&rule().with_temp_max(32.0).with_humidity(30.0)),
            PriorityClass::Low
        );
        assert_eq!(classify(&rule()), PriorityClass::Low);
    }
}
