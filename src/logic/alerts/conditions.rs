use crate::models::{AlertRule, ForecastDay};

/// A day at or below this minimum carries frost risk
pub const FROST_RISK_MAX_TEMP_C: f64 = 4.0;

/// One threshold comparison taken from a rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Frost,
    MaxTempAbove(f64),
    MinTempBelow(f64),
    RainAbove(f64),
    WindAbove(f64),
    HumidityAbove(f64),
}

impl Condition {
    /// Conditions for every threshold the rule sets
    pub fn from_rule(rule: &AlertRule) -> Vec<Condition> {
        let mut conditions = Vec::with_capacity(6);
        if rule.frost_risk {
            conditions.push(Condition::Frost);
        }
        if let Some(t) = rule.threshold_temp_max_c {
            conditions.push(Condition::MaxTempAbove(t));
        }
        if let Some(t) = rule.threshold_temp_min_c {
            conditions.push(Condition::MinTempBelow(t));
        }
        if let Some(mm) = rule.threshold_rain_mm {
            conditions.push(Condition::RainAbove(mm));
        }
        if let Some(kph) = rule.threshold_wind_kph {
            conditions.push(Condition::WindAbove(kph));
        }
        if let Some(pct) = rule.threshold_humidity_pct {
            conditions.push(Condition::HumidityAbove(pct));
        }
        conditions
    }

    pub fn holds(&self, day: &ForecastDay) -> bool {
        match *self {
            Condition::Frost => day.min_temp_c <= FROST_RISK_MAX_TEMP_C,
            Condition::MaxTempAbove(t) => day.max_temp_c > t,
            Condition::MinTempBelow(t) => day.min_temp_c < t,
            Condition::RainAbove(mm) => day.total_precip_mm > mm,
            Condition::WindAbove(kph) => day.max_wind_kph > kph,
            Condition::HumidityAbove(pct) => day.avg_humidity_pct > pct,
        }
    }
}

/// First day on which every condition of the rule holds.
///
/// No conditions never matches. Disabled rules are the caller's concern.
pub fn first_matching_day<'a>(rule: &AlertRule, days: &'a [ForecastDay]) -> Option<&'a ForecastDay> {
    let conditions = Condition::from_rule(rule);
    if conditions.is_empty() {
        return None;
    }
    days.iter()
        .find(|day| conditions.iter().all(|c| c.holds(day)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(min: f64, max: f64, precip: f64, wind: f64, humidity: f64) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            min_temp_c: min,
            max_temp_c: max,
            total_precip_mm: precip,
            max_wind_kph: wind,
            avg_humidity_pct: humidity,
        }
    }

    #[test]
    fn frost_is_inclusive_at_four_degrees() {
        assert!(Condition::Frost.holds(&day(4.0, 20.0, 0.0, 5.0, 50.0)));
        assert!(Condition::Frost.holds(&day(-1.0, 20.0, 0.0, 5.0, 50.0)));
        assert!(!Condition::Frost.holds(&day(4.1, 20.0, 0.0, 5.0, 50.0)));
    }

    #[test]
    fn threshold_comparisons_are_strict() {
        let d = day(8.0, 38.0, 10.0, 30.0, 85.0);
        assert!(!Condition::MaxTempAbove(38.0).holds(&d));
        assert!(Condition::MaxTempAbove(37.9).holds(&d));
        assert!(!Condition::MinTempBelow(8.0).holds(&d));
        assert!(Condition::MinTempBelow(8.5).holds(&d));
        assert!(!Condition::RainAbove(10.0).holds(&d));
        assert!(!Condition::WindAbove(30.0).holds(&d));
        assert!(!Condition::HumidityAbove(85.0).holds(&d));
        assert!(Condition::HumidityAbove(84.0).holds(&d));
    }

    #[test]
    fn conditions_follow_set_fields() {
        let rule = AlertRule::new("r", "m", "a").with_temp_min(20.0).with_humidity(85.0);
        assert_eq!(
            Condition::from_rule(&rule),
            vec![Condition::MinTempBelow(20.0), Condition::HumidityAbove(85.0)]
        );
        assert!(Condition::from_rule(&AlertRule::new("e", "m", "a")).is_empty());
    }

    #[test]
    fn all_conditions_must_hold_on_the_same_day() {
        let rule = AlertRule::new("hot-wind", "m", "a").with_temp_max(35.0).with_wind(20.0);
        // Heat on one day, wind on another: no single day satisfies both
        let split = [day(20.0, 37.0, 0.0, 10.0, 40.0), day(20.0, 30.0, 0.0, 25.0, 40.0)];
        assert!(first_matching_day(&rule, &split).is_none());

        let together = [day(20.0, 30.0, 0.0, 10.0, 40.0), day(20.0, 37.0, 0.0, 25.0, 40.0)];
        let matched = first_matching_day(&rule, &together).unwrap();
        assert_eq!(matched.max_temp_c, 37.0);
    }

    #[test]
    fn rule_without_thresholds_never_matches() {
        let rule = AlertRule::new("empty", "m", "a");
        let days = [day(-5.0, 45.0, 100.0, 90.0, 100.0)];
        assert!(first_matching_day(&rule, &days).is_none());
    }

    #[test]
    fn nan_readings_never_trigger() {
        let rule = AlertRule::new("r", "m", "a").with_rain(1.0);
        let days = [day(10.0, 20.0, f64::NAN, 5.0, 50.0)];
        assert!(first_matching_day(&rule, &days).is_none());
    }
}
