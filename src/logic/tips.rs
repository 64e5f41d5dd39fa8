use crate::models::{FarmingTip, ForecastDay, TipCategory};
use chrono::{Datelike, NaiveDate};

const RAINY_PRECIP_MM: f64 = 5.0;
const HOT_MAX_TEMP_C: f64 = 35.0;
const COLD_MIN_TEMP_C: f64 = 10.0;
const WINDY_MAX_KPH: f64 = 25.0;
const HUMID_AVG_PCT: f64 = 80.0;

/// Weather category of a single day, checked in a fixed order
pub fn category_for_day(day: &ForecastDay) -> TipCategory {
    if day.total_precip_mm > RAINY_PRECIP_MM {
        TipCategory::Rainy
    } else if day.max_temp_c >= HOT_MAX_TEMP_C {
        TipCategory::Hot
    } else if day.min_temp_c <= COLD_MIN_TEMP_C {
        TipCategory::Cold
    } else if day.max_wind_kph > WINDY_MAX_KPH {
        TipCategory::Windy
    } else if day.avg_humidity_pct > HUMID_AVG_PCT {
        TipCategory::Humidity
    } else {
        TipCategory::General
    }
}

/// Pick the tip to show today.
///
/// A tip scheduled for `date` in `language` wins. Otherwise enabled tips
/// matching today's weather are tried in `language`, then English, then the
/// general category; the choice rotates with the day of year.
pub fn tip_of_the_day<'a>(
    tips: &'a [FarmingTip],
    today: Option<&ForecastDay>,
    date: NaiveDate,
    language: &str,
) -> Option<&'a FarmingTip> {
    let enabled: Vec<&FarmingTip> = tips.iter().filter(|t| t.is_enabled).collect();

    if let Some(scheduled) = enabled
        .iter()
        .find(|t| t.scheduled_date == Some(date) && t.language == language)
    {
        return Some(*scheduled);
    }

    let category = today.map(category_for_day).unwrap_or(TipCategory::General);

    let mut attempts = vec![(category, language), (category, "en")];
    if category != TipCategory::General {
        attempts.push((TipCategory::General, language));
        attempts.push((TipCategory::General, "en"));
    }

    attempts.into_iter().find_map(|(category, language)| {
        let pool: Vec<&FarmingTip> = enabled
            .iter()
            .copied()
            .filter(|t| t.category == category && t.language == language)
            .collect();
        rotate(&pool, date)
    })
}

fn rotate<'a>(pool: &[&'a FarmingTip], date: NaiveDate) -> Option<&'a FarmingTip> {
    if pool.is_empty() {
        return None;
    }
    let index = date.ordinal0() as usize % pool.len();
    Some(pool[index])
}
