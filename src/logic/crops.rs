use crate::models::{Crop, Season};
use chrono::NaiveDate;

/// Visible crops suited to a season active on `date`, optionally limited to
/// crops grown in `state_id`. Sorted by English name.
pub fn recommend<'a>(crops: &'a [Crop], state_id: Option<&str>, date: NaiveDate) -> Vec<&'a Crop> {
    let seasons = Season::active_on(date);

    let mut picks: Vec<&Crop> = crops
        .iter()
        .filter(|c| c.is_visible)
        .filter(|c| seasons.iter().any(|s| c.suits_season(s.id)))
        .filter(|c| state_id.map_or(true, |state| c.grows_in_state(state)))
        .collect();

    picks.sort_by(|a, b| a.name_english.cmp(&b.name_english));
    picks
}

/// Names of the seasons active on `date`, for headings
pub fn current_season_names(date: NaiveDate) -> Vec<&'static str> {
    Season::active_on(date).into_iter().map(|s| s.name).collect()
}
