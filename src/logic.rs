//! Core deck behaviors shared by every surface that presents missions.
//!
//! This includes:
//!   - Selecting missions from the catalog (filter once, then partial shuffle)
//!   - Deciding staleness and regenerating on day rollover or manual refresh
//!   - Saving the handle and the settings at the edit boundary
//!   - Degrading a failed submission lookup to "nothing solved"

use std::collections::HashSet;

use rand::prelude::*;
use tracing::{error, info, instrument};

use crate::domain::{Mission, MissionSettings, Problem};
use crate::error::MissionsError;
use crate::state::AppState;
use crate::store::StoreData;
use crate::util::today_stamp;

/// Snapshot handed to the presentation layer: the stored deck plus the
/// per-request solved set.
#[derive(Debug)]
pub struct DeckView {
  pub date: Option<String>,
  pub handle: Option<String>,
  pub missions: Vec<Mission>,
  pub solved: HashSet<String>,
}

/// Draw `max_problems` distinct problems uniformly, without replacement,
/// from the subset of the catalog rated within the configured range. An
/// unrated problem counts as rating 0, so it only qualifies when the range
/// reaches down to 0. A subset smaller than the requested count is an error
/// rather than a loop that cannot finish.
pub fn select_missions(
  catalog: &[Problem],
  settings: &MissionSettings,
  rng: &mut impl Rng,
) -> Result<Vec<Mission>, MissionsError> {
  let requested = settings.max_problems as usize;
  let eligible: Vec<&Problem> = catalog
    .iter()
    .filter(|p| p.contest_id.is_some() && settings.contains(p.effective_rating()))
    .collect();

  if eligible.len() < requested {
    return Err(MissionsError::InsufficientProblems {
      available: eligible.len(),
      requested,
    });
  }

  Ok(
    eligible
      .choose_multiple(rng, requested)
      .filter_map(|p| Mission::from_problem(p))
      .collect(),
  )
}

/// True when the stored deck must be rebuilt: never generated, or generated
/// on a different calendar day.
pub fn needs_regeneration(data: &StoreData, today: &str) -> bool {
  data.missions.is_empty() || data.missions_date.as_deref() != Some(today)
}

/// Passive load: regenerate only when the stored deck is missing or stale,
/// then annotate with the solved set.
#[instrument(level = "info", skip(state))]
pub async fn load_deck(state: &AppState) -> Result<DeckView, MissionsError> {
  let today = today_stamp();
  let mut data = state.store.write().await;
  if needs_regeneration(&data, &today) {
    info!(target: "mission", stored = ?data.missions_date, %today, "Deck missing or stale; regenerating");
    regenerate(state, &mut data, &today).await?;
  }
  finish_deck(state, data).await
}

/// Manual refresh: always regenerate and overwrite, staleness ignored.
#[instrument(level = "info", skip(state))]
pub async fn refresh_deck(state: &AppState) -> Result<DeckView, MissionsError> {
  let today = today_stamp();
  let mut data = state.store.write().await;
  regenerate(state, &mut data, &today).await?;
  finish_deck(state, data).await
}

/// Fetch the catalog, select a fresh deck, and persist it together with its
/// date stamp. Runs with the store's write guard held by the caller, so a
/// second refresh waits instead of racing the first one's writes.
async fn regenerate(
  state: &AppState,
  data: &mut StoreData,
  today: &str,
) -> Result<(), MissionsError> {
  let settings = data.effective_settings(&state.fallback_settings);
  let catalog = state.catalog.fetch_problems().await?;
  let missions = select_missions(&catalog, &settings, &mut rand::thread_rng())?;
  info!(
    target: "mission",
    count = missions.len(),
    min = settings.min_rating,
    max = settings.max_rating,
    "Generated mission deck"
  );
  data.missions = missions;
  data.missions_date = Some(today.to_string());
  state.store.flush(data)
}

/// Release the store guard, then compute the transient solved set for the
/// configured handle.
async fn finish_deck(
  state: &AppState,
  data: tokio::sync::RwLockWriteGuard<'_, StoreData>,
) -> Result<DeckView, MissionsError> {
  let missions = data.missions.clone();
  let date = data.missions_date.clone();
  let handle = data.user_handle.clone();
  drop(data);

  let solved = solved_for(state, handle.as_deref()).await;
  Ok(DeckView { date, handle, missions, solved })
}

/// Solved ids for the configured handle. A missing handle or a failed
/// lookup degrades to the empty set; badges simply stay off.
#[instrument(level = "info", skip(state), fields(has_handle = handle.is_some()))]
pub async fn solved_for(state: &AppState, handle: Option<&str>) -> HashSet<String> {
  let Some(handle) = handle else {
    return HashSet::new();
  };
  match state.catalog.fetch_solved(handle).await {
    Ok(solved) => solved,
    Err(e) => {
      error!(target: "mission", %handle, error = %e, "Submission lookup failed; treating nothing as solved");
      HashSet::new()
    }
  }
}

/// Trim and persist the handle. An empty result is rejected with nothing
/// written. Saving only affects badge computation; the deck stays as-is.
#[instrument(level = "info", skip(state, raw))]
pub async fn save_handle(state: &AppState, raw: &str) -> Result<String, MissionsError> {
  let handle = raw.trim();
  if handle.is_empty() {
    return Err(MissionsError::EmptyHandle);
  }
  let mut data = state.store.write().await;
  data.user_handle = Some(handle.to_string());
  state.store.flush(&data)?;
  info!(target: "mission", %handle, "Handle saved");
  Ok(handle.to_string())
}

/// Validate at the edit boundary and persist. A rejected save writes
/// nothing; an accepted one does not regenerate the deck — the new range
/// applies on the next refresh or rollover.
#[instrument(level = "info", skip(state))]
pub async fn save_settings(
  state: &AppState,
  settings: MissionSettings,
) -> Result<(), MissionsError> {
  settings.validate()?;
  let mut data = state.store.write().await;
  data.settings = Some(settings);
  state.store.flush(&data)?;
  info!(target: "mission", "Settings saved");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn problem(contest_id: i64, index: &str, rating: Option<u32>) -> Problem {
    Problem {
      contest_id: Some(contest_id),
      index: index.into(),
      name: format!("Problem {contest_id}{index}"),
      rating,
    }
  }

  fn catalog_rated(lo: u32, hi: u32, step: u32) -> Vec<Problem> {
    (lo..=hi)
      .step_by(step as usize)
      .enumerate()
      .map(|(i, r)| problem(i as i64 + 1, "A", Some(r)))
      .collect()
  }

  fn settings(count: u32, min: u32, max: u32) -> MissionSettings {
    MissionSettings { max_problems: count, min_rating: min, max_rating: max }
  }

  #[test]
  fn selection_returns_count_distinct_missions_in_range() {
    let catalog = catalog_rated(800, 2000, 100);
    let mut rng = StdRng::seed_from_u64(7);

    let missions = select_missions(&catalog, &settings(5, 900, 1200), &mut rng).unwrap();
    assert_eq!(missions.len(), 5);

    let ids: HashSet<&str> = missions.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
    for m in &missions {
      let rating = m.rating.unwrap();
      assert!((900..=1200).contains(&rating), "rating {rating} out of range");
    }
  }

  #[test]
  fn selection_fails_instead_of_spinning_when_the_range_is_too_narrow() {
    let catalog = catalog_rated(800, 2000, 100);
    let mut rng = StdRng::seed_from_u64(7);

    // Only 1000, 1100 qualify but four are requested.
    let result = select_missions(&catalog, &settings(4, 1000, 1100), &mut rng);
    assert!(matches!(
      result,
      Err(MissionsError::InsufficientProblems { available: 2, requested: 4 })
    ));
  }

  #[test]
  fn unrated_problems_are_excluded_by_a_positive_minimum() {
    let catalog = vec![
      problem(1, "A", None),
      problem(2, "A", Some(950)),
      problem(3, "A", Some(1000)),
    ];
    let mut rng = StdRng::seed_from_u64(1);

    let missions = select_missions(&catalog, &settings(2, 900, 1200), &mut rng).unwrap();
    assert!(missions.iter().all(|m| m.rating.is_some()));

    // Requesting three can only be satisfied by pulling in the unrated one,
    // which a positive minimum forbids.
    assert!(select_missions(&catalog, &settings(3, 900, 1200), &mut rng).is_err());
  }

  #[test]
  fn unrated_problems_qualify_once_the_range_reaches_zero() {
    let catalog = vec![problem(1, "A", None), problem(2, "A", Some(800))];
    let mut rng = StdRng::seed_from_u64(1);

    let missions = select_missions(&catalog, &settings(2, 0, 1200), &mut rng).unwrap();
    assert_eq!(missions.len(), 2);
    assert!(missions.iter().any(|m| m.rating.is_none()));
  }

  #[test]
  fn problems_without_a_contest_id_never_become_missions() {
    let mut archived = problem(0, "A", Some(1000));
    archived.contest_id = None;
    let catalog = vec![archived, problem(2, "A", Some(1000))];
    let mut rng = StdRng::seed_from_u64(1);

    let result = select_missions(&catalog, &settings(2, 900, 1200), &mut rng);
    assert!(matches!(
      result,
      Err(MissionsError::InsufficientProblems { available: 1, .. })
    ));
  }

  #[test]
  fn staleness_follows_the_calendar_day_stamp() {
    let mut data = StoreData::default();
    assert!(needs_regeneration(&data, "2026-08-07"));

    data.missions = vec![Mission {
      id: "4A".into(),
      contest_id: 4,
      index: "A".into(),
      name: "Watermelon".into(),
      rating: Some(800),
    }];
    data.missions_date = Some("2026-08-06".into());
    assert!(needs_regeneration(&data, "2026-08-07"));

    data.missions_date = Some("2026-08-07".into());
    assert!(!needs_regeneration(&data, "2026-08-07"));
  }
}
