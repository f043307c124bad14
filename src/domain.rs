//! Domain models used by the backend: catalog problems, missions, and the
//! user-editable mission settings.

use serde::{Deserialize, Serialize};

use crate::error::MissionsError;

/// One entry of the remote problem catalog, taken verbatim from the
/// problemset payload. Immutable once fetched.
#[derive(Clone, Debug, Deserialize)]
pub struct Problem {
  #[serde(default, rename = "contestId")]
  pub contest_id: Option<i64>,
  pub index: String,
  pub name: String,
  /// Absent for unrated problems.
  #[serde(default)]
  pub rating: Option<u32>,
}

impl Problem {
  /// Rating used for range checks; an unrated problem counts as 0.
  pub fn effective_rating(&self) -> u32 {
    self.rating.unwrap_or(0)
  }
}

/// A problem selected for the current day. Replaced wholesale on refresh or
/// date rollover, never individually mutated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Mission {
  pub id: String,
  #[serde(rename = "contestId")]
  pub contest_id: i64,
  pub index: String,
  pub name: String,
  #[serde(default)]
  pub rating: Option<u32>,
}

impl Mission {
  /// Returns None for catalog entries without a contest id (archive
  /// problems), which cannot be addressed by composite id.
  pub fn from_problem(p: &Problem) -> Option<Self> {
    let contest_id = p.contest_id?;
    Some(Self {
      id: composite_id(contest_id, &p.index),
      contest_id,
      index: p.index.clone(),
      name: p.name.clone(),
      rating: p.rating,
    })
  }
}

/// Composite problem identifier as the catalog spells it, e.g. `4A`.
/// Also the key of the solved set.
pub fn composite_id(contest_id: i64, index: &str) -> String {
  format!("{contest_id}{index}")
}

/// User-editable deck parameters. Field spelling matches the persisted and
/// wire shape. The invariant is enforced only at the edit boundary
/// (`validate`); stored data is trusted as-is.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MissionSettings {
  #[serde(rename = "maxProblems")]
  pub max_problems: u32,
  #[serde(rename = "minRating")]
  pub min_rating: u32,
  #[serde(rename = "maxRating")]
  pub max_rating: u32,
}

impl Default for MissionSettings {
  fn default() -> Self {
    Self {
      max_problems: 5,
      min_rating: 900,
      max_rating: 1200,
    }
  }
}

impl MissionSettings {
  pub const MAX_DECK_SIZE: u32 = 10;

  pub fn validate(&self) -> Result<(), MissionsError> {
    if self.max_problems < 1 || self.max_problems > Self::MAX_DECK_SIZE {
      return Err(MissionsError::InvalidSettings(format!(
        "mission count must be between 1 and {}",
        Self::MAX_DECK_SIZE
      )));
    }
    if self.min_rating >= self.max_rating {
      return Err(MissionsError::InvalidSettings(
        "minimum rating must be below maximum rating".into(),
      ));
    }
    Ok(())
  }

  /// Inclusive range check.
  pub fn contains(&self, rating: u32) -> bool {
    rating >= self.min_rating && rating <= self.max_rating
  }
}
