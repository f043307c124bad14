//! Public DTOs for the HTTP API (serde ready).
//! Keep this small and stable so the views can evolve independently of the
//! backend internals.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::Mission;
use crate::logic::DeckView;

/// One mission as a view renders it: solved badge and external problem URL
/// included. `rating` is absent for unrated problems.
#[derive(Debug, Serialize)]
pub struct MissionOut {
    pub id: String,
    #[serde(rename = "contestId")]
    pub contest_id: i64,
    pub index: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
    pub solved: bool,
    pub url: String,
}

/// Full deck payload. Both views (compact and full) render from this shape.
#[derive(Debug, Serialize)]
pub struct DeckOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub missions: Vec<MissionOut>,
}

/// Convert one stored mission to the public DTO, marking it solved when its
/// composite id is in the solved set.
pub fn mission_to_out(m: &Mission, solved: &HashSet<String>, problem_base: &str) -> MissionOut {
    MissionOut {
        id: m.id.clone(),
        contest_id: m.contest_id,
        index: m.index.clone(),
        name: m.name.clone(),
        rating: m.rating,
        solved: solved.contains(&m.id),
        url: format!("{}/{}/{}", problem_base, m.contest_id, m.index),
    }
}

pub fn deck_to_out(view: &DeckView, problem_base: &str) -> DeckOut {
    DeckOut {
        date: view.date.clone(),
        handle: view.handle.clone(),
        missions: view
            .missions
            .iter()
            .map(|m| mission_to_out(m, &view.solved, problem_base))
            .collect(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct HandleIn {
    pub handle: String,
}

#[derive(Debug, Serialize)]
pub struct HandleOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

#[derive(Serialize)]
pub struct StatusOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEM_BASE: &str = "https://codeforces.com/problemset/problem";

    fn mission() -> Mission {
        Mission {
            id: "4A".into(),
            contest_id: 4,
            index: "A".into(),
            name: "Watermelon".into(),
            rating: Some(800),
        }
    }

    #[test]
    fn solved_badge_follows_set_membership() {
        let mut solved = HashSet::new();
        assert!(!mission_to_out(&mission(), &solved, PROBLEM_BASE).solved);

        solved.insert("4A".to_string());
        assert!(mission_to_out(&mission(), &solved, PROBLEM_BASE).solved);
    }

    #[test]
    fn url_addresses_the_external_problem_page() {
        let out = mission_to_out(&mission(), &HashSet::new(), PROBLEM_BASE);
        assert_eq!(out.url, "https://codeforces.com/problemset/problem/4/A");
    }
}
