//! Minimal Codeforces API client for our use-cases.
//!
//! We only call `problemset.problems` and `user.status`, both plain GETs
//! answered with a single JSON payload wrapped in the `{status, result}`
//! envelope. No retry, no pagination. Calls are instrumented and log
//! latencies and result sizes (not payload contents).

use std::collections::HashSet;
use std::time::Duration;

use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domain::{composite_id, Problem};
use crate::error::MissionsError;
use crate::util::trunc_for_log;

/// Verdict string the catalog uses for an accepted submission.
const ACCEPTED_VERDICT: &str = "OK";

#[derive(Clone)]
pub struct CodeforcesClient {
  client: reqwest::Client,
  api_base: String,
}

/// Envelope every catalog endpoint answers with.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
  status: String,
  #[serde(default)]
  result: Option<T>,
  #[serde(default)]
  comment: Option<String>,
}

#[derive(Deserialize)]
struct ProblemsetResult {
  problems: Vec<Problem>,
}

#[derive(Debug, Deserialize)]
pub struct Submission {
  #[serde(default)]
  pub verdict: Option<String>,
  pub problem: SubmissionProblem,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionProblem {
  #[serde(default, rename = "contestId")]
  pub contest_id: Option<i64>,
  pub index: String,
}

impl CodeforcesClient {
  pub fn new(api_base: impl Into<String>) -> Result<Self, MissionsError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()?;
    Ok(Self { client, api_base: api_base.into() })
  }

  async fn call<T: DeserializeOwned>(
    &self,
    method: &str,
    query: &[(&str, &str)],
  ) -> Result<T, MissionsError> {
    let url = format!("{}/{}", self.api_base, method);
    let res = self
      .client
      .get(&url)
      .query(query)
      .header(USER_AGENT, "missiondeck-backend/0.1")
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      return Err(MissionsError::Api(format!(
        "HTTP {}: {}",
        status,
        trunc_for_log(&body, 200)
      )));
    }

    let envelope: ApiEnvelope<T> = res.json().await?;
    if envelope.status != "OK" {
      return Err(MissionsError::Api(
        envelope
          .comment
          .unwrap_or_else(|| "catalog did not complete the request".into()),
      ));
    }
    envelope
      .result
      .ok_or_else(|| MissionsError::Api("catalog returned an empty result".into()))
  }

  /// Fetch the full problem catalog. The response is assumed complete in one
  /// payload.
  #[instrument(level = "info", skip(self))]
  pub async fn fetch_problems(&self) -> Result<Vec<Problem>, MissionsError> {
    let start = std::time::Instant::now();
    let result: ProblemsetResult = self.call("problemset.problems", &[]).await?;
    info!(
      target: "missiondeck_backend",
      problems = result.problems.len(),
      elapsed_ms = start.elapsed().as_millis() as u64,
      "Fetched problem catalog"
    );
    Ok(result.problems)
  }

  /// Composite ids of every problem the handle has an accepted submission
  /// for. Callers degrade a failure to the empty set.
  #[instrument(level = "info", skip(self), fields(%handle))]
  pub async fn fetch_solved(&self, handle: &str) -> Result<HashSet<String>, MissionsError> {
    let submissions: Vec<Submission> = self.call("user.status", &[("handle", handle)]).await?;
    let solved = solved_from_submissions(&submissions);
    info!(
      target: "missiondeck_backend",
      submissions = submissions.len(),
      solved = solved.len(),
      "Fetched submission history"
    );
    Ok(solved)
  }
}

/// Accepted submissions only. Entries without a contest id (archive
/// problems) cannot be addressed by composite id and are skipped.
pub fn solved_from_submissions(submissions: &[Submission]) -> HashSet<String> {
  let mut solved = HashSet::new();
  for sub in submissions {
    if sub.verdict.as_deref() != Some(ACCEPTED_VERDICT) {
      continue;
    }
    if let Some(contest_id) = sub.problem.contest_id {
      solved.insert(composite_id(contest_id, &sub.problem.index));
    }
  }
  solved
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn envelope_parses_a_problemset_payload() {
    let raw = r#"{
      "status": "OK",
      "result": {
        "problems": [
          {"contestId": 4, "index": "A", "name": "Watermelon", "rating": 800},
          {"contestId": 1, "index": "B", "name": "Spreadsheets"}
        ]
      }
    }"#;
    let envelope: ApiEnvelope<ProblemsetResult> = serde_json::from_str(raw).unwrap();
    assert_eq!(envelope.status, "OK");
    let problems = envelope.result.unwrap().problems;
    assert_eq!(problems.len(), 2);
    assert_eq!(problems[0].rating, Some(800));
    assert_eq!(problems[1].rating, None);
  }

  #[test]
  fn envelope_carries_the_failure_comment() {
    let raw = r#"{"status": "FAILED", "comment": "handle: User not found"}"#;
    let envelope: ApiEnvelope<ProblemsetResult> = serde_json::from_str(raw).unwrap();
    assert_ne!(envelope.status, "OK");
    assert_eq!(envelope.comment.as_deref(), Some("handle: User not found"));
  }

  #[test]
  fn solved_set_keeps_accepted_composite_ids_only() {
    let raw = r#"[
      {"verdict": "OK", "problem": {"contestId": 4, "index": "A"}},
      {"verdict": "WRONG_ANSWER", "problem": {"contestId": 4, "index": "B"}},
      {"verdict": "OK", "problem": {"index": "A"}},
      {"verdict": "OK", "problem": {"contestId": 4, "index": "A"}}
    ]"#;
    let submissions: Vec<Submission> = serde_json::from_str(raw).unwrap();
    let solved = solved_from_submissions(&submissions);
    assert_eq!(solved.len(), 1);
    assert!(solved.contains("4A"));
  }
}
