//! Small utility helpers used across modules.

use chrono::Local;

/// Calendar-day stamp used to decide deck staleness. Any read on a new local
/// day compares unequal against the stored stamp and triggers regeneration.
pub fn today_stamp() -> String {
  Local::now().format("%Y-%m-%d").to_string()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    s.to_string()
  } else {
    let mut cut = max;
    while !s.is_char_boundary(cut) {
      cut -= 1;
    }
    format!("{}… ({} bytes total)", &s[..cut], s.len())
  }
}
