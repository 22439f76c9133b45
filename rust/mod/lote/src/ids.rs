//! History entry ids.
//!
//! An id is the creation time in epoch milliseconds, as decimal text. Two
//! entries created in the same millisecond would collide, so the next id is
//! bumped past the newest one already in the ledger.

/// Id for an entry created at `now_millis`, given the newest existing id.
pub fn next_id(now_millis: i64, newest: Option<&str>) -> String {
    let floor = newest
        .and_then(|id| id.parse::<i64>().ok())
        .map(|last| last.saturating_add(1));

    match floor {
        Some(floor) if floor > now_millis => floor.to_string(),
        _ => now_millis.to_string(),
    }
}

/// Creation time encoded in an id, if it is one of ours.
pub fn created_millis(id: &str) -> Option<i64> {
    id.parse().ok()
}
