//! Unique test data built from ULIDs, so suites sharing one coordinator
//! never collide on player names.

use ulid::Ulid;

/// `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("run");
/// assert_ne!(a, unique_str("run"));
/// assert!(a.starts_with("run-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A player name that is unique and within the 64 character limit.
///
/// ```
/// use backend_test_support::unique_helpers::unique_player_name;
///
/// let name = unique_player_name("Alice");
/// assert!(name.starts_with("Alice-"));
/// assert!(name.chars().count() <= 64);
/// ```
pub fn unique_player_name(prefix: &str) -> String {
    let prefix: String = prefix.chars().take(32).collect();
    unique_str(&prefix)
}
