//! Counting offenses on a charge line

use std::sync::LazyLock;

use regex::Regex;

static COUNTS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) counts").unwrap_or_else(|e| unreachable!("counts pattern: {e}"))
});

/// Number of offenses a charge line stands for
///
/// A line such as `"Assault, 3 counts"` counts as 3. Anything without a
/// `"<digits> counts"` phrase (case-insensitive) counts as a single offense,
/// as does a number too large to represent.
///
/// ```
/// use blotter::count_for_charge;
///
/// assert_eq!(count_for_charge("assault, 3 counts"), 3);
/// assert_eq!(count_for_charge("public intoxication"), 1);
/// ```
pub fn count_for_charge(text: &str) -> u32 {
    let folded = text.to_lowercase();
    COUNTS_PATTERN
        .captures(&folded)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}
