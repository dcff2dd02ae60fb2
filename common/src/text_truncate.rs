/// Upper bound on stored failure reasons. RPC errors can echo whole response
/// bodies back, which would bloat a report of several thousand records.
pub const FAILURE_REASON_LIMIT: usize = 256;

pub fn truncate_with_count(s: &str, limit: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= limit {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(limit).collect();
        let remaining = char_count - limit;
        format!("{truncated}...({remaining} more chars)")
    }
}
