//! Wildcard byte-pattern matching over in-memory buffers.
//!
//! Patterns are `Option<u8>` slices where `None` matches any byte.

/// Find all occurrences of a wildcard pattern in a buffer.
///
/// Returns the byte offsets where the pattern starts. Candidate positions are
/// found with `memchr` on the first literal byte of the pattern.
///
/// # Example
///
/// ```
/// use fishnotify_core::process::pattern::find_matches;
///
/// let buffer = [1, 2, 3, 1, 9, 3];
/// let matches = find_matches(&buffer, &[Some(1), None, Some(3)]);
/// assert_eq!(matches, vec![0, 3]);
/// ```
pub fn find_matches(buffer: &[u8], pattern: &[Option<u8>]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > buffer.len() {
        return Vec::new();
    }

    let last = buffer.len() - pattern.len();

    let Some((anchor, anchor_byte)) = pattern
        .iter()
        .enumerate()
        .find_map(|(i, b)| b.map(|value| (i, value)))
    else {
        // All wildcards
        return (0..=last).collect();
    };

    memchr::memchr_iter(anchor_byte, &buffer[anchor..=last + anchor])
        .filter(|&start| matches_at(buffer, start, pattern))
        .collect()
}

fn matches_at(buffer: &[u8], start: usize, pattern: &[Option<u8>]) -> bool {
    buffer[start..start + pattern.len()]
        .iter()
        .zip(pattern)
        .all(|(byte, expected)| expected.is_none_or(|value| *byte == value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matches_basic() {
        let buffer = [1, 2, 3, 4, 5, 1, 2, 3];
        let matches = find_matches(&buffer, &[Some(1), Some(2), Some(3)]);
        assert_eq!(matches, vec![0, 5]);
    }

    #[test]
    fn test_find_matches_no_match() {
        let buffer = [1, 2, 3, 4, 5];
        assert!(find_matches(&buffer, &[Some(6), Some(7)]).is_empty());
    }

    #[test]
    fn test_find_matches_empty_pattern() {
        let buffer = [1, 2, 3];
        assert!(find_matches(&buffer, &[]).is_empty());
    }

    #[test]
    fn test_find_matches_pattern_larger_than_buffer() {
        let buffer = [1, 2];
        assert!(find_matches(&buffer, &[Some(1), Some(2), None]).is_empty());
    }

    #[test]
    fn test_find_matches_leading_wildcard() {
        let buffer = [9, 1, 3, 7, 1, 3];
        // Pattern: [??, 1, 3]
        let matches = find_matches(&buffer, &[None, Some(1), Some(3)]);
        assert_eq!(matches, vec![0, 3]);
    }

    #[test]
    fn test_find_matches_anchor_near_end_is_not_out_of_bounds() {
        let buffer = [0, 0, 1];
        // The anchor byte at index 2 cannot start a full match.
        assert!(find_matches(&buffer, &[Some(1), None]).is_empty());
    }

    #[test]
    fn test_find_matches_all_wildcards() {
        let buffer = [1, 2, 3, 4, 5];
        assert_eq!(find_matches(&buffer, &[None, None]), vec![0, 1, 2, 3]);
    }
}
