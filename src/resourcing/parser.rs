//! Allocation strings.
//!
//! Two forms are accepted:
//!
//! ```text
//! Alice:40;Bob:60     explicit percentages
//! Alice;Bob;Carl      equal split, floor(100 / n) each
//! ```
//!
//! A single `:` anywhere switches the whole string to the explicit form.

use crate::models::AllocationEntry;

/// Parse a raw allocation string. Never fails: malformed percentages count
/// as 0 and an empty string yields no entries.
///
/// The equal split drops the remainder, so three names get 33 each and the
/// missing 1% is not redistributed. Explicit percentages are clamped to
/// [0, 100] individually; the set as a whole may sum past 100.
pub fn parse_allocations(raw: &str) -> Vec<AllocationEntry> {
    let parts: Vec<&str> = raw
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        return Vec::new();
    }

    if parts.iter().any(|p| p.contains(':')) {
        parts.into_iter().map(parse_explicit).collect()
    } else {
        let per = 100 / parts.len() as u32;
        parts
            .into_iter()
            .map(|name| AllocationEntry::new(name, per))
            .collect()
    }
}

fn parse_explicit(part: &str) -> AllocationEntry {
    let mut pieces = part.split(':').map(str::trim);
    let name = pieces.next().unwrap_or_default();
    let percent = pieces.next().map(parse_percent).unwrap_or(0);
    AllocationEntry::new(name, percent)
}

/// Leading-integer parse clamped to [0, 100], so `"40%"` reads as 40 and
/// `"abc"` as 0.
pub(crate) fn parse_percent(s: &str) -> u32 {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return 0;
    }

    // Anything too long for u64 is far above the cap anyway.
    digits.parse::<u64>().map_or(100, |v| v.min(100) as u32)
}

/// Write allocations back in explicit form, skipping zero entries.
pub fn format_allocations(entries: &[AllocationEntry]) -> String {
    entries
        .iter()
        .filter(|e| e.percent > 0)
        .map(|e| format!("{}:{}", e.person, e.percent))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, u32)]) -> Vec<AllocationEntry> {
        pairs
            .iter()
            .map(|(p, v)| AllocationEntry::new(*p, *v))
            .collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_allocations("").is_empty());
        assert!(parse_allocations(" ; ;").is_empty());
    }

    #[test]
    fn single_name_gets_everything() {
        assert_eq!(parse_allocations("Alice"), entries(&[("Alice", 100)]));
    }

    #[test]
    fn bare_names_split_evenly() {
        assert_eq!(
            parse_allocations("Alice;Bob"),
            entries(&[("Alice", 50), ("Bob", 50)])
        );
    }

    #[test]
    fn equal_split_drops_the_remainder() {
        assert_eq!(
            parse_allocations("Alice;Bob;Carl"),
            entries(&[("Alice", 33), ("Bob", 33), ("Carl", 33)])
        );
    }

    #[test]
    fn explicit_percentages_are_not_normalized() {
        assert_eq!(
            parse_allocations("Alice:40;Bob:70"),
            entries(&[("Alice", 40), ("Bob", 70)])
        );
    }

    #[test]
    fn explicit_percentages_clamp_per_entry() {
        assert_eq!(
            parse_allocations("Alice:140;Bob:-20"),
            entries(&[("Alice", 100), ("Bob", 0)])
        );
    }

    #[test]
    fn malformed_percent_counts_as_zero() {
        assert_eq!(
            parse_allocations("Alice:lots; Bob : 30 "),
            entries(&[("Alice", 0), ("Bob", 30)])
        );
    }

    #[test]
    fn one_colon_switches_every_segment_to_explicit() {
        assert_eq!(
            parse_allocations("Alice:60;Bob"),
            entries(&[("Alice", 60), ("Bob", 0)])
        );
    }

    #[test]
    fn trailing_text_after_digits_is_ignored() {
        assert_eq!(parse_allocations("Alice:40%"), entries(&[("Alice", 40)]));
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(
            parse_allocations("Zed:20"),
            entries(&[("Zed", 20)])
        );
    }

    #[test]
    fn format_skips_zero_entries() {
        let raw = format_allocations(&entries(&[("Alice", 40), ("Bob", 0), ("Cyril", 60)]));
        assert_eq!(raw, "Alice:40;Cyril:60");
        assert_eq!(
            parse_allocations(&raw),
            entries(&[("Alice", 40), ("Cyril", 60)])
        );
    }
}
