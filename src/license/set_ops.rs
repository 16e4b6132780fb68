use std::collections::BTreeSet;

/// Elements of `a` whose lowercase form equals the lowercase form of some
/// element of `b`. The case of returned elements is preserved from `a`.
pub fn case_insensitive_intersect(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    let b_lower: BTreeSet<String> = b.iter().map(|item| item.to_lowercase()).collect();
    a.iter()
        .filter(|item| b_lower.contains(&item.to_lowercase()))
        .cloned()
        .collect()
}

/// Elements of `a` whose lowercase form matches no element of `b`.
pub fn case_insensitive_diff(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    let b_lower: BTreeSet<String> = b.iter().map(|item| item.to_lowercase()).collect();
    a.iter()
        .filter(|item| !b_lower.contains(&item.to_lowercase()))
        .cloned()
        .collect()
}

/// Elements of `a` that contain any element of `b` as a case-insensitive
/// substring.
pub fn partial_match_intersect(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.iter()
        .filter(|item| {
            let item_lower = item.to_lowercase();
            b.iter().any(|other| item_lower.contains(&other.to_lowercase()))
        })
        .cloned()
        .collect()
}

/// Elements of `a` that contain no element of `b` as a case-insensitive
/// substring.
pub fn partial_match_diff(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.iter()
        .filter(|item| {
            let item_lower = item.to_lowercase();
            !b.iter().any(|other| item_lower.contains(&other.to_lowercase()))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_intersect_preserves_left_case() {
        let result = case_insensitive_intersect(&set(&["MIT License", "ISC"]), &set(&["mit license"]));
        assert_eq!(result, set(&["MIT License"]));
    }

    #[test]
    fn test_diff_removes_matches() {
        let result = case_insensitive_diff(&set(&["MIT", "GPL-3.0-only"]), &set(&["mit"]));
        assert_eq!(result, set(&["GPL-3.0-only"]));
    }

    #[test]
    fn test_partial_intersect_uses_substrings() {
        let result = partial_match_intersect(&set(&["MIT License", "Apache-2.0"]), &set(&["mit"]));
        assert_eq!(result, set(&["MIT License"]));
    }

    #[test]
    fn test_partial_diff_uses_substrings() {
        let result = partial_match_diff(&set(&["MIT License", "Apache-2.0"]), &set(&["mit"]));
        assert_eq!(result, set(&["Apache-2.0"]));
    }

    #[test]
    fn test_empty_right_operand() {
        let a = set(&["MIT", "ISC"]);
        let empty = BTreeSet::new();
        assert!(case_insensitive_intersect(&a, &empty).is_empty());
        assert!(partial_match_intersect(&a, &empty).is_empty());
        assert_eq!(case_insensitive_diff(&a, &empty), a);
        assert_eq!(partial_match_diff(&a, &empty), a);
    }

    #[test]
    fn test_empty_left_operand() {
        let empty = BTreeSet::new();
        let b = set(&["MIT"]);
        assert!(case_insensitive_intersect(&empty, &b).is_empty());
        assert!(case_insensitive_diff(&empty, &b).is_empty());
        assert!(partial_match_intersect(&empty, &b).is_empty());
        assert!(partial_match_diff(&empty, &b).is_empty());
    }

    #[test]
    fn test_diff_and_intersect_partition_the_left_operand() {
        let a = set(&["MIT", "Apache-2.0", "GPL-3.0-only"]);
        let b = set(&["mit", "apache-2.0", "BSD-3-Clause"]);
        let mut union = case_insensitive_diff(&a, &b);
        union.extend(case_insensitive_intersect(&a, &b));
        assert_eq!(union, a);
    }
}
