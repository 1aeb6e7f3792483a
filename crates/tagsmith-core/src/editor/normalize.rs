//! Plural/singular normalization and the two duplicate policies built on it.
//!
//! The add policy and compaction share [`normalize_tag`] but behave
//! differently: adding rejects, compaction merges. They are deliberately kept
//! as separate functions.

use std::collections::HashMap;

use crate::types::{TagEntry, TagPair};

/// Suffixes where the plural adds `es` rather than `s`.
const ES_ENDINGS: &[&str] = &["ses", "xes", "zes", "ches", "shes"];

/// Case-folded, singularized key for duplicate detection.
///
/// Rules, first match wins:
/// - `ies` -> `y` (more than 3 chars)
/// - `ses`/`xes`/`zes`/`ches`/`shes` -> drop `es`
/// - trailing `s` (more than 3 chars, not `ss`) -> drop `s`
pub fn normalize_tag(text: &str) -> String {
    let folded = text.trim().to_lowercase();
    let len = folded.chars().count();

    if len > 3 {
        if let Some(stem) = folded.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    if ES_ENDINGS.iter().any(|ending| folded.ends_with(ending)) {
        return folded[..folded.len() - 2].to_string();
    }
    if len > 3 && folded.ends_with('s') && !folded.ends_with("ss") {
        return folded[..folded.len() - 1].to_string();
    }
    folded
}

/// Whether `text` is a plural form, i.e. normalization singularized it.
pub fn is_plural(text: &str) -> bool {
    normalize_tag(text) != text.trim().to_lowercase()
}

/// Add policy: may `candidate` join `existing`?
///
/// Rejected when an entry with the same key exists, unless the candidate is
/// a plural and that entry is a singular. The plural then sits beside the
/// singular until compaction folds them.
pub fn can_add<'a, I>(existing: I, candidate: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let key = normalize_tag(candidate);
    let candidate_plural = is_plural(candidate);
    !existing
        .into_iter()
        .filter(|text| normalize_tag(text) == key)
        .any(|text| !(candidate_plural && !is_plural(text)))
}

/// Edit policy: does `candidate` collide with any entry other than `entry_id`?
pub fn collides_on_edit(entries: &[TagEntry], entry_id: u64, candidate: &str) -> bool {
    let key = normalize_tag(candidate);
    entries
        .iter()
        .filter(|entry| entry.entry_id != entry_id)
        .any(|entry| normalize_tag(&entry.primary) == key)
}

/// Fold normalized duplicates into one pair each.
///
/// Keeps the first occurrence, except that a later plural replaces a kept
/// singular in place. Entries with a blank primary text are dropped.
pub fn compact(pairs: &[TagPair]) -> Vec<TagPair> {
    let mut kept: Vec<TagPair> = Vec::with_capacity(pairs.len());
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for pair in pairs {
        if pair.primary.trim().is_empty() {
            continue;
        }
        let key = normalize_tag(&pair.primary);
        match index_by_key.get(&key) {
            None => {
                index_by_key.insert(key, kept.len());
                kept.push(pair.clone());
            }
            Some(&idx) => {
                if is_plural(&pair.primary) && !is_plural(&kept[idx].primary) {
                    kept[idx] = pair.clone();
                }
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(tags: &[&str]) -> Vec<TagPair> {
        tags.iter().map(|t| TagPair::new(*t, "")).collect()
    }

    fn primaries(pairs: &[TagPair]) -> Vec<&str> {
        pairs.iter().map(|p| p.primary.as_str()).collect()
    }

    #[test]
    fn test_normalize_rules() {
        assert_eq!(normalize_tag("Cats"), "cat");
        assert_eq!(normalize_tag("  dogs "), "dog");
        assert_eq!(normalize_tag("berries"), "berry");
        assert_eq!(normalize_tag("boxes"), "box");
        assert_eq!(normalize_tag("dishes"), "dish");
        assert_eq!(normalize_tag("benches"), "bench");
        assert_eq!(normalize_tag("glass"), "glass");
        assert_eq!(normalize_tag("bus"), "bus");
        assert_eq!(normalize_tag("ties"), "ty");
        assert_eq!(normalize_tag("1girl"), "1girl");
    }

    #[test]
    fn test_is_plural() {
        assert!(is_plural("cats"));
        assert!(is_plural("Flowers"));
        assert!(!is_plural("cat"));
        assert!(!is_plural("Cat"));
        assert!(!is_plural("dress"));
    }

    #[test]
    fn test_add_singular_when_plural_exists_is_rejected() {
        assert!(!can_add(["cats"], "cat"));
    }

    #[test]
    fn test_add_plural_when_singular_exists_is_accepted() {
        assert!(can_add(["cat"], "cats"));
    }

    #[test]
    fn test_add_exact_and_case_duplicates_rejected() {
        assert!(!can_add(["cat"], "cat"));
        assert!(!can_add(["cat"], "CAT"));
        assert!(!can_add(["cats"], "Cats"));
        assert!(can_add(["dog"], "cat"));
        assert!(can_add(Vec::<&str>::new(), "cat"));
    }

    #[test]
    fn test_edit_rejects_any_key_collision() {
        let entries = vec![TagEntry::new(1, "cat", ""), TagEntry::new(2, "dog", "")];
        assert!(collides_on_edit(&entries, 2, "cats"));
        assert!(collides_on_edit(&entries, 2, "Cat"));
        // Editing an entry into its own plural is not a collision
        assert!(!collides_on_edit(&entries, 1, "cats"));
        assert!(!collides_on_edit(&entries, 2, "bird"));
    }

    #[test]
    fn test_compact_prefers_first_then_plural() {
        let result = compact(&pairs(&["cat", "Cat", "dogs", "dog"]));
        assert_eq!(primaries(&result), vec!["cat", "dogs"]);
    }

    #[test]
    fn test_compact_upgrades_singular_in_place() {
        let result = compact(&pairs(&["cat", "red", "cats", "blue"]));
        assert_eq!(primaries(&result), vec!["cats", "red", "blue"]);
    }

    #[test]
    fn test_compact_drops_blank_and_keeps_translation() {
        let input = vec![
            TagPair::new("a", "甲"),
            TagPair::new("  ", "空"),
            TagPair::new("b", "乙"),
            TagPair::new("b", "乙2"),
        ];
        let result = compact(&input);
        assert_eq!(result, vec![TagPair::new("a", "甲"), TagPair::new("b", "乙")]);
    }
}
