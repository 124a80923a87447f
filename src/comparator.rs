// 🔍 Comparator - per-rank difference and match-quality predicates
// Stateless functions over one triplet, independent of any rendering concern

use crate::record::{FieldValues, NameValue, RankValues};

/// True iff the current and proposed interpretations are not identical.
///
/// Plain value equality: `Missing` equals only `Missing`, the `Unmatched`
/// sentinel equals only itself. Verbatim is never inspected here.
pub fn values_differ(values: &RankValues) -> bool {
    values.current != values.proposed
}

/// True iff the rank's stable-key counterpart changed. Independent of the
/// name comparison - a display name and its key can change separately.
pub fn key_differs(values: &RankValues) -> bool {
    values.current_key != values.proposed_key
}

/// `values_differ` for a non-rank comparison field
pub fn field_differs(values: &FieldValues) -> bool {
    values.current != values.proposed
}

/// Case-folded, parenthesis-stripped form of a real name.
/// `Missing` and `Unmatched` cannot be normalized.
fn normalized(value: &NameValue) -> Option<String> {
    value
        .as_name()
        .map(|name| name.to_lowercase().replace('(', "").replace(')', ""))
}

/// True iff the values differ but only in casing and/or parentheses
pub fn is_cosmetic_change(values: &RankValues) -> bool {
    if !values_differ(values) {
        return false;
    }
    match (normalized(&values.current), normalized(&values.proposed)) {
        (Some(current), Some(proposed)) => current == proposed,
        _ => false,
    }
}

/// True iff current was an exact transcription of the verbatim text and the
/// proposed change abandons that exact match.
///
/// Guarded on current being a real name: an unmatched or missing current
/// value cannot have "broken" a perfect match. The guard is applied to this
/// predicate and to `did_achieve_perfect_match` symmetrically.
pub fn was_perfect_match_broken(values: &RankValues) -> bool {
    values.current.is_name() && values.verbatim == values.current && values_differ(values)
}

/// True iff the proposed interpretation now exactly reproduces the verbatim
/// text, which current did not. Same guard as `was_perfect_match_broken`.
pub fn did_achieve_perfect_match(values: &RankValues) -> bool {
    values.current.is_name() && values.verbatim == values.proposed && values_differ(values)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> NameValue {
        NameValue::Name(text.to_string())
    }

    fn triplet(verbatim: NameValue, current: NameValue, proposed: NameValue) -> RankValues {
        RankValues {
            verbatim,
            current,
            proposed,
            verbatim_key: None,
            current_key: None,
            proposed_key: None,
        }
    }

    #[test]
    fn test_values_differ_plain() {
        assert!(values_differ(&triplet(
            NameValue::Missing,
            name("Abies"),
            name("Picea")
        )));
        assert!(!values_differ(&triplet(
            NameValue::Missing,
            name("Abies"),
            name("Abies")
        )));
        // Equality is case sensitive
        assert!(values_differ(&triplet(
            NameValue::Missing,
            name("Abies"),
            name("abies")
        )));
    }

    #[test]
    fn test_values_differ_null_handling() {
        // Absent on both sides compares equal
        assert!(!values_differ(&triplet(
            NameValue::Missing,
            NameValue::Missing,
            NameValue::Missing
        )));
        // Absent on one side only is a difference
        assert!(values_differ(&triplet(
            NameValue::Missing,
            name("Abies"),
            NameValue::Missing
        )));
        assert!(values_differ(&triplet(
            NameValue::Missing,
            NameValue::Missing,
            name("Abies")
        )));
    }

    #[test]
    fn test_sentinel_is_an_ordinary_value_for_equality() {
        assert!(!values_differ(&triplet(
            NameValue::Missing,
            NameValue::Unmatched,
            NameValue::Unmatched
        )));
        assert!(values_differ(&triplet(
            NameValue::Missing,
            NameValue::Unmatched,
            name("Abies")
        )));
        assert!(values_differ(&triplet(
            NameValue::Missing,
            NameValue::Unmatched,
            NameValue::Missing
        )));
    }

    #[test]
    fn test_key_differs_independent_of_name() {
        let mut values = triplet(NameValue::Missing, name("Abies"), name("Abies"));
        values.current_key = Some("2684876".to_string());
        values.proposed_key = Some("2684877".to_string());

        assert!(!values_differ(&values));
        assert!(key_differs(&values));

        values.proposed_key = Some("2684876".to_string());
        assert!(!key_differs(&values));
    }

    #[test]
    fn test_cosmetic_change_case_only() {
        let values = triplet(NameValue::Missing, name("Abies"), name("abies"));
        assert!(values_differ(&values));
        assert!(is_cosmetic_change(&values));

        // Symmetric under swapping the cased operand
        let swapped = triplet(NameValue::Missing, name("abies"), name("Abies"));
        assert!(is_cosmetic_change(&swapped));
    }

    #[test]
    fn test_cosmetic_change_parenthesis_only() {
        let values = triplet(
            NameValue::Missing,
            name("Pinus nigra (L.)"),
            name("Pinus nigra L."),
        );
        assert!(is_cosmetic_change(&values));

        // Symmetric under inserting parentheses on the other operand
        let swapped = triplet(
            NameValue::Missing,
            name("Pinus nigra L."),
            name("Pinus nigra (L.)"),
        );
        assert!(is_cosmetic_change(&swapped));
    }

    #[test]
    fn test_cosmetic_change_false_when_substantive() {
        let values = triplet(NameValue::Missing, name("Abies"), name("Picea"));
        assert!(!is_cosmetic_change(&values));
    }

    #[test]
    fn test_cosmetic_change_false_when_values_equal() {
        let values = triplet(NameValue::Missing, name("Abies"), name("Abies"));
        assert!(!is_cosmetic_change(&values));
    }

    #[test]
    fn test_cosmetic_change_guards_unnormalizable_operands() {
        assert!(!is_cosmetic_change(&triplet(
            NameValue::Missing,
            NameValue::Missing,
            name("abies")
        )));
        assert!(!is_cosmetic_change(&triplet(
            NameValue::Missing,
            NameValue::Unmatched,
            name("abies")
        )));
        assert!(!is_cosmetic_change(&triplet(
            NameValue::Missing,
            name("abies"),
            NameValue::Missing
        )));
    }

    #[test]
    fn test_perfect_match_broken() {
        // current equals verbatim exactly, proposed moves away
        let values = triplet(name("Abies"), name("Abies"), name("abies"));
        assert!(values_differ(&values));
        assert!(is_cosmetic_change(&values));
        assert!(was_perfect_match_broken(&values));
        assert!(!did_achieve_perfect_match(&values));
    }

    #[test]
    fn test_perfect_match_broken_requires_exact_verbatim_match() {
        let values = triplet(name("Abies Mill."), name("Abies"), name("Picea"));
        assert!(!was_perfect_match_broken(&values));
    }

    #[test]
    fn test_achieved_perfect_match() {
        let values = triplet(name("Abies"), name("Abies alba"), name("Abies"));
        assert!(did_achieve_perfect_match(&values));
        assert!(!was_perfect_match_broken(&values));
    }

    #[test]
    fn test_sentinel_guard_applies_to_both_predicates() {
        // current is unmatched: neither predicate may fire, even though the
        // proposed value reproduces verbatim exactly
        let values = triplet(name("Abies"), NameValue::Unmatched, name("Abies"));
        assert!(values_differ(&values));
        assert!(!did_achieve_perfect_match(&values));
        assert!(!was_perfect_match_broken(&values));

        // same for a missing current value
        let values = triplet(name("Abies"), NameValue::Missing, name("Abies"));
        assert!(!did_achieve_perfect_match(&values));
        assert!(!was_perfect_match_broken(&values));
    }

    #[test]
    fn test_broken_and_achieved_are_mutually_exclusive() {
        let cases = vec![
            triplet(name("Abies"), name("Abies"), name("abies")),
            triplet(name("Abies"), name("Abies alba"), name("Abies")),
            triplet(name("Abies"), name("Picea"), name("Larix")),
            triplet(NameValue::Missing, name("Abies"), name("Picea")),
            triplet(name("Abies"), NameValue::Unmatched, name("Abies")),
        ];

        for values in cases {
            assert!(
                !(was_perfect_match_broken(&values) && did_achieve_perfect_match(&values)),
                "predicates must never fire together: {:?}",
                values
            );
        }
    }
}
