//! Property tests for the column comparator and type synthesizer.

use std::collections::BTreeSet;

use proptest::prelude::*;

use oxide_refresh::prelude::*;

fn column_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,8}", 0..8)
        .prop_map(|names: BTreeSet<String>| names.into_iter().collect())
}

fn columns(names: &[String]) -> Vec<Column> {
    names.iter().map(|n| Column::new(n.as_str(), "TEXT")).collect()
}

fn data_type() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("  ".to_string())),
        Just(Some("VARCHAR".to_string())),
        Just(Some("NCHAR".to_string())),
        Just(Some("DECIMAL".to_string())),
        Just(Some("FLOAT".to_string())),
        Just(Some("DATETIME2".to_string())),
        Just(Some("INTEGER".to_string())),
        Just(Some("TEXT".to_string())),
    ]
}

fn column() -> impl Strategy<Value = Column> {
    (
        data_type(),
        prop::option::of(1u32..10_000),
        prop::option::of(1u32..38),
        prop::option::of(0u32..10),
    )
        .prop_map(|(data_type, char_size, precision, scale)| Column {
            name: "c".to_string(),
            data_type,
            char_size,
            numeric_precision: precision,
            numeric_scale: scale,
        })
}

proptest! {
    #[test]
    fn same_names_in_any_order_or_case_match(
        names in column_names(),
        seed in any::<u64>(),
    ) {
        let existing = columns(&names);
        let mut shuffled: Vec<String> = names.iter().map(|n| n.to_ascii_uppercase()).collect();
        let len = shuffled.len();
        if len > 1 {
            shuffled.rotate_left((seed as usize) % len);
        }
        let model = columns(&shuffled);

        let diff = compare(&existing, &model);
        prop_assert!(diff.columns_match());
        prop_assert!(diff.columns_to_add().is_empty());
        prop_assert!(diff.columns_to_drop().is_empty());
        prop_assert_eq!(diff.final_column_order(), names);
    }

    #[test]
    fn swapping_sides_swaps_adds_and_drops(
        left in column_names(),
        right in column_names(),
    ) {
        let forward = compare(&columns(&left), &columns(&right));
        let backward = compare(&columns(&right), &columns(&left));

        let added: Vec<&str> = forward.columns_to_add().iter().map(ColumnAddition::name).collect();
        let dropped: Vec<&str> = backward.columns_to_drop().iter().map(String::as_str).collect();
        prop_assert_eq!(added, dropped);
        prop_assert_eq!(forward.columns_match(), backward.columns_match());
    }

    #[test]
    fn final_order_keeps_survivors_then_additions(
        left in column_names(),
        right in column_names(),
    ) {
        let diff = compare(&columns(&left), &columns(&right));
        let order = diff.final_column_order();

        let survivors: Vec<String> = left.iter().filter(|n| right.contains(n)).cloned().collect();
        let additions: Vec<String> = right.iter().filter(|n| !left.contains(n)).cloned().collect();
        prop_assert_eq!(order, [survivors, additions].concat());
    }

    #[test]
    fn synthesize_is_deterministic_and_never_blank(col in column()) {
        let first = synthesize(&col);
        prop_assert_eq!(&first, &synthesize(&col.clone()));
        prop_assert!(!first.trim().is_empty());
        prop_assert!(!first.contains(' '));
    }
}
