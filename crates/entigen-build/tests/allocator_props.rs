//! Property tests for the index allocator: identity, density and
//! reproducibility over randomized descriptor sets.

use entigen_build::lookup::{LookupTable, allocate_lookups};
use entigen_schema::component::extract_components;
use entigen_schema::decl::{AnnotationArg, DeclField, Declaration, RawAnnotation};
use entigen_schema::prelude::ComponentDescriptor;
use proptest::prelude::*;

const POOLS: [&str; 3] = ["Core", "Game", "Meta"];

fn declaration(short: &str, pool_mask: u8) -> Declaration {
    let annotations = POOLS
        .iter()
        .enumerate()
        .filter(|(i, _)| pool_mask & (1 << i) != 0)
        .map(|(_, pool)| RawAnnotation::new("pool", vec![AnnotationArg::Str((*pool).to_string())]))
        .collect();

    Declaration {
        type_name: format!("{short}Component"),
        fields: vec![DeclField::new("value", "i32")],
        annotations,
        is_component: true,
    }
}

fn descriptors(decls: &[Declaration]) -> Vec<ComponentDescriptor> {
    let (descriptors, errs) = extract_components(decls);
    assert!(errs.is_empty());
    descriptors
}

fn snapshot(tables: &[LookupTable]) -> Vec<(String, Vec<(usize, String)>)> {
    tables
        .iter()
        .map(|table| {
            (
                table.tag.clone(),
                table
                    .occupied()
                    .map(|(id, d)| (id, d.short_name.clone()))
                    .collect(),
            )
        })
        .collect()
}

/// Unique PascalCase short names paired with a pool bitmask.
fn arb_components() -> impl Strategy<Value = Vec<(String, u8)>> {
    proptest::collection::hash_map("[A-Z][a-z]{2,8}", 0u8..8, 1..10)
        .prop_map(|m| {
            let mut pairs: Vec<(String, u8)> = m.into_iter().collect();
            pairs.sort();
            pairs
        })
}

proptest! {
    #[test]
    fn cross_table_identity(pairs in arb_components()) {
        let decls: Vec<Declaration> = pairs.iter().map(|(s, m)| declaration(s, *m)).collect();
        let tables = allocate_lookups(&descriptors(&decls));

        for (short, _) in &pairs {
            let ids: Vec<usize> = tables.iter().filter_map(|t| t.id_of(short)).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] == w[1]), "ids differ for {short}: {ids:?}");
        }
    }

    #[test]
    fn no_table_holds_duplicate_ids(pairs in arb_components()) {
        let decls: Vec<Declaration> = pairs.iter().map(|(s, m)| declaration(s, *m)).collect();
        let tables = allocate_lookups(&descriptors(&decls));

        for table in &tables {
            let mut ids: Vec<usize> = table.occupied().map(|(id, _)| id).collect();
            let before = ids.len();
            ids.dedup();
            prop_assert_eq!(before, ids.len());
            prop_assert!(ids.iter().all(|id| *id < table.capacity()));
        }
    }

    #[test]
    fn allocation_is_reproducible(pairs in arb_components()) {
        let decls: Vec<Declaration> = pairs.iter().map(|(s, m)| declaration(s, *m)).collect();
        let ds = descriptors(&decls);

        prop_assert_eq!(snapshot(&allocate_lookups(&ds)), snapshot(&allocate_lookups(&ds)));
    }

    #[test]
    fn single_context_sets_are_contiguous_and_ordered(
        names in proptest::collection::hash_set("[A-Z][a-z]{2,8}", 1..10),
        pool_index in 0usize..3,
    ) {
        let mut sorted: Vec<String> = names.into_iter().collect();
        sorted.sort();

        let mask = 1u8 << pool_index;
        let decls: Vec<Declaration> = sorted.iter().map(|s| declaration(s, mask)).collect();
        let tables = allocate_lookups(&descriptors(&decls));
        let tag = format!("{}ComponentIds", POOLS[pool_index]);
        let table = tables.iter().find(|t| t.tag == tag).unwrap();

        // dense ids, assigned in type-name order
        for (ordinal, short) in sorted.iter().enumerate() {
            prop_assert_eq!(table.id_of(short), Some(ordinal));
        }

        let ids: Vec<usize> = table.occupied().map(|(id, _)| id).collect();
        prop_assert_eq!(ids, (0..table.total_components()).collect::<Vec<_>>());
    }

    #[test]
    fn uniform_multi_context_sets_are_contiguous(
        names in proptest::collection::hash_set("[A-Z][a-z]{2,8}", 1..10),
    ) {
        // every component spans the same pools, so the shared cursor fills
        // every table densely
        let mut sorted: Vec<String> = names.into_iter().collect();
        sorted.sort();

        let decls: Vec<Declaration> = sorted.iter().map(|s| declaration(s, 0b110)).collect();
        let tables = allocate_lookups(&descriptors(&decls));

        for tag in ["GameComponentIds", "MetaComponentIds"] {
            let table = tables.iter().find(|t| t.tag == tag).unwrap();
            let ids: Vec<usize> = table.occupied().map(|(id, _)| id).collect();
            prop_assert_eq!(ids, (0..sorted.len()).collect::<Vec<_>>());
        }
    }
}
