//! End-to-end generation scenarios over the pure planning pipeline and the
//! on-disk writer.

use entigen_build::{BuildError, generate, plan};
use entigen_schema::decl::{AnnotationArg, DeclField, Declaration, RawAnnotation};
use pretty_assertions::assert_eq;
use quote::quote;

fn component(type_name: &str, fields: Vec<DeclField>, annotations: Vec<RawAnnotation>) -> Declaration {
    Declaration {
        type_name: type_name.to_string(),
        fields,
        annotations,
        is_component: true,
    }
}

fn pool(name: &str) -> RawAnnotation {
    RawAnnotation::new("pool", vec![AnnotationArg::Str(name.to_string())])
}

fn contains_tokens(haystack: &str, needle: proc_macro2::TokenStream) -> bool {
    haystack.contains(&needle.to_string())
}

fn file_named<'a>(plan: &'a entigen_build::GenerationPlan, name: &str) -> &'a str {
    &plan
        .files
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("no file named {name}"))
        .contents
}

#[test]
fn scenario_one_component_one_field() {
    let decls = vec![component(
        "CountComponent",
        vec![DeclField::new("count", "i32")],
        vec![],
    )];
    let outcome = plan(&decls).unwrap();

    assert!(outcome.errors.is_empty());

    let lookup = file_named(&outcome, "component_ids");
    assert!(contains_tokens(lookup, quote!(pub const COUNT: usize = 0;)));
    assert!(contains_tokens(lookup, quote!(pub const TOTAL_COMPONENTS: usize = 1;)));

    let accessors = file_named(&outcome, "count_accessors");
    for fragment in [
        quote!(fn count(&self) -> &CountComponent),
        quote!(fn has_count(&self) -> bool),
        quote!(fn add_count(&mut self, new_count: i32) -> &mut Self),
        quote!(fn replace_count(&mut self, new_count: i32) -> &mut Self),
        quote!(fn remove_count(&mut self) -> &mut Self),
    ] {
        assert!(contains_tokens(accessors, fragment));
    }
}

#[test]
fn scenario_two_components_share_ids_across_both_pools() {
    let decls = vec![
        component(
            "CoinsComponent",
            vec![DeclField::new("count", "i64")],
            vec![pool("Meta"), pool("Game")],
        ),
        component(
            "ScoreComponent",
            vec![DeclField::new("value", "u32")],
            vec![pool("Meta"), pool("Game")],
        ),
    ];
    let outcome = plan(&decls).unwrap();

    let game = outcome.tables.iter().find(|t| t.tag == "GameComponentIds").unwrap();
    let meta = outcome.tables.iter().find(|t| t.tag == "MetaComponentIds").unwrap();

    assert_eq!(game.id_of("Coins"), meta.id_of("Coins"));
    assert_eq!(game.id_of("Score"), meta.id_of("Score"));

    let mut ids: Vec<usize> = game.occupied().map(|(id, _)| id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1]);
}

#[test]
fn scenario_marker_component_has_no_free_list() {
    let decls = vec![component("MovableComponent", vec![], vec![])];
    let outcome = plan(&decls).unwrap();

    let accessors = file_named(&outcome, "movable_accessors");
    assert!(contains_tokens(accessors, quote!(fn is_movable(&self) -> bool)));
    assert!(contains_tokens(accessors, quote!(fn set_movable(&mut self, value: bool) -> &mut Self)));
    assert!(contains_tokens(
        accessors,
        quote!(self.shared_component::<MovableComponent>(component_ids::MOVABLE)),
    ));
    assert!(!accessors.contains("pool_reclaim"));
    assert!(!accessors.contains("pool_recycle"));
    assert!(!accessors.contains("new_"));
}

#[test]
fn scenario_single_instance_creation_signals_duplicates() {
    let decls = vec![component(
        "CoinsComponent",
        vec![DeclField::new("count", "i64")],
        vec![RawAnnotation::new("single_entity", vec![])],
    )];
    let outcome = plan(&decls).unwrap();

    let accessors = file_named(&outcome, "coins_accessors");
    assert!(contains_tokens(accessors, quote!(fn coins_entity(&self) -> Option<&Entity>)));
    assert!(contains_tokens(
        accessors,
        quote!(fn set_coins(&mut self, new_count: i64) -> Result<&mut Entity, SingleEntityError>),
    ));
    assert!(contains_tokens(
        accessors,
        quote!(return Err(SingleEntityError::new(component_ids::COINS));),
    ));
}

#[test]
fn scenario_dont_generate_excludes_everywhere() {
    let decls = vec![
        component(
            "HiddenComponent",
            vec![DeclField::new("x", "u8")],
            vec![RawAnnotation::new("dont_generate", vec![])],
        ),
        component("VisibleComponent", vec![DeclField::new("y", "u8")], vec![]),
    ];
    let outcome = plan(&decls).unwrap();

    assert!(outcome.files.iter().all(|f| f.name != "hidden_accessors"));
    assert!(!file_named(&outcome, "component_ids").contains("HIDDEN"));
    assert!(file_named(&outcome, "component_ids").contains("VISIBLE"));
}

#[test]
fn dont_generate_false_still_generates() {
    let decls = vec![component(
        "ShownComponent",
        vec![DeclField::new("x", "u8")],
        vec![RawAnnotation::new("dont_generate", vec![AnnotationArg::Bool(false)])],
    )];
    let outcome = plan(&decls).unwrap();

    assert!(outcome.files.iter().any(|f| f.name == "shown_accessors"));
    assert!(file_named(&outcome, "component_ids").contains("SHOWN"));
}

#[test]
fn round_trip_naming_holds_for_every_occupied_slot() {
    let decls = vec![
        component("AlphaComponent", vec![DeclField::new("a", "u8")], vec![pool("Game")]),
        component("BetaComponent", vec![], vec![pool("Game"), pool("Meta")]),
        component("GammaComponent", vec![DeclField::new("g", "u8")], vec![]),
    ];
    let outcome = plan(&decls).unwrap();

    for table in &outcome.tables {
        let names: Vec<&str> = table.occupied().map(|(_, d)| d.short_name.as_str()).collect();
        for (id, descriptor) in table.occupied() {
            assert_eq!(names[id], descriptor.short_name);
        }
    }
}

#[test]
fn two_runs_produce_byte_identical_output() {
    let decls = vec![
        component("CoinsComponent", vec![DeclField::new("count", "i64")], vec![pool("Meta")]),
        component("MovableComponent", vec![], vec![]),
        component(
            "ScoreComponent",
            vec![DeclField::new("value", "u32")],
            vec![pool("Game"), pool("Meta")],
        ),
    ];

    let first = plan(&decls).unwrap();
    let second = plan(&decls).unwrap();

    let render = |p: &entigen_build::GenerationPlan| {
        p.files
            .iter()
            .map(|f| (f.name.clone(), f.contents.clone()))
            .collect::<Vec<_>>()
    };

    assert_eq!(render(&first), render(&second));
}

#[test]
fn malformed_descriptor_does_not_stop_the_batch() {
    let decls = vec![
        component("BrokenComponent", vec![], vec![RawAnnotation::new("pool", vec![])]),
        component("FineComponent", vec![DeclField::new("x", "u8")], vec![]),
    ];
    let outcome = plan(&decls).unwrap();

    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.files.iter().any(|f| f.name == "fine_accessors"));
}

#[test]
fn empty_declaration_list_fails_fast() {
    assert!(matches!(plan(&[]), Err(BuildError::NoDeclarations)));
}

#[test]
fn empty_input_never_touches_the_output_location() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("project");

    let result = generate(&[], &root);

    assert!(matches!(result, Err(BuildError::NoDeclarations)));
    assert!(!root.exists());
}

#[test]
fn full_run_writes_and_replaces_previous_output() {
    let tmp = tempfile::tempdir().unwrap();
    let generated = tmp.path().join("generated");
    std::fs::create_dir_all(&generated).unwrap();
    std::fs::write(generated.join("stale_accessors.rs"), "old").unwrap();

    let decls = vec![component(
        "CountComponent",
        vec![DeclField::new("count", "i32")],
        vec![],
    )];
    let report = generate(&decls, tmp.path()).unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(
        report.written,
        vec![
            "component_ids".to_string(),
            "pools".to_string(),
            "count_accessors".to_string()
        ]
    );
    assert!(!generated.join("stale_accessors.rs").exists());
    assert!(generated.join("component_ids.rs").is_file());
    assert!(generated.join("count_accessors.rs").is_file());
}
