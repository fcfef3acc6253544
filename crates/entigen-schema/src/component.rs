use crate::{
    COMPONENT_SUFFIX, LOOKUP_TAG_SUFFIX,
    annotation::AnnotationSet,
    decl::{DeclField, Declaration},
    error::ErrorTree,
};
use serde::Serialize;

///
/// ComponentDescriptor
/// Everything the generators need to know about one component type.
/// Rebuilt from scratch each run, never persisted.
///

#[derive(Clone, Debug, Serialize)]
pub struct ComponentDescriptor {
    pub type_name: String,

    /// `type_name` with the conventional suffix stripped; the stable key for
    /// every generated symbol referencing this component.
    pub short_name: String,

    /// Instance data fields, declaration order preserved exactly.
    pub fields: Vec<DeclField>,

    /// Declared context names, lexicographically sorted; empty means the
    /// default context.
    pub context_tags: Vec<String>,

    pub is_single_instance: bool,

    pub skip_generation: bool,
}

impl ComponentDescriptor {
    fn from_declaration(decl: &Declaration) -> Result<Self, ErrorTree> {
        let set = AnnotationSet::parse(&decl.type_name, &decl.annotations)?;

        Ok(Self {
            type_name: decl.type_name.clone(),
            short_name: strip_component_suffix(&decl.type_name).to_string(),
            fields: decl.fields.clone(),
            context_tags: set.pools,
            is_single_instance: set.single_entity,
            skip_generation: set.dont_generate,
        })
    }

    /// A marker carries no data; it is represented by one shared instance
    /// and a boolean presence flag instead of per-entity allocations.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lookup tags this component must appear in: each context tag combined
    /// with the fixed suffix, or the single default tag when none declared.
    #[must_use]
    pub fn lookup_tags(&self) -> Vec<String> {
        if self.context_tags.is_empty() {
            vec![LOOKUP_TAG_SUFFIX.to_string()]
        } else {
            self.context_tags
                .iter()
                .map(|tag| format!("{tag}{LOOKUP_TAG_SUFFIX}"))
                .collect()
        }
    }
}

/// Strip one trailing `Component` from a type name. A name that is nothing
/// but the suffix keeps itself, so the short name never goes empty.
#[must_use]
pub fn strip_component_suffix(type_name: &str) -> &str {
    match type_name.strip_suffix(COMPONENT_SUFFIX) {
        Some(base) if !base.is_empty() => base,
        _ => type_name,
    }
}

/// Convert the declaration list into descriptors for every type with the
/// component capability. Types without the capability are excluded silently
/// (filtering, not validation); a recognized annotation with malformed
/// arguments skips that descriptor, accumulates the error, and extraction
/// continues for all others.
#[must_use]
pub fn extract_components(decls: &[Declaration]) -> (Vec<ComponentDescriptor>, ErrorTree) {
    let mut descriptors = Vec::new();
    let mut errs = ErrorTree::new();

    for decl in decls.iter().filter(|d| d.is_component) {
        match ComponentDescriptor::from_declaration(decl) {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(tree) => errs.merge(tree),
        }
    }

    (descriptors, errs)
}

///
/// TESTS
///
