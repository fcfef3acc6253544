use crate::{
    decl::{AnnotationArg, RawAnnotation},
    error::ErrorTree,
};
use convert_case::{Case, Casing};
use thiserror::Error as ThisError;

/// Scopes a component to a named context; repeatable.
pub const POOL: &str = "pool";

/// Constrains a component to at most one live entity per context.
pub const SINGLE_ENTITY: &str = "single_entity";

/// Opts a type out of code generation. An explicit `false` argument does
/// not suppress; only an explicit or implicit `true` does.
pub const DONT_GENERATE: &str = "dont_generate";

///
/// AnnotationError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum AnnotationError {
    #[error("dont_generate on '{type_name}' takes at most one boolean literal")]
    MalformedDontGenerate { type_name: String },

    #[error("pool annotation on '{type_name}' requires exactly one string literal name")]
    MalformedPool { type_name: String },

    #[error("pool name '{pool}' on '{type_name}' must be a PascalCase identifier")]
    PoolNameCase { type_name: String, pool: String },
}

///
/// AnnotationSet
/// The closed set of recognized declarative markers on one declaration.
/// Annotations outside the set belong to other tooling and are ignored.
///

#[derive(Debug, Default)]
pub struct AnnotationSet {
    /// Declared context names, lexicographically sorted, deduplicated.
    pub pools: Vec<String>,

    pub single_entity: bool,

    pub dont_generate: bool,
}

impl AnnotationSet {
    /// Interpret the raw annotations of one declaration. Malformed arguments
    /// on a recognized annotation are descriptor-level errors; the whole
    /// declaration is rejected and the caller moves on.
    pub fn parse(type_name: &str, annotations: &[RawAnnotation]) -> Result<Self, ErrorTree> {
        let mut set = Self::default();
        let mut errs = ErrorTree::new();
        let mut dont_generate_flags = Vec::new();

        for annotation in annotations {
            match annotation.name.as_str() {
                POOL => match annotation.args.as_slice() {
                    [AnnotationArg::Str(pool)] if pool.is_case(Case::Pascal) => {
                        set.pools.push(pool.clone());
                    }
                    [AnnotationArg::Str(pool)] => errs.add(AnnotationError::PoolNameCase {
                        type_name: type_name.to_string(),
                        pool: pool.clone(),
                    }),
                    _ => errs.add(AnnotationError::MalformedPool {
                        type_name: type_name.to_string(),
                    }),
                },

                SINGLE_ENTITY => set.single_entity = true,

                DONT_GENERATE => match annotation.args.as_slice() {
                    [] => dont_generate_flags.push(true),
                    [AnnotationArg::Bool(flag)] => dont_generate_flags.push(*flag),
                    _ => errs.add(AnnotationError::MalformedDontGenerate {
                        type_name: type_name.to_string(),
                    }),
                },

                _ => {}
            }
        }

        // any explicit false wins over a bare marker
        set.dont_generate = !dont_generate_flags.is_empty() && dont_generate_flags.iter().all(|f| *f);

        set.pools.sort();
        set.pools.dedup();

        if errs.is_empty() { Ok(set) } else { Err(errs) }
    }
}

///
/// TESTS
///
