pub mod annotation;
pub mod component;
pub mod decl;
pub mod error;

use crate::annotation::AnnotationError;
use thiserror::Error as ThisError;

/// Conventional suffix stripped from component type names to form the base
/// of every generated member name.
pub const COMPONENT_SUFFIX: &str = "Component";

/// Fixed suffix combined with a context tag to name its lookup table.
/// Components with no declared context land in the bare default tag.
pub const LOOKUP_TAG_SUFFIX: &str = "ComponentIds";

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        COMPONENT_SUFFIX, LOOKUP_TAG_SUFFIX,
        annotation::{AnnotationError, AnnotationSet},
        component::{ComponentDescriptor, extract_components, strip_component_suffix},
        decl::{AnnotationArg, DeclField, Declaration, RawAnnotation},
        err,
        error::ErrorTree,
    };
    pub use serde::Serialize;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    AnnotationError(#[from] AnnotationError),
}
