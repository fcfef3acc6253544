use serde::Serialize;

///
/// Declaration
/// One type declaration as handed over by the front-end: enough shape to
/// test the component capability and to extract a descriptor, nothing more.
/// The core is agnostic to how this was obtained.
///

#[derive(Clone, Debug, Serialize)]
pub struct Declaration {
    pub type_name: String,

    /// Externally visible instance fields, declaration order preserved.
    pub fields: Vec<DeclField>,

    pub annotations: Vec<RawAnnotation>,

    /// Whether the type implements the component capability.
    pub is_component: bool,
}

///
/// DeclField
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DeclField {
    pub name: String,
    pub ty: String,
}

impl DeclField {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

///
/// RawAnnotation
/// Declarative annotation name plus literal constructor arguments,
/// uninterpreted. Interpretation happens against the closed set in
/// [`crate::annotation`].
///

#[derive(Clone, Debug, Serialize)]
pub struct RawAnnotation {
    pub name: String,
    pub args: Vec<AnnotationArg>,
}

impl RawAnnotation {
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<AnnotationArg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

///
/// AnnotationArg
///

#[derive(Clone, Debug, Serialize)]
#[remain::sorted]
pub enum AnnotationArg {
    Bool(bool),

    /// Argument tokens that are not a plain string or boolean literal,
    /// kept verbatim for error messages.
    Other(String),

    Str(String),
}
