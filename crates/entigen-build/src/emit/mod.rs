pub mod accessors;
pub mod lookup;
pub mod pools;

use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span, TokenStream};
use thiserror::Error as ThisError;

/// Suffix for per-component accessor file names.
pub const ACCESSORS_SUFFIX: &str = "Accessors";

///
/// EmitError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum EmitError {
    #[error("field '{field}' on '{type_name}' has an unparseable type '{ty}'")]
    BadFieldType {
        type_name: String,
        field: String,
        ty: String,
    },
}

///
/// GeneratedFile
/// One emitted unit: a deterministic file name (the writer appends the
/// extension) and a text body using `\n` internally.
///

#[derive(Clone, Debug)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

impl GeneratedFile {
    /// Join emitted sections with a blank line between them.
    #[must_use]
    pub fn from_sections(name: impl Into<String>, sections: &[TokenStream]) -> Self {
        let contents = sections
            .iter()
            .map(ToString::to_string)
            .filter(|section| !section.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        Self {
            name: name.into(),
            contents,
        }
    }
}

/// Deterministic file name for an emitted unit.
pub(crate) fn file_name(base: &str) -> String {
    base.to_case(Case::Snake)
}

/// Ident from a name that is expected to be valid; falls back to a raw
/// ident when the name lands on a keyword (`type` → `r#type`).
pub(crate) fn safe_ident(name: &str) -> Ident {
    syn::parse_str::<Ident>(name).unwrap_or_else(|_| Ident::new_raw(name, Span::call_site()))
}

/// Snake-case ident; falls back to a raw ident when the conversion lands on
/// a keyword (`MoveComponent` → `r#move`).
pub(crate) fn snake_ident(name: &str) -> Ident {
    safe_ident(&name.to_case(Case::Snake))
}

/// Upper-snake ident for generated constants.
pub(crate) fn upper_ident(name: &str) -> Ident {
    Ident::new(&name.to_case(Case::UpperSnake), Span::call_site())
}

/// Prefixed member ident (`has_coins`, `set_movable`). Prefixing always
/// steers clear of the keyword set.
pub(crate) fn prefixed_ident(prefix: &str, name: &str) -> Ident {
    Ident::new(
        &format!("{prefix}_{}", name.to_case(Case::Snake)),
        Span::call_site(),
    )
}

/// Suffixed member ident (`coins_entity`, `game_board_entity`).
pub(crate) fn suffixed_ident(name: &str, suffix: &str) -> Ident {
    Ident::new(
        &format!("{}_{suffix}", name.to_case(Case::Snake)),
        Span::call_site(),
    )
}

///
/// TESTS
///
