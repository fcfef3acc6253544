use entigen_schema::decl::{AnnotationArg, DeclField, Declaration, RawAnnotation};
use quote::ToTokens;
use std::{fs, path::Path};
use syn::{Fields, Item, ItemStruct, punctuated::Punctuated, token::Comma};
use thiserror::Error as ThisError;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Capability marker looked for in a struct's derive list.
const COMPONENT_DERIVE: &str = "Component";

///
/// ScanError
///

#[derive(Debug, ThisError)]
pub enum ScanError {
    #[error("source root '{0}' is not a readable directory")]
    BadRoot(String),
}

/// Walk the source root and convert every struct declaration into the shape
/// the core consumes. Unreadable or unparseable files are skipped with a
/// warning; the scan is a filter, not a validator.
pub fn scan_sources(root: &Path) -> Result<Vec<Declaration>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::BadRoot(root.display().to_string()));
    }

    let mut decls = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "rs") {
            continue;
        }

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("skipping unreadable {}: {e}", path.display());
                continue;
            }
        };

        match syn::parse_file(&source) {
            Ok(file) => {
                let before = decls.len();
                collect_structs(&file.items, &mut decls);
                debug!("{}: {} declaration(s)", path.display(), decls.len() - before);
            }
            Err(e) => warn!("skipping unparseable {}: {e}", path.display()),
        }
    }

    Ok(decls)
}

fn collect_structs(items: &[Item], decls: &mut Vec<Declaration>) {
    for item in items {
        match item {
            Item::Struct(item) => decls.push(declaration_from_struct(item)),
            Item::Mod(module) => {
                if let Some((_, items)) = &module.content {
                    collect_structs(items, decls);
                }
            }
            _ => {}
        }
    }
}

fn declaration_from_struct(item: &ItemStruct) -> Declaration {
    Declaration {
        type_name: item.ident.to_string(),
        fields: public_named_fields(&item.fields),
        annotations: raw_annotations(&item.attrs),
        is_component: derives_component(&item.attrs),
    }
}

/// Instance data is restricted to public named fields; everything else on
/// the type is ignored. Declaration order is preserved.
fn public_named_fields(fields: &Fields) -> Vec<DeclField> {
    let Fields::Named(named) = fields else {
        return Vec::new();
    };

    named
        .named
        .iter()
        .filter(|field| matches!(field.vis, syn::Visibility::Public(_)))
        .filter_map(|field| {
            field
                .ident
                .as_ref()
                .map(|ident| DeclField::new(ident.to_string(), field.ty.to_token_stream().to_string()))
        })
        .collect()
}

fn derives_component(attrs: &[syn::Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .any(|attr| {
            attr.parse_args_with(Punctuated::<syn::Path, Comma>::parse_terminated)
                .map(|paths| {
                    paths
                        .iter()
                        .any(|path| path.segments.last().is_some_and(|seg| seg.ident == COMPONENT_DERIVE))
                })
                .unwrap_or(false)
        })
}

/// Outer attributes as uninterpreted name + literal arguments. Arguments
/// that are not plain literals are carried verbatim so the extraction layer
/// can report them.
fn raw_annotations(attrs: &[syn::Attribute]) -> Vec<RawAnnotation> {
    attrs
        .iter()
        .filter_map(|attr| {
            let name = attr.path().get_ident()?.to_string();
            if name == "derive" || name == "doc" {
                return None;
            }

            let args = match &attr.meta {
                syn::Meta::Path(_) => Vec::new(),
                syn::Meta::List(list) => literal_args(list),
                syn::Meta::NameValue(nv) => {
                    vec![AnnotationArg::Other(nv.value.to_token_stream().to_string())]
                }
            };

            Some(RawAnnotation::new(name, args))
        })
        .collect()
}

fn literal_args(list: &syn::MetaList) -> Vec<AnnotationArg> {
    match list.parse_args_with(Punctuated::<syn::Lit, Comma>::parse_terminated) {
        Ok(lits) => lits
            .iter()
            .map(|lit| match lit {
                syn::Lit::Str(s) => AnnotationArg::Str(s.value()),
                syn::Lit::Bool(b) => AnnotationArg::Bool(b.value()),
                other => AnnotationArg::Other(other.to_token_stream().to_string()),
            })
            .collect(),
        Err(_) => vec![AnnotationArg::Other(list.tokens.to_string())],
    }
}

///
/// TESTS
///
