use crate::{
    emit::{self, GeneratedFile},
    lookup::LookupTable,
};
use proc_macro2::{Literal, TokenStream};
use quote::quote;

/// Emit one lookup-table file for a context tag: named id constants, the
/// total count, the id-to-name reverse lookup, and the memoized matcher
/// registry. Pure function of the allocated table; an empty table emits a
/// valid (if vacant) file.
#[must_use]
pub fn generate(table: &LookupTable) -> GeneratedFile {
    let sections = [header(), indices(table), names(table), matchers(table)];

    GeneratedFile::from_sections(emit::file_name(&table.tag), &sections)
}

fn header() -> TokenStream {
    quote! {
        use ::entigen_runtime::Matcher;
        use ::std::sync::OnceLock;
    }
}

fn indices(table: &LookupTable) -> TokenStream {
    let mut tokens = quote!();

    for (id, descriptor) in table.occupied() {
        let const_ident = emit::upper_ident(&descriptor.short_name);
        let id_lit = Literal::usize_unsuffixed(id);

        tokens.extend(quote! {
            pub const #const_ident: usize = #id_lit;
        });
    }

    let total = Literal::usize_unsuffixed(table.total_components());
    tokens.extend(quote! {
        pub const TOTAL_COMPONENTS: usize = #total;
    });

    tokens
}

fn names(table: &LookupTable) -> TokenStream {
    let names: Vec<String> = table
        .occupied()
        .map(|(_, descriptor)| descriptor.short_name.clone())
        .collect();

    quote! {
        pub const COMPONENT_NAMES: [&str; TOTAL_COMPONENTS] = [#(#names),*];

        #[must_use]
        pub fn id_to_name(id: usize) -> &'static str {
            COMPONENT_NAMES[id]
        }
    }
}

fn matchers(table: &LookupTable) -> TokenStream {
    let mut cells = quote!();
    let mut inits = quote!();
    let mut accessors = quote!();

    for (_, descriptor) in table.occupied() {
        let member = emit::snake_ident(&descriptor.short_name);
        let const_ident = emit::upper_ident(&descriptor.short_name);

        cells.extend(quote! {
            #member: OnceLock<Matcher>,
        });
        inits.extend(quote! {
            #member: OnceLock::new(),
        });
        accessors.extend(quote! {
            pub fn #member(&self) -> &Matcher {
                self.#member.get_or_init(|| Matcher::all_of(#const_ident, id_to_name))
            }
        });
    }

    quote! {
        /// Memoized matchers, one per component id. Owned by runtime setup
        /// and passed by reference; the textual form resolves through
        /// `id_to_name` instead of storing the name again.
        pub struct Matchers {
            #cells
        }

        impl Matchers {
            #[must_use]
            pub const fn new() -> Self {
                Self { #inits }
            }

            #accessors
        }

        impl Default for Matchers {
            fn default() -> Self {
                Self::new()
            }
        }
    }
}

///
/// TESTS
///
