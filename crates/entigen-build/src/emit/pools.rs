use crate::{
    emit::{self, GeneratedFile},
    lookup::LookupTable,
};
use entigen_schema::LOOKUP_TAG_SUFFIX;
use quote::quote;

/// File name of the pools registry.
pub const POOLS_FILE: &str = "Pools";

/// Emit the root registry owning one context per lookup table, each sized by
/// its table's component count. The default context is named `pool`.
#[must_use]
pub fn generate(tables: &[LookupTable]) -> GeneratedFile {
    let modules: Vec<_> = tables.iter().map(|table| emit::snake_ident(&table.tag)).collect();
    let members: Vec<_> = tables.iter().map(|table| member_ident(&table.tag)).collect();
    let modules = &modules;
    let members = &members;

    let sections = [quote! {
        #(use super::#modules;)*
        use ::entigen_runtime::Context;

        /// One context per declared pool, created once at startup and handed
        /// around by reference.
        pub struct Pools {
            #(pub #members: Context,)*
        }

        impl Pools {
            #[must_use]
            pub fn new() -> Self {
                Self {
                    #(#members: Context::with_capacity(#modules::TOTAL_COMPONENTS),)*
                }
            }
        }

        impl Default for Pools {
            fn default() -> Self {
                Self::new()
            }
        }
    }];

    GeneratedFile::from_sections(emit::file_name(POOLS_FILE), &sections)
}

fn member_ident(tag: &str) -> proc_macro2::Ident {
    let pool = tag.strip_suffix(LOOKUP_TAG_SUFFIX).unwrap_or(tag);

    if pool.is_empty() {
        emit::snake_ident("Pool")
    } else {
        emit::snake_ident(pool)
    }
}

///
/// TESTS
///
