use crate::emit::{self, ACCESSORS_SUFFIX, EmitError, GeneratedFile};
use entigen_schema::prelude::*;
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

/// Emit the per-component accessor file: an extension trait over the runtime
/// `Entity` handle, plus context-scoped accessors when the component is
/// constrained to a single instance. Pure function of the descriptor.
pub fn generate(descriptor: &ComponentDescriptor) -> Result<GeneratedFile, EmitError> {
    let builder = AccessorBuilder::new(descriptor)?;

    let sections = [
        builder.header(),
        builder.entity_section(),
        builder.context_section(),
    ];

    Ok(GeneratedFile::from_sections(
        emit::file_name(&format!("{}{ACCESSORS_SUFFIX}", descriptor.short_name)),
        &sections,
    ))
}

///
/// TypedArg
/// One positional constructor argument, in declared field order.
///

struct TypedArg {
    param: Ident,
    field: Ident,
    ty: syn::Type,
}

///
/// AccessorBuilder
///

struct AccessorBuilder<'a> {
    descriptor: &'a ComponentDescriptor,
    component_ty: Ident,
    ids_module: Ident,
    id_const: Ident,
    args: Vec<TypedArg>,
}

impl<'a> AccessorBuilder<'a> {
    fn new(descriptor: &'a ComponentDescriptor) -> Result<Self, EmitError> {
        // generated symbols always reference the component's first lookup
        // tag; the id is identical in every other table it appears in
        let tags = descriptor.lookup_tags();

        let mut args = Vec::with_capacity(descriptor.fields.len());
        for field in &descriptor.fields {
            let ty = syn::parse_str::<syn::Type>(&field.ty).map_err(|_| EmitError::BadFieldType {
                type_name: descriptor.type_name.clone(),
                field: field.name.clone(),
                ty: field.ty.clone(),
            })?;

            args.push(TypedArg {
                param: emit::prefixed_ident("new", &field.name),
                field: emit::safe_ident(&field.name),
                ty,
            });
        }

        Ok(Self {
            descriptor,
            component_ty: Ident::new(&descriptor.type_name, Span::call_site()),
            ids_module: emit::snake_ident(&tags[0]),
            id_const: emit::upper_ident(&descriptor.short_name),
            args,
        })
    }

    fn id_path(&self) -> TokenStream {
        let ids_module = &self.ids_module;
        let id_const = &self.id_const;

        quote!(#ids_module::#id_const)
    }

    fn params(&self) -> Vec<TokenStream> {
        self.args
            .iter()
            .map(|arg| {
                let param = &arg.param;
                let ty = &arg.ty;
                quote!(#param: #ty)
            })
            .collect()
    }

    fn assigns(&self) -> Vec<TokenStream> {
        self.args
            .iter()
            .map(|arg| {
                let field = &arg.field;
                let param = &arg.param;
                quote!(component.#field = #param;)
            })
            .collect()
    }

    fn header(&self) -> TokenStream {
        let ids_module = &self.ids_module;
        let component_ty = &self.component_ty;

        let runtime = if self.descriptor.is_single_instance {
            if self.descriptor.is_marker() {
                quote!(use ::entigen_runtime::{Context, Entity};)
            } else {
                quote!(use ::entigen_runtime::{Context, Entity, SingleEntityError};)
            }
        } else {
            quote!(use ::entigen_runtime::Entity;)
        };

        quote! {
            use super::#ids_module;
            use crate::#component_ty;
            #runtime
        }
    }

    fn entity_section(&self) -> TokenStream {
        if self.descriptor.is_marker() {
            self.marker_entity()
        } else {
            self.data_entity()
        }
    }

    fn context_section(&self) -> TokenStream {
        if !self.descriptor.is_single_instance {
            return TokenStream::new();
        }

        if self.descriptor.is_marker() {
            self.marker_context()
        } else {
            self.data_context()
        }
    }

    /// Read access, presence check, and add/replace/remove cycling instances
    /// through the entity's per-type free list.
    fn data_entity(&self) -> TokenStream {
        let short = &self.descriptor.short_name;
        let component_ty = &self.component_ty;
        let trait_ident = format_ident!("{short}EntityExt");
        let get = emit::snake_ident(short);
        let has = emit::prefixed_ident("has", short);
        let add = emit::prefixed_ident("add", short);
        let replace = emit::prefixed_ident("replace", short);
        let remove = emit::prefixed_ident("remove", short);
        let id = self.id_path();
        let params = &self.params();
        let assigns = &self.assigns();

        quote! {
            pub trait #trait_ident {
                fn #get(&self) -> &#component_ty;
                fn #has(&self) -> bool;
                fn #add(&mut self, #(#params),*) -> &mut Self;
                fn #replace(&mut self, #(#params),*) -> &mut Self;
                fn #remove(&mut self) -> &mut Self;
            }

            impl #trait_ident for Entity {
                fn #get(&self) -> &#component_ty {
                    self.component::<#component_ty>(#id)
                }

                fn #has(&self) -> bool {
                    self.has_component(#id)
                }

                fn #add(&mut self, #(#params),*) -> &mut Self {
                    let mut component = self.pool_reclaim::<#component_ty>(#id);
                    #(#assigns)*
                    self.add_component(#id, component)
                }

                fn #replace(&mut self, #(#params),*) -> &mut Self {
                    let mut component = self.pool_reclaim::<#component_ty>(#id);
                    #(#assigns)*
                    if let Some(previous) = self.replace_component(#id, component) {
                        self.pool_recycle(#id, previous);
                    }
                    self
                }

                fn #remove(&mut self) -> &mut Self {
                    let component = self.remove_component::<#component_ty>(#id);
                    self.pool_recycle(#id, component);
                    self
                }
            }
        }
    }

    /// Boolean presence toggle backed by the registry's shared instance; no
    /// free list and no positional constructors for a marker.
    fn marker_entity(&self) -> TokenStream {
        let short = &self.descriptor.short_name;
        let component_ty = &self.component_ty;
        let trait_ident = format_ident!("{short}EntityExt");
        let is = emit::prefixed_ident("is", short);
        let set = emit::prefixed_ident("set", short);
        let id = self.id_path();

        quote! {
            pub trait #trait_ident {
                fn #is(&self) -> bool;
                fn #set(&mut self, value: bool) -> &mut Self;
            }

            impl #trait_ident for Entity {
                fn #is(&self) -> bool {
                    self.has_component(#id)
                }

                fn #set(&mut self, value: bool) -> &mut Self {
                    if value != self.#is() {
                        if value {
                            let component = self.shared_component::<#component_ty>(#id);
                            self.add_component(#id, component);
                        } else {
                            self.discard_component(#id);
                        }
                    }

                    self
                }
            }
        }
    }

    /// Context-scoped accessors for a single-instance data component: the
    /// one qualifying entity, its component, and a creation operation that
    /// refuses to create a duplicate.
    fn data_context(&self) -> TokenStream {
        let short = &self.descriptor.short_name;
        let component_ty = &self.component_ty;
        let trait_ident = format_ident!("{short}ContextExt");
        let entity_trait = format_ident!("{short}EntityExt");
        let entity_get = emit::suffixed_ident(short, "entity");
        let get = emit::snake_ident(short);
        let has = emit::prefixed_ident("has", short);
        let set = emit::prefixed_ident("set", short);
        let add = emit::prefixed_ident("add", short);
        let remove = emit::prefixed_ident("remove", short);
        let id = self.id_path();
        let params = &self.params();
        let param_names: Vec<&Ident> = self.args.iter().map(|arg| &arg.param).collect();
        let param_names = &param_names;

        quote! {
            pub trait #trait_ident {
                fn #entity_get(&self) -> Option<&Entity>;
                fn #get(&self) -> Option<&#component_ty>;
                fn #has(&self) -> bool;
                fn #set(&mut self, #(#params),*) -> Result<&mut Entity, SingleEntityError>;
                fn #remove(&mut self);
            }

            impl #trait_ident for Context {
                fn #entity_get(&self) -> Option<&Entity> {
                    self.single_entity(#id)
                }

                fn #get(&self) -> Option<&#component_ty> {
                    self.#entity_get().map(#entity_trait::#get)
                }

                fn #has(&self) -> bool {
                    self.#entity_get().is_some()
                }

                fn #set(&mut self, #(#params),*) -> Result<&mut Entity, SingleEntityError> {
                    if self.#has() {
                        return Err(SingleEntityError::new(#id));
                    }

                    let entity = self.create_entity();
                    entity.#add(#(#param_names),*);
                    Ok(entity)
                }

                fn #remove(&mut self) {
                    if let Some(id) = self.#entity_get().map(Entity::id) {
                        self.destroy_entity(id);
                    }
                }
            }
        }
    }

    /// Context-scoped toggle for a single-instance marker: flipping to true
    /// creates the one qualifying entity, flipping to false destroys it. The
    /// early equality return makes a duplicate impossible by construction.
    fn marker_context(&self) -> TokenStream {
        let short = &self.descriptor.short_name;
        let trait_ident = format_ident!("{short}ContextExt");
        let entity_get = emit::suffixed_ident(short, "entity");
        let is = emit::prefixed_ident("is", short);
        let set = emit::prefixed_ident("set", short);
        let id = self.id_path();

        quote! {
            pub trait #trait_ident {
                fn #entity_get(&self) -> Option<&Entity>;
                fn #is(&self) -> bool;
                fn #set(&mut self, value: bool) -> &mut Self;
            }

            impl #trait_ident for Context {
                fn #entity_get(&self) -> Option<&Entity> {
                    self.single_entity(#id)
                }

                fn #is(&self) -> bool {
                    self.#entity_get().is_some()
                }

                fn #set(&mut self, value: bool) -> &mut Self {
                    if value != self.#is() {
                        if value {
                            let entity = self.create_entity();
                            entity.#set(true);
                        } else if let Some(id) = self.#entity_get().map(Entity::id) {
                            self.destroy_entity(id);
                        }
                    }

                    self
                }
            }
        }
    }
}

///
/// TESTS
///
