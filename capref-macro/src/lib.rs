use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derive the `Component` trait for a struct, wiring up the inspector UI and
/// capability registration.
///
/// Fields render in the inspector through `capref::inspect::Inspect`; field
/// types without an inspector implementation fall back to a read-only label.
/// Fields whose name starts with `_` are skipped.
///
/// The `#[provides(...)]` attribute lists capability traits the struct
/// implements. Each listed trait gets a caster registered under the trait's
/// name, so scene queries like `capability::<dyn Damageable>` can reach the
/// concrete type through `&dyn Component`.
///
/// # Named structs
///
/// ```ignore
/// #[derive(Component)]
/// #[provides(Damageable)]
/// struct Turret {
///     hp: i32,
/// }
/// ```
///
/// # Tuple structs
///
/// ```ignore
/// #[derive(Component)]
/// struct Tint(pub f32, pub f32, pub f32);
/// ```
#[proc_macro_derive(Component, attributes(provides))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return syn::Error::new_spanned(
                &input.ident,
                "Component can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let mut capabilities: Vec<syn::Path> = Vec::new();
    for attr in &input.attrs {
        if attr.path().is_ident("provides") {
            match attr.parse_args_with(Punctuated::<syn::Path, syn::Token![,]>::parse_terminated) {
                Ok(paths) => capabilities.extend(paths),
                Err(err) => return err.to_compile_error().into(),
            }
        }
    }

    let inspect_calls = inspect_calls(fields);
    let inspect_ui_method = if inspect_calls.is_empty() {
        quote! {}
    } else {
        quote! {
            fn inspect_ui(&mut self, ui: &mut egui::Ui) {
                #[allow(unused_imports)]
                use capref::inspect::InspectFallback as _;
                #(#inspect_calls)*
            }
        }
    };

    let register_method = if capabilities.is_empty() {
        quote! {}
    } else {
        let registrations = capabilities.iter().map(|cap| {
            let cap_name = last_segment_name(cap);
            quote! {
                registry.register::<Self, dyn #cap>(
                    #cap_name,
                    capref::CapabilityCaster::new(
                        |component| {
                            capref::Component::as_any(component)
                                .downcast_ref::<Self>()
                                .map(|c| c as &dyn #cap)
                        },
                        |component| {
                            capref::Component::as_any_mut(component)
                                .downcast_mut::<Self>()
                                .map(|c| c as &mut dyn #cap)
                        },
                    ),
                );
            }
        });
        quote! {
            fn register_capabilities(registry: &mut capref::CapabilityRegistry) {
                #(#registrations)*
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics capref::Component for #name #ty_generics #where_clause {
            fn component_name(&self) -> &'static str {
                #name_str
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #inspect_ui_method

            #register_method
        }
    };

    expanded.into()
}

/// Build one `Inspect(...).show(...)` call per visible field.
fn inspect_calls(fields: &Fields) -> Vec<proc_macro2::TokenStream> {
    match fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .filter(|f| {
                !f.ident
                    .as_ref()
                    .is_some_and(|id| id.to_string().starts_with('_'))
            })
            .map(|f| {
                let fname = f.ident.as_ref().unwrap();
                let fname_str = fname.to_string();
                quote! {
                    capref::inspect::Inspect(&mut self.#fname).show(#fname_str, ui);
                }
            })
            .collect(),
        Fields::Unnamed(fields) => fields
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, _f)| {
                let idx_str = i.to_string();
                let idx = syn::Index::from(i);
                quote! {
                    capref::inspect::Inspect(&mut self.#idx).show(#idx_str, ui);
                }
            })
            .collect(),
        Fields::Unit => Vec::new(),
    }
}

/// Extract the last segment name from a path (e.g. `game::Damageable` →
/// `"Damageable"`). Used as the registered capability name.
fn last_segment_name(path: &syn::Path) -> String {
    path.segments
        .last()
        .map(|segment| segment.ident.to_string())
        .unwrap_or_default()
}
