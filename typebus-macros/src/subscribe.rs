//! Subscribe-related macros.
//!
//! This module contains:
//! - `#[subscribe]` - Attribute macro creating a listener and submitting it to
//!   the distributed collection gathered by `Dispatcher::register_collected`

use crate::listener::{ListenerArgs, generate_listener_impl, value_type};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{ItemFn, parse_macro_input};

/// Subscribe a function to values of a specific type.
///
/// The function becomes a listener type, as with `#[listener]`, and an entry
/// is submitted to the global collection so that
/// `Dispatcher::register_collected` can find it. Requires the `inventory`
/// feature of `typebus`.
///
/// # Usage
///
/// ```rust,ignore
/// #[typebus::subscribe]
/// fn on_joined(joined: &UserJoined) {
///     println!("joined: {}", joined.id);
/// }
///
/// // With priority (higher = registered earlier)
/// #[typebus::subscribe(priority = 10)]
/// fn audit_first(joined: &UserJoined) {
///     // ...
/// }
///
/// let bus = Dispatcher::new();
/// bus.register_collected();
/// ```
pub fn subscribe_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ListenerArgs);
    let input = parse_macro_input!(item as ItemFn);
    let fn_name = &input.sig.ident;
    let priority = args.priority;
    let label = args.name.clone().unwrap_or_else(|| fn_name.to_string());

    let value_type = match value_type(&input) {
        Ok(ty) => ty,
        Err(err) => return err.to_compile_error().into(),
    };

    let listener_impl = generate_listener_impl(&input, &args, &value_type);
    let factory_name = format_ident!("__typebus_factory_{}", fn_name);

    let submit_code = quote! {
        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #factory_name() -> ::typebus::ListenerHandle {
            ::typebus::ListenerHandle::new::<#value_type, #fn_name>(#fn_name)
        }

        ::typebus::inventory::submit! {
            ::typebus::CollectedListener::new(#label, #priority, #factory_name)
        }
    };

    let expanded = quote! {
        #listener_impl
        #submit_code
    };

    TokenStream::from(expanded)
}
