//! Procedural macros for typebus.
//!
//! - `#[listener]` - turn `fn(value: &T)` into a `Listener<T>` type
//! - `#[subscribe]` - the same, plus submission to the collected-listener registry

use proc_macro::TokenStream;

mod listener;
mod subscribe;

/// Turn a function `fn(value: &T) [-> Result<(), E>]` into a unit struct of
/// the same name implementing `typebus::Listener<T>`.
///
/// Accepts `name = "..."` to override the diagnostic name.
#[proc_macro_attribute]
pub fn listener(attr: TokenStream, item: TokenStream) -> TokenStream {
    listener::listener_impl(attr, item)
}

/// Like `#[listener]`, and submit the listener to the collection registered by
/// `Dispatcher::register_collected`.
///
/// Accepts `name = "..."` and `priority = N` (higher registers first).
#[proc_macro_attribute]
pub fn subscribe(attr: TokenStream, item: TokenStream) -> TokenStream {
    subscribe::subscribe_impl(attr, item)
}
