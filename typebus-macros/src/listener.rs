//! Listener-related macros.
//!
//! This module contains:
//! - `#[listener]` - Attribute macro for creating Listener implementations from functions

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    FnArg, Ident, ItemFn, LitInt, LitStr, Token, Type, Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments shared by `#[listener]` and `#[subscribe]`.
pub(crate) struct ListenerArgs {
    /// Diagnostic name override.
    pub name: Option<String>,
    /// Registration priority (only meaningful for `#[subscribe]`).
    pub priority: i32,
}

impl Parse for ListenerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;
        let mut priority = 0;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                "priority" => {
                    let lit: LitInt = input.parse()?;
                    priority = lit.base10_parse()?;
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ListenerArgs { name, priority })
    }
}

/// Find the value type `T` of a listener function `fn(value: &T)`.
pub(crate) fn value_type(input: &ItemFn) -> syn::Result<Type> {
    if let Some(asyncness) = &input.sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "listener function must not be async",
        ));
    }

    let inputs = &input.sig.inputs;
    if inputs.len() != 1 {
        return Err(syn::Error::new_spanned(
            inputs,
            "listener function must take exactly one argument: fn(value: &T)",
        ));
    }

    match inputs.first() {
        Some(FnArg::Typed(pat_type)) => match &*pat_type.ty {
            Type::Reference(type_ref) if type_ref.mutability.is_none() => {
                Ok((*type_ref.elem).clone())
            }
            other => Err(syn::Error::new_spanned(
                other,
                "listener argument must be a shared reference (&T)",
            )),
        },
        Some(FnArg::Receiver(receiver)) => Err(syn::Error::new_spanned(
            receiver,
            "listener function cannot have a self parameter",
        )),
        None => Err(syn::Error::new_spanned(
            inputs,
            "listener function must take an argument: fn(value: &T)",
        )),
    }
}

/// Generate the unit struct and its `Listener` impl.
pub(crate) fn generate_listener_impl(
    input: &ItemFn,
    args: &ListenerArgs,
    value_type: &Type,
) -> proc_macro2::TokenStream {
    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let struct_name = fn_name;
    let label = args.name.clone().unwrap_or_else(|| fn_name.to_string());

    let mut inner = input.clone();
    inner.sig.ident = format_ident!("__inner");
    inner.vis = Visibility::Inherited;
    let (docs, attrs): (Vec<_>, Vec<_>) = inner
        .attrs
        .into_iter()
        .partition(|attr| attr.path().is_ident("doc"));
    inner.attrs = attrs;

    let doc = if docs.is_empty() {
        quote! {
            #[doc = concat!("Listener generated from `", stringify!(#fn_name), "`.")]
        }
    } else {
        quote! { #(#docs)* }
    };

    quote! {
        #doc
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #fn_vis struct #struct_name;

        impl ::typebus::Listener<#value_type> for #struct_name {
            fn event(
                &self,
                __value: &#value_type,
            ) -> ::core::result::Result<(), ::typebus::BoxError> {
                #inner
                ::typebus::IntoOutcome::into_outcome(__inner(__value))
            }

            fn name(&self) -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#label)
            }
        }
    }
}

/// Turn a function `fn(value: &T)` into a listener type.
///
/// # Usage
///
/// ```rust,ignore
/// #[typebus::listener]
/// fn audit(joined: &UserJoined) {
///     println!("joined: {}", joined.id);
/// }
///
/// // Fallible, with a custom diagnostic name
/// #[typebus::listener(name = "mailer")]
/// fn send_welcome(joined: &UserJoined) -> Result<(), MailError> {
///     mailer::send(joined.id)
/// }
///
/// bus.register([ListenerHandle::new::<UserJoined, _>(audit)]);
/// ```
pub fn listener_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ListenerArgs);
    let input = parse_macro_input!(item as ItemFn);

    let value_type = match value_type(&input) {
        Ok(ty) => ty,
        Err(err) => return err.to_compile_error().into(),
    };

    TokenStream::from(generate_listener_impl(&input, &args, &value_type))
}
