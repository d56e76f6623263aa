//! Procedural macros used by `stashbox_core`.
//!
//! The only macro is [`macro@context`], which wraps a function returning
//! `anyhow::Result` so that every error leaving it carries an extra line of
//! context, formatted from the function's arguments.

mod args;

use crate::args::ContextArgs;
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{Token, parse_macro_input};

/// Adds context to every error returned by the annotated function.
///
/// ```ignore
/// #[context("Failed to read {key:?}")]
/// fn read(&self, key: &str) -> anyhow::Result<Entry> { ... }
/// ```
///
/// Prefix the message with `move,` when the body has to take ownership of
/// its captures.
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let ContextArgs { move_token, message } = parse_macro_input!(args);
	let mut function = parse_macro_input!(input as syn::ItemFn);

	let syn::ReturnType::Type(_, result_type) = &function.sig.output else {
		return syn::Error::new_spanned(&function.sig, "#[context] requires a function returning Result")
			.to_compile_error()
			.into();
	};

	let body = &function.block;
	let attach = attach_context(&message);
	let wrapped = if function.sig.asyncness.is_some() {
		wrap_async(body, result_type, move_token.as_ref(), &attach)
	} else {
		wrap_sync(body, result_type, move_token.as_ref(), &attach)
	};
	function.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(wrapped), None)];

	function.into_token_stream().into()
}

/// The `map_err` argument turning an error into `message` with the error as its cause.
fn attach_context(message: &TokenStream2) -> TokenStream2 {
	let err = Ident::new("err", Span::mixed_site());
	quote! { |#err| #err.context(format!(#message)).into() }
}

fn wrap_async(
	body: &syn::Block,
	result_type: &syn::Type,
	move_token: Option<&Token![move]>,
	attach: &TokenStream2,
) -> TokenStream2 {
	let result = Ident::new("result", Span::mixed_site());
	quote! {
		let #result: #result_type = async #move_token #body.await;
		#result.map_err(#attach)
	}
}

/// The body runs in an immediately called closure so `?` and `return` inside it
/// stop at the closure and the error passes through `map_err`.
fn wrap_sync(
	body: &syn::Block,
	result_type: &syn::Type,
	move_token: Option<&Token![move]>,
	attach: &TokenStream2,
) -> TokenStream2 {
	// owning a non-Copy marker makes the closure FnOnce, so the body may consume captures
	let marker = Ident::new("marker", Span::mixed_site());
	quote! {
		let #marker = ::core::iter::empty::<()>();
		(#move_token || -> #result_type {
			::core::mem::drop(#marker);
			#body
		})().map_err(#attach)
	}
}
