use proc_macro2::TokenStream as TokenStream2;
use syn::{
	Token,
	parse::{self, Parse, ParseStream},
};

/// Arguments of `#[context(...)]`: an optional leading `move,` followed by
/// the `format!` arguments of the message.
#[derive(Debug)]
pub struct ContextArgs {
	pub move_token: Option<Token![move]>,
	pub message: TokenStream2,
}

impl Parse for ContextArgs {
	fn parse(input: ParseStream<'_>) -> parse::Result<Self> {
		let move_token = if input.peek(Token![move]) {
			let token = input.parse()?;
			input.parse::<Token![,]>()?;
			Some(token)
		} else {
			None
		};
		if input.is_empty() {
			return Err(input.error("expected a context message"));
		}
		Ok(Self {
			move_token,
			message: input.parse()?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::ContextArgs;
	use syn::parse_str;

	#[test]
	fn message_only() {
		let args: ContextArgs = parse_str(r#""reading {key:?}""#).unwrap();
		assert!(args.move_token.is_none());
		assert_eq!(args.message.to_string(), r#""reading {key:?}""#);
	}

	#[test]
	fn move_then_message_with_arguments() {
		let args: ContextArgs = parse_str(r#"move, "deleting {}", key"#).unwrap();
		assert!(args.move_token.is_some());
		assert_eq!(args.message.to_string(), r#""deleting {}" , key"#);
	}

	#[test]
	fn move_without_comma_is_rejected() {
		let err = parse_str::<ContextArgs>(r#"move "x""#).unwrap_err();
		assert!(err.to_string().contains(','), "unexpected error: {err}");
	}

	#[test]
	fn empty_message_is_rejected() {
		let err = parse_str::<ContextArgs>("").unwrap_err();
		assert!(err.to_string().contains("context message"), "unexpected error: {err}");
	}
}
