mod error_kind;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the [`ErrorKind`] trait, provided in the `alg_error` crate, for the given struct.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use alg_attrs::ErrorKind;
/// use alg_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of file", labels = ["add something here"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag       | Description                                                              |
/// | --------- | ------------------------------------------------------------------------ |
/// | `message` | The message displayed at the top of the error when it is displayed.      |
/// | `labels`  | A list of labels pointing at the spans of the error, matched in order.   |
/// | `help`    | Optional help text describing what the user can do to fix the error.     |
///
/// The `message` and `help` tags accept an expression that can be converted to a [`String`], and
/// the `labels` tag accepts an expression yielding a sequence of such expressions, paired with
/// the error's spans in order. Each expression is evaluated with the fields of the struct in
/// scope by name, so labels and messages can describe the specific error that occurred.
///
/// [`ErrorKind`]: alg_error::ErrorKind
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error_kind::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
