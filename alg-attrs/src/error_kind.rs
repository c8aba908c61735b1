//! Expansion of the `ErrorKind` derive.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, Fields, Ident};

/// The contents of an `#[error(...)]` attribute: the report message, one label expression per
/// span, and optional help text.
struct ReportParts {
    message: Expr,
    labels: Expr,
    help: Option<Expr>,
}

/// Reads the `#[error(...)]` attribute off the derive input.
fn report_parts(input: &DeriveInput) -> syn::Result<ReportParts> {
    let attr = input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("error"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "deriving `ErrorKind` requires an `#[error(...)]` attribute",
            )
        })?;

    let mut message = None;
    let mut labels = None;
    let mut help = None;

    attr.parse_nested_meta(|meta| {
        let slot = if meta.path.is_ident("message") {
            &mut message
        } else if meta.path.is_ident("labels") {
            &mut labels
        } else if meta.path.is_ident("help") {
            &mut help
        } else {
            return Err(meta.error("expected `message`, `labels`, or `help`"));
        };

        *slot = Some(meta.value()?.parse::<Expr>()?);
        Ok(())
    })?;

    Ok(ReportParts {
        message: message
            .ok_or_else(|| syn::Error::new_spanned(attr, "missing a `message` tag"))?,
        labels: labels
            .ok_or_else(|| syn::Error::new_spanned(attr, "missing a `labels` tag"))?,
        help,
    })
}

/// Brings every named field into scope by reference, so the attribute expressions can mention
/// fields of the error directly.
fn field_bindings(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`ErrorKind` can only be derived for structs",
        ));
    };

    match &data.fields {
        Fields::Unit => Ok(TokenStream::new()),
        Fields::Named(fields) => {
            let names: Vec<Ident> = fields
                .named
                .iter()
                .map(|field| field.ident.clone().expect("named fields have idents"))
                .collect();
            Ok(quote! {
                #[allow(unused_variables)]
                let (#(#names,)*) = (#(&self.#names,)*);
            })
        },
        Fields::Unnamed(fields) => Err(syn::Error::new_spanned(
            fields,
            "`ErrorKind` cannot be derived for tuple structs",
        )),
    }
}

/// Expands the derive into an `alg_error::ErrorKind` implementation.
///
/// The generated `build_report` pairs each span of the error with the label expression at the
/// same position, colors it, and attaches the message and optional help text around them.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ReportParts { message, labels, help } = report_parts(input)?;
    let bindings = field_bindings(input)?;
    let name = &input.ident;

    let help = help.map(|help| quote! { report = report.with_help(#help); });

    Ok(quote! {
        impl alg_error::ErrorKind for #name {
            fn build_report(
                &self,
                src_id: &'static str,
                spans: &[std::ops::Range<usize>],
            ) -> ariadne::Report<(&'static str, std::ops::Range<usize>)> {
                #bindings

                let mut report =
                    ariadne::Report::build(ariadne::ReportKind::Error, src_id, spans[0].start)
                        .with_message(#message);

                for (span, text) in spans.iter().cloned().zip(#labels) {
                    let text = text.to_string();
                    let mut label = ariadne::Label::new((src_id, span))
                        .with_color(alg_error::EXPR);
                    if !text.is_empty() {
                        label = label.with_message(text);
                    }
                    report = report.with_label(label);
                }

                #help
                report.finish()
            }
        }
    })
}
