#![doc = include_str!("../README.md")]

mod attrs;
mod record_gen;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `formbind::FormType` and `formbind::Record` for a struct with named fields.
///
/// Field attributes:
///
/// - `#[tag(key = "value")]` registers a tag under `key`; any number of keys may be given.
/// - `#[tag(readonly)]` keeps the field in the descriptor but refuses assignment.
#[proc_macro_derive(Record, attributes(tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match record_gen::generate_record_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
