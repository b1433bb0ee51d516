use syn::{Attribute, Ident, LitStr, Token};

/// What the `#[tag(...)]` attributes on one field say.
#[derive(Default)]
pub struct FieldAttrs {
    pub tags: Vec<(String, LitStr)>,
    pub readonly: bool,
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = FieldAttrs::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("tag")) {
            attr.parse_nested_meta(|meta| {
                let Some(key) = meta.path.get_ident().map(Ident::to_string) else {
                    return Err(meta.error("expected a tag key or `readonly`"));
                };

                if !meta.input.peek(Token![=]) {
                    if key != "readonly" {
                        return Err(meta.error(format!("tag `{key}` needs a value: `{key} = \"...\"`")));
                    }
                    out.readonly = true;
                    return Ok(());
                }

                let value: LitStr = meta.value()?.parse()?;
                if out.tags.iter().any(|(existing, _)| *existing == key) {
                    return Err(meta.error(format!("duplicate tag `{key}`")));
                }
                out.tags.push((key, value));
                Ok(())
            })?;
        }

        Ok(out)
    }
}
