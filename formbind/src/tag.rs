/// Options parsed from a tag string such as `name,omitempty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagOptions<'a> {
    /// The key this field answers to. Empty means the field matches nothing.
    pub name: &'a str,

    /// Set by the `omitempty` option. Parsed but not consulted when decoding.
    pub omit_empty: bool,
}

/// Splits a tag string into its name and options.
///
/// The name is everything before the first comma; `omitempty` may appear
/// anywhere among the options that follow.
pub fn parse_tag(tag: &str) -> TagOptions<'_> {
    let mut parts = tag.split(',');
    let name = parts.next().unwrap_or_default();
    let omit_empty = parts.any(|opt| opt == "omitempty");
    TagOptions { name, omit_empty }
}
