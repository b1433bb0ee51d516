use crate::{RecordShape, parse_tag, trace};

/// Finds the field of `record` whose `tag_key` tag names `key`.
///
/// Fields are scanned in declaration order for a tag name equal to `key`
/// as written or to `key` lower-cased, whichever comes first. Only when no
/// field matches either way are tag names compared ignoring case, so a tag
/// `Name` still answers to `name`. Fields without a tag under `tag_key`, or
/// with an empty name, never match. A key that matches nothing is not an
/// error: records need not consume every submitted key.
pub fn resolve(record: &RecordShape, tag_key: &str, key: &str) -> Option<usize> {
    let names = || {
        record.fields.iter().enumerate().filter_map(|(index, field)| {
            let name = parse_tag(field.tag(tag_key)?).name;
            (!name.is_empty()).then_some((index, name))
        })
    };

    let lowered = key.to_lowercase();
    let found = names()
        .find(|(_, name)| *name == key || *name == lowered)
        .or_else(|| names().find(|(_, name)| name.to_lowercase() == lowered));

    match found {
        Some((index, _name)) => {
            trace!(key, field = record.fields[index].name, tag = _name, "resolved key");
            Some(index)
        }
        None => {
            trace!(key, record = record.type_identifier, "no field for key");
            None
        }
    }
}
