//! Error messages, as shown to whoever submitted the form.

use formbind::{Attachment, Decoder, MultipartForm, Record, from_form};

#[derive(Debug, Default, Record)]
#[allow(dead_code)]
struct Signup {
    #[tag(form = "name")]
    name: String,
    #[tag(form = "age")]
    age: i32,
    #[tag(form = "rgb")]
    rgb: [u8; 3],
    #[tag(form = "scores")]
    scores: Vec<i32>,
    #[tag(form = "born")]
    born: Option<time::OffsetDateTime>,
    #[tag(form = "ratio")]
    ratio: f64,
    #[tag(form = "avatar")]
    avatar: Option<Attachment>,
    #[tag(form = "id", readonly)]
    id: u32,
}

fn error_for(form: MultipartForm) -> String {
    formbind_testhelpers::setup();
    from_form::<Signup>(&form).unwrap_err().to_string()
}

#[test]
fn invalid_integer() {
    let err = error_for(MultipartForm::new().with_value("age", "notanumber"));
    insta::assert_snapshot!(err, @r#"field `age`: parsing "notanumber" as i32: invalid syntax"#);
}

#[test]
fn integer_out_of_range() {
    let err = error_for(MultipartForm::new().with_value("age", "2147483648"));
    insta::assert_snapshot!(err, @r#"field `age`: parsing "2147483648" as i32: value out of range"#);
}

#[test]
fn float_overflow() {
    let err = error_for(MultipartForm::new().with_value("ratio", "1e400"));
    insta::assert_snapshot!(err, @r#"field `ratio`: parsing "1e400" as f64: value out of range"#);
}

#[test]
fn several_values_for_a_scalar() {
    let err = error_for(MultipartForm::new().with_values("name", ["a", "b"]));
    insta::assert_snapshot!(err, @"field `name`: expected a single value for `String`, got 2");
}

#[test]
fn wrong_array_length() {
    let err = error_for(MultipartForm::new().with_values("rgb", ["1", "2"]));
    insta::assert_snapshot!(err, @"field `rgb`: `[u8; 3]` needs 3 elements, got 2");
}

#[test]
fn bad_sequence_element() {
    let err = error_for(MultipartForm::new().with_values("scores", ["1", "x"]));
    insta::assert_snapshot!(err, @r#"field `scores`: element 1: parsing "x" as i32: invalid syntax"#);
}

#[test]
fn bad_timestamp() {
    let err = error_for(MultipartForm::new().with_value("born", "yesterday"));
    assert!(
        err.starts_with(r#"field `born`: parsing "yesterday" as an RFC 3339 timestamp: "#),
        "{err}"
    );
}

#[test]
fn too_many_attachments() {
    let err = error_for(
        MultipartForm::new()
            .with_file("avatar", Attachment::new("a.png"))
            .with_file("avatar", Attachment::new("b.png")),
    );
    insta::assert_snapshot!(err, @"field `avatar`: expected at most one attachment for a single-attachment field, got 2");
}

#[test]
fn attachment_on_a_text_field() {
    let err = error_for(MultipartForm::new().with_file("name", Attachment::new("a.png")));
    insta::assert_snapshot!(err, @"field `name`: unsupported attachment field type `String`");
}

#[test]
fn readonly_field() {
    let err = error_for(MultipartForm::new().with_value("id", "1"));
    insta::assert_snapshot!(err, @"field `id`: field cannot be set");
}

#[test]
fn destination_is_not_a_record() {
    formbind_testhelpers::setup();

    let mut count = 0usize;
    let err = Decoder::new()
        .decode_form(&mut count, &MultipartForm::new())
        .unwrap_err();
    insta::assert_snapshot!(err, @"destination must be a record, got `usize`");
}
