//! Record Serialization Tests
//!
//! Behaviour of records from construction to exposure:
//! - Construction assigns fillable input, then fills gaps with defaults
//! - Mutators take over reads and writes of their field
//! - Serialization honours visible, hidden and appends
//! - Nested records serialize through their own rules

use std::sync::Arc;

use doccast::errors::{CastError, CastResult};
use doccast::observability;
use doccast::schema::{FieldDecl, KindDecl, SchemaLoader, SchemaRegistry, SchemaRegistryBuilder};
use doccast::value::{RawValue, TypedValue};
use doccast::RecordView;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn area(record: &RecordView, _: Option<&RawValue>) -> CastResult<Option<TypedValue>> {
    let side = |key: &str| -> CastResult<i64> {
        Ok(record.get_attribute(key)?.and_then(|v| v.as_int()).unwrap_or(0))
    };
    Ok(Some(TypedValue::Int(side("width")? * side("height")?)))
}

fn trimmed_name(record: &mut RecordView, value: RawValue) {
    if let Some(name) = value.as_str() {
        record.set_raw_attribute("name", name.trim());
    }
}

fn setup_registry() -> Arc<SchemaRegistry> {
    SchemaRegistry::builder()
        .declare(
            KindDecl::new("Avatar")
                .field("url", FieldDecl::of("string"))
                .field("width", FieldDecl::of("int"))
                .field("height", FieldDecl::of("int"))
                .visible(["width", "height"])
                .appends(["area"])
                .getter("area", area),
        )
        .unwrap()
        .declare(
            KindDecl::new("User")
                .field("name", FieldDecl::of("string"))
                .field("age", FieldDecl::of("int"))
                .field("role", FieldDecl::of("int").default_value(1))
                .field("password", FieldDecl::of("string"))
                .field("avatar", FieldDecl::of("Avatar"))
                .field("tags", FieldDecl::of("array(string)"))
                .field("born", FieldDecl::of("date"))
                .fillable(["name", "age", "avatar", "tags"])
                .hidden(["password"])
                .setter("name", trimmed_name),
        )
        .unwrap()
        .build()
        .unwrap()
}

// =============================================================================
// Construction Tests
// =============================================================================

/// {age: "30"} reads back as 30, role falls back to its default.
#[test]
fn test_age_and_role_scenario() {
    let registry = setup_registry();
    let user = RecordView::from_input(registry, "User", [("age", "30")]).unwrap();

    assert_eq!(user.get_attribute("age").unwrap(), Some(TypedValue::Int(30)));
    assert_eq!(user.get_attribute("role").unwrap(), Some(TypedValue::Int(1)));
    assert_eq!(user.get_attribute("name").unwrap(), None);
}

/// Keys outside fillable are dropped on construction but assignable later.
#[test]
fn test_fillable_guards_construction_only() {
    let registry = setup_registry();
    let mut user =
        RecordView::from_input(registry, "User", [("age", "30"), ("password", "pw")]).unwrap();
    assert!(!user.has_attribute("password"));

    user.set_attribute("password", "pw");
    assert_eq!(user.get_attribute("password").unwrap(), Some(TypedValue::from("pw")));
}

#[test]
fn test_setter_applies_during_fill() {
    let registry = setup_registry();
    let user = RecordView::from_input(registry, "User", [("name", "  Ada  ")]).unwrap();
    assert_eq!(user.raw_attribute("name"), Some(&RawValue::from("Ada")));
}

// =============================================================================
// Visibility Tests
// =============================================================================

/// visible = {width, height} over {width, height, secret} exposes exactly
/// those two plus appends.
#[test]
fn test_visible_list_with_appends() {
    let registry = setup_registry();
    let mut avatar = RecordView::new(registry, "Avatar").unwrap();
    avatar.force_fill([("width", 1), ("height", 2), ("secret", 3)]);

    assert_eq!(avatar.to_json().unwrap(), json!({"width": 1, "height": 2, "area": 2}));
}

#[test]
fn test_hidden_fields_never_serialize() {
    let registry = setup_registry();
    let mut user = RecordView::from_input(registry, "User", [("name", "Ada")]).unwrap();
    user.set_attribute("password", "secret");

    let json = user.to_json().unwrap();
    assert_eq!(json, json!({"name": "Ada", "role": 1}));

    user.make_visible(["password"]);
    assert_eq!(user.to_json().unwrap()["password"], json!("secret"));
}

/// Nested records serialize through the nested kind's own visibility.
#[test]
fn test_nested_record_serialization() {
    let registry = setup_registry();
    let user = RecordView::from_input(
        registry,
        "User",
        [
            ("avatar", json!({"url": "p", "width": "4", "height": 5})),
            ("tags", json!(["a", 1, null])),
        ],
    )
    .unwrap();

    assert_eq!(
        user.to_json().unwrap(),
        json!({
            "avatar": {"width": 4, "height": 5, "area": 20},
            "tags": ["a", "1", null],
            "role": 1
        })
    );
}

/// Serialization reads only; the raw attributes are untouched.
#[test]
fn test_serialization_is_read_only() {
    let registry = setup_registry();
    let user = RecordView::from_input(registry, "User", [("age", "30")]).unwrap();
    let before = user.attributes().clone();
    user.serialize().unwrap();
    assert_eq!(user.attributes(), &before);
    assert_eq!(user.raw_attribute("age"), Some(&RawValue::from("30")));
}

// =============================================================================
// Persistence Path Tests
// =============================================================================

#[test]
fn test_formatted_is_schema_driven() {
    let registry = setup_registry();
    let mut user = RecordView::from_input(
        registry,
        "User",
        [("age", json!("30")), ("avatar", json!({"url": "p", "secret": 1}))],
    )
    .unwrap();
    user.set_attribute("nickname", "ada");
    user.set_attribute("name", RawValue::Null);

    let formatted = RawValue::Map(user.formatted().unwrap());
    assert_eq!(
        formatted.to_json().unwrap(),
        json!({"age": 30, "avatar": {"url": "p"}, "role": 1})
    );
}

/// An unparseable date is stored as-is and fails every read and write.
#[test]
fn test_bad_date_surfaces_on_read_and_write() {
    let registry = setup_registry();
    let mut user = RecordView::new(registry, "User").unwrap();
    user.set_attribute("born", "garbage");
    assert_eq!(user.raw_attribute("born"), Some(&RawValue::from("garbage")));

    let expected = CastError::date_parse("string \"garbage\"");
    assert_eq!(user.get_attribute("born").unwrap_err(), expected);
    assert_eq!(user.serialize().unwrap_err(), expected);
    assert_eq!(user.to_json().unwrap_err(), expected);
    assert_eq!(user.formatted().unwrap_err(), expected);

    user.set_attribute("born", "2001-02-03");
    assert_eq!(user.formatted().unwrap()["born"].to_json().unwrap(), json!(981_158_400_000i64));
}

// =============================================================================
// Loader Tests
// =============================================================================

/// Kinds read from disk behave like kinds declared in code.
#[test]
fn test_loaded_kinds_construct_records() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("user.json"),
        r#"{
            "kind": "User",
            "fields": {
                "age": {"type": "int"},
                "role": {"type": "int", "default": 1}
            },
            "fillable": ["age"]
        }"#,
    )
    .unwrap();

    let mut builder = SchemaRegistryBuilder::new();
    SchemaLoader::new(tmp.path()).load_into(&mut builder).unwrap();
    let registry = builder.build().unwrap();

    let user = RecordView::from_input(registry, "User", [("age", "30")]).unwrap();
    assert_eq!(user.to_json().unwrap(), json!({"age": 30, "role": 1}));
}

/// Enabling logging never changes a conversion result.
#[test]
fn test_logging_is_observational() {
    let registry = setup_registry();
    let quiet = RecordView::from_input(Arc::clone(&registry), "User", [("age", "30")])
        .unwrap()
        .to_json()
        .unwrap();

    observability::set_enabled(true);
    let logged = RecordView::from_input(registry, "User", [("age", "30")])
        .unwrap()
        .to_json()
        .unwrap();
    observability::set_enabled(false);

    assert_eq!(quiet, logged);
}
