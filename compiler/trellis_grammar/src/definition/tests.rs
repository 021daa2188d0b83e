use super::*;
use pretty_assertions::assert_eq;

#[test]
fn bare_literal_has_no_label() {
    let def = Definition::from("gcd");
    assert_eq!(def.label(), None);
    assert_eq!(def.literals().collect::<Vec<_>>(), vec!["gcd"]);
}

#[test]
fn named_group_keeps_declaration_order() {
    let def = Definition::named("OPERATOR", ["+", "-", "/"]);
    assert_eq!(def.label(), Some("OPERATOR"));
    assert_eq!(def.literals().collect::<Vec<_>>(), vec!["+", "-", "/"]);
}

#[test]
fn named_single_match() {
    let def = Definition::named("PAREN_OPEN", "(");
    assert_eq!(def.literals().collect::<Vec<_>>(), vec!["("]);
}

#[test]
fn deserialize_mixed_entries() {
    let json = r#"[
        "SELECT",
        { "type": "BOOLEAN", "matches": ["TRUE", "FALSE"] },
        { "type": "NULL", "matches": "NULL" }
    ]"#;
    let defs: Vec<Definition> = serde_json::from_str(json).unwrap();
    assert_eq!(
        defs,
        vec![
            Definition::from("SELECT"),
            Definition::named("BOOLEAN", ["TRUE", "FALSE"]),
            Definition::named("NULL", "NULL"),
        ]
    );
}

#[test]
fn deserialize_rejects_object_without_matches() {
    let result: Result<Definition, _> = serde_json::from_str(r#"{ "type": "X" }"#);
    assert!(result.is_err());
}
