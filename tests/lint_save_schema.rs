//! Lint: every persisted field must be merge-read on load.
//!
//! The save payload is written from the `SaveData` struct (serde,
//! camelCase) but read back through hand-rolled per-field merges, so adding
//! a field to `SaveData` without a matching read silently drops it on the
//! next reload. This test scans `src/game/save.rs` and flags any serialized
//! field whose camelCase key never appears as a string literal in the file.

use std::fs;

/// Convert a snake_case field name to the camelCase key serde emits.
fn camel_case(snake: &str) -> String {
    let mut out = String::new();
    let mut upper_next = false;
    for c in snake.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Extract the field names of a named struct from source text.
fn struct_fields(source: &str, struct_name: &str) -> Vec<String> {
    let header = format!("struct {struct_name} {{");
    let start = source
        .find(&header)
        .unwrap_or_else(|| panic!("{struct_name} not found"));
    let body = &source[start + header.len()..];
    let end = body.find('}').expect("unterminated struct");

    body[..end]
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.starts_with("//") || line.starts_with('#') || line.is_empty() {
                return None;
            }
            let (name, _) = line.split_once(':')?;
            Some(name.trim().trim_start_matches("pub ").to_string())
        })
        .collect()
}

#[test]
fn every_save_field_is_merge_read() {
    let source = fs::read_to_string("src/game/save.rs").expect("read save.rs");
    let fields = struct_fields(&source, "SaveData");
    assert!(
        fields.len() >= 8,
        "SaveData parse looks wrong: {:?}",
        fields
    );

    let mut missing = Vec::new();
    for field in &fields {
        let key = camel_case(field);
        let literal = format!("\"{key}\"");
        // The write side emits the key via serde's rename_all, so the only
        // occurrence of the quoted literal is the read-side merge.
        if !source.contains(&literal) {
            missing.push(key);
        }
    }

    assert!(
        missing.is_empty(),
        "serialized fields with no merge-read (load will drop them): {:?}",
        missing
    );
}

#[test]
fn camel_case_conversion() {
    assert_eq!(camel_case("currency"), "currency");
    assert_eq!(camel_case("total_earned"), "totalEarned");
    assert_eq!(
        camel_case("currency_per_click_overridden"),
        "currencyPerClickOverridden"
    );
}
