//! Dump mode: canonical JSON serialisation of the generation tree.
//!
//! The only guarantee is that two runs of the same engine version on the
//! same input produce byte-identical output; keys appear in insertion order
//! at every level.

use serde::Serialize;

use crate::errors::{GenError, GenResult};

/// Serialise a generation record as canonical, pretty-printed JSON.
pub fn to_canonical_json<T: Serialize>(value: &T) -> GenResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| GenError::io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowering::lower_definition;
    use crate::spec::Document;
    use pretty_assertions::assert_eq;

    const SPEC: &str = r#"{
        "swagger": "2.0",
        "info": {"title": "t", "version": "1"},
        "definitions": {
            "Order": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": {"type": "integer", "format": "int64", "minimum": 1},
                    "item": {"type": "object", "properties": {"sku": {"type": "string"}}}
                }
            }
        }
    }"#;

    #[test]
    fn test_dump_is_deterministic() {
        let render = || {
            let mut doc = Document::from_json(SPEC).unwrap();
            let def = lower_definition(&mut doc, "Order", "models").unwrap();
            to_canonical_json(&def).unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_dump_is_valid_json_with_expected_keys() {
        let mut doc = Document::from_json(SPEC).unwrap();
        let def = lower_definition(&mut doc, "Order", "models").unwrap();
        let dumped = to_canonical_json(&def).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&dumped).unwrap();
        assert_eq!(parsed["Name"], "Order");
        assert_eq!(parsed["GoType"], "Order");
        assert_eq!(parsed["HasValidations"], true);
        assert_eq!(parsed["ExtraSchemas"][0]["Name"], "OrderItem");
    }
}
