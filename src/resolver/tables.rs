//! Static lookup tables for the type resolver.
//!
//! These are compile-time constants; the only derived structure is the
//! reverse mapping from Go type to Swagger type/format name, built once from
//! the forward table.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Forward mapping from Swagger type or (dash-stripped) format to Go type.
pub const TYPE_MAPPING: &[(&str, &str)] = &[
    ("byte", "strfmt.Base64"),
    ("date", "strfmt.Date"),
    ("datetime", "strfmt.DateTime"),
    ("uri", "strfmt.URI"),
    ("email", "strfmt.Email"),
    ("hostname", "strfmt.Hostname"),
    ("ipv4", "strfmt.IPv4"),
    ("ipv6", "strfmt.IPv6"),
    ("uuid", "strfmt.UUID"),
    ("uuid3", "strfmt.UUID3"),
    ("uuid4", "strfmt.UUID4"),
    ("uuid5", "strfmt.UUID5"),
    ("isbn", "strfmt.ISBN"),
    ("isbn10", "strfmt.ISBN10"),
    ("isbn13", "strfmt.ISBN13"),
    ("creditcard", "strfmt.CreditCard"),
    ("ssn", "strfmt.SSN"),
    ("hexcolor", "strfmt.HexColor"),
    ("rgbcolor", "strfmt.RGBColor"),
    ("duration", "strfmt.Duration"),
    ("password", "strfmt.Password"),
    ("char", "rune"),
    ("int", "int64"),
    ("int8", "int8"),
    ("int16", "int16"),
    ("int32", "int32"),
    ("int64", "int64"),
    ("uint", "uint64"),
    ("uint8", "uint8"),
    ("uint16", "uint16"),
    ("uint32", "uint32"),
    ("uint64", "uint64"),
    ("float", "float32"),
    ("double", "float64"),
    ("number", "float64"),
    ("integer", "int64"),
    ("boolean", "bool"),
    ("file", "runtime.File"),
];

/// Zero value literals per Go type, consumed by templates.
pub const ZEROES: &[(&str, &str)] = &[
    ("string", "\"\""),
    ("int8", "0"),
    ("int16", "0"),
    ("int32", "0"),
    ("int64", "0"),
    ("uint8", "0"),
    ("uint16", "0"),
    ("uint32", "0"),
    ("uint64", "0"),
    ("bool", "false"),
    ("float32", "0"),
    ("float64", "0"),
    ("strfmt.DateTime", "strfmt.DateTime{}"),
    ("strfmt.Date", "strfmt.Date{}"),
    ("strfmt.URI", "strfmt.URI(\"\")"),
    ("strfmt.Email", "strfmt.Email(\"\")"),
    ("strfmt.Hostname", "strfmt.Hostname(\"\")"),
    ("strfmt.IPv4", "strfmt.IPv4(\"\")"),
    ("strfmt.IPv6", "strfmt.IPv6(\"\")"),
    ("strfmt.UUID", "strfmt.UUID(\"\")"),
    ("strfmt.UUID3", "strfmt.UUID3(\"\")"),
    ("strfmt.UUID4", "strfmt.UUID4(\"\")"),
    ("strfmt.UUID5", "strfmt.UUID5(\"\")"),
    ("strfmt.ISBN", "strfmt.ISBN(\"\")"),
    ("strfmt.ISBN10", "strfmt.ISBN10(\"\")"),
    ("strfmt.ISBN13", "strfmt.ISBN13(\"\")"),
    ("strfmt.CreditCard", "strfmt.CreditCard(\"\")"),
    ("strfmt.SSN", "strfmt.SSN(\"\")"),
    ("strfmt.Password", "strfmt.Password(\"\")"),
    ("strfmt.HexColor", "strfmt.HexColor(\"#000000\")"),
    ("strfmt.RGBColor", "strfmt.RGBColor(\"rgb(0,0,0)\")"),
    ("strfmt.Base64", "nil"),
    ("strfmt.Duration", "0"),
];

/// Conversion helpers for binding simple values from request strings.
pub const STRING_CONVERTERS: &[(&str, &str)] = &[
    ("int8", "swag.ConvertInt8"),
    ("int16", "swag.ConvertInt16"),
    ("int32", "swag.ConvertInt32"),
    ("int64", "swag.ConvertInt64"),
    ("uint8", "swag.ConvertUint8"),
    ("uint16", "swag.ConvertUint16"),
    ("uint32", "swag.ConvertUint32"),
    ("uint64", "swag.ConvertUint64"),
    ("bool", "swag.ConvertBool"),
    ("float32", "swag.ConvertFloat32"),
    ("float64", "swag.ConvertFloat64"),
];

/// Formatting helpers for writing simple values back to strings.
pub const STRING_FORMATTERS: &[(&str, &str)] = &[
    ("int8", "swag.FormatInt8"),
    ("int16", "swag.FormatInt16"),
    ("int32", "swag.FormatInt32"),
    ("int64", "swag.FormatInt64"),
    ("uint8", "swag.FormatUint8"),
    ("uint16", "swag.FormatUint16"),
    ("uint32", "swag.FormatUint32"),
    ("uint64", "swag.FormatUint64"),
    ("bool", "swag.FormatBool"),
    ("float32", "swag.FormatFloat32"),
    ("float64", "swag.FormatFloat64"),
];

/// Go types considered language primitives.
const PRIMITIVES: &[&str] = &[
    "bool", "uint", "uint8", "uint16", "uint32", "uint64", "int", "int8", "int16", "int32",
    "int64", "float32", "float64", "string", "complex64", "complex128", "byte", "[]byte", "rune",
];

/// Go types that require a specialised formatter wrapper. Date and time
/// types are bound through dedicated handling instead.
const CUSTOM_FORMATTERS: &[&str] = &[
    "strfmt.URI",
    "strfmt.Email",
    "strfmt.Hostname",
    "strfmt.IPv4",
    "strfmt.IPv6",
    "strfmt.UUID",
    "strfmt.UUID3",
    "strfmt.UUID4",
    "strfmt.UUID5",
    "strfmt.ISBN",
    "strfmt.ISBN10",
    "strfmt.ISBN13",
    "strfmt.CreditCard",
    "strfmt.SSN",
    "strfmt.Password",
    "strfmt.HexColor",
    "strfmt.RGBColor",
    "strfmt.Base64",
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Go type for a Swagger type or dash-stripped format name.
pub fn go_type_for(name: &str) -> Option<&'static str> {
    lookup(TYPE_MAPPING, name)
}

/// Zero value literal for a Go type.
pub fn zero_value(go_type: &str) -> Option<&'static str> {
    lookup(ZEROES, go_type)
}

/// String-to-value converter for a Go type, if one exists.
pub fn string_converter(go_type: &str) -> Option<&'static str> {
    lookup(STRING_CONVERTERS, go_type)
}

/// Value-to-string formatter for a Go type, if one exists.
pub fn string_formatter(go_type: &str) -> Option<&'static str> {
    lookup(STRING_FORMATTERS, go_type)
}

pub fn is_primitive(go_type: &str) -> bool {
    PRIMITIVES.contains(&go_type)
}

pub fn is_custom_formatter(go_type: &str) -> bool {
    CUSTOM_FORMATTERS.contains(&go_type)
}

/// Reverse mapping from Go type to Swagger type/format name, built once
/// from [`TYPE_MAPPING`]. Later entries win so aliased names stay stable.
pub fn swagger_type_name(go_type: &str) -> Option<&'static str> {
    static REVERSE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    let map = REVERSE.get_or_init(|| {
        let mut m = HashMap::new();
        for (name, go) in TYPE_MAPPING {
            m.insert(*go, *name);
        }
        m
    });
    map.get(go_type).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_mapping() {
        assert_eq!(go_type_for("integer"), Some("int64"));
        assert_eq!(go_type_for("datetime"), Some("strfmt.DateTime"));
        assert_eq!(go_type_for("uuid"), Some("strfmt.UUID"));
        assert_eq!(go_type_for("unknown"), None);
    }

    #[test]
    fn test_every_mapped_type_has_zero() {
        for (_, go) in TYPE_MAPPING {
            if *go == "rune" || *go == "runtime.File" {
                continue;
            }
            assert!(zero_value(go).is_some(), "no zero value for {}", go);
        }
    }

    #[test]
    fn test_primitive_and_formatter_sets() {
        assert!(is_primitive("int64"));
        assert!(is_primitive("string"));
        assert!(!is_primitive("strfmt.UUID"));
        assert!(is_custom_formatter("strfmt.UUID"));
        assert!(!is_custom_formatter("strfmt.DateTime"));
    }

    #[test]
    fn test_reverse_mapping_round_trip() {
        assert_eq!(swagger_type_name("bool"), Some("boolean"));
        assert_eq!(swagger_type_name("strfmt.UUID4"), Some("uuid4"));
        assert_eq!(swagger_type_name("unmapped"), None);
    }

    #[test]
    fn test_converters() {
        assert_eq!(string_converter("int64"), Some("swag.ConvertInt64"));
        assert_eq!(string_formatter("bool"), Some("swag.FormatBool"));
        assert_eq!(string_converter("string"), None);
    }
}
