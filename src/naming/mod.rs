//! Deterministic name mangling for generated Go identifiers and files.
//!
//! Name invention is a pure function of its inputs: the same definition and
//! lifting path always produce the same identifier, which keeps generated
//! output stable across runs.

/// Initialisms that stay fully capitalized in Go identifiers.
const INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
    "TTL", "UDP", "UI", "UID", "URI", "URL", "UTF8", "UUID", "VM", "XML", "XSRF", "XSS",
];

/// Split an arbitrary string into words at separators and case boundaries.
fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in s.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Capitalize a single word, upgrading known initialisms.
fn go_word(word: &str) -> String {
    let upper = word.to_uppercase();
    if INITIALISMS.contains(&upper.as_str()) {
        return upper;
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => {
            let mut out = c.to_uppercase().to_string();
            out.extend(chars);
            out
        }
        None => String::new(),
    }
}

/// Convert an arbitrary name to an exported Go identifier.
pub fn to_go_name(s: &str) -> String {
    let name: String = split_words(s).iter().map(|w| go_word(w)).collect();
    // identifiers cannot start with a digit
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("Nr{}", name)
    } else {
        name
    }
}

/// Convert an arbitrary name to an unexported Go identifier.
pub fn to_var_name(s: &str) -> String {
    let words = split_words(s);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            let upper = w.to_uppercase();
            if INITIALISMS.contains(&upper.as_str()) {
                out.push_str(&w.to_lowercase());
            } else {
                let mut chars = w.chars();
                if let Some(c) = chars.next() {
                    out.extend(c.to_lowercase());
                    out.extend(chars);
                }
            }
        } else {
            out.push_str(&go_word(w));
        }
    }
    out
}

/// Convert an arbitrary name to a snake_case file base name.
pub fn to_file_name(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_go_name() {
        assert_eq!(to_go_name("pet"), "Pet");
        assert_eq!(to_go_name("pet id"), "PetID");
        assert_eq!(to_go_name("petId"), "PetID");
        assert_eq!(to_go_name("get-pet-by-id"), "GetPetByID");
        assert_eq!(to_go_name("order_item"), "OrderItem");
        assert_eq!(to_go_name("Order item"), "OrderItem");
        assert_eq!(to_go_name("http_status"), "HTTPStatus");
        assert_eq!(to_go_name("already Pascal"), "AlreadyPascal");
    }

    #[test]
    fn test_to_go_name_leading_digit() {
        assert_eq!(to_go_name("123 list"), "Nr123List");
    }

    #[test]
    fn test_to_var_name() {
        assert_eq!(to_var_name("Pet"), "pet");
        assert_eq!(to_var_name("pet id"), "petID");
        assert_eq!(to_var_name("ID tag"), "idTag");
    }

    #[test]
    fn test_to_file_name() {
        assert_eq!(to_file_name("GetPetByID"), "get_pet_by_id");
        assert_eq!(to_file_name("OrderItems0"), "order_items0");
        assert_eq!(to_file_name("Pet"), "pet");
    }

    #[test]
    fn test_split_words_boundaries() {
        assert_eq!(split_words("fooBarBaz"), vec!["foo", "Bar", "Baz"]);
        assert_eq!(split_words("a.b-c_d"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_words("Items0"), vec!["Items0"]);
    }
}
