//! Identifier helpers shared by the importer and the emitters.

use std::collections::HashSet;
use tracing::warn;

/// Upper-case the first character, leaving the rest untouched.
///
/// ```rust
/// use restmodgen::naming::upper_case_first;
/// assert_eq!(upper_case_first("productOption"), "ProductOption");
/// ```
pub fn upper_case_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Lower-case the first character, leaving the rest untouched.
pub fn lower_case_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a URL segment such as `product-option` or `product_option` to
/// lower camel case (`productOption`). Segments already in camel case are
/// returned unchanged.
pub fn to_camel_case(s: &str) -> String {
    let mut words = s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty());
    let mut out = match words.next() {
        Some(first) => lower_case_first(first),
        None => return String::new(),
    };
    for word in words {
        out.push_str(&upper_case_first(word));
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

const JAVA_RESERVED: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// `name` if it is already made of identifier characters, its camel-cased
/// form otherwise (`first-name` becomes `firstName`).
fn identifier_base(name: &str) -> String {
    if is_identifier(name) {
        return name.to_string();
    }
    match to_camel_case(name) {
        camel if camel.is_empty() => "value".to_string(),
        camel => camel,
    }
}

/// A valid Java variable name for a spec name.
///
/// Non-identifier characters are camel-cased away and reserved words get a
/// leading underscore.
///
/// ```rust
/// use restmodgen::naming::java_identifier;
/// assert_eq!(java_identifier("page-size"), "pageSize");
/// assert_eq!(java_identifier("class"), "_class");
/// assert_eq!(java_identifier("languageId"), "languageId");
/// ```
pub fn java_identifier(name: &str) -> String {
    let base = identifier_base(name);
    if JAVA_RESERVED.contains(&base.as_str()) {
        format!("_{base}")
    } else {
        base
    }
}

/// Class name of the DTO generated for a component
pub fn model_class_name(component: &str) -> String {
    format!("{}DTO", upper_case_first(&identifier_base(component)))
}

/// Class name of the resource interface generated for a path
pub fn resource_interface_name(path: &str) -> String {
    format!("{}Resource", upper_case_first(path))
}

/// Class name of the resource implementation generated for a path
pub fn resource_implementation_name(path: &str) -> String {
    format!("{}ResourceImpl", upper_case_first(path))
}

/// Return `name`, or `name_1`, `name_2`, ... if it was already taken.
pub(crate) fn unique_name(seen: &mut HashSet<String>, name: &str) -> String {
    if seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}_{counter}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

pub(crate) fn unique_method_name(seen: &mut HashSet<String>, name: &str) -> String {
    let unique = unique_name(seen, name);
    if unique != name {
        warn!(method = name, renamed = %unique, "Duplicate method name");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_case_first() {
        assert_eq!(upper_case_first("product"), "Product");
        assert_eq!(upper_case_first("Product"), "Product");
        assert_eq!(upper_case_first(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("productOption"), "productOption");
        assert_eq!(to_camel_case("product-option"), "productOption");
        assert_eq!(to_camel_case("product_option_value"), "productOptionValue");
        assert_eq!(to_camel_case("Orders"), "orders");
        assert_eq!(to_camel_case("2fa"), "_2fa");
        assert_eq!(to_camel_case("--"), "");
    }

    #[test]
    fn test_class_names() {
        assert_eq!(model_class_name("product"), "ProductDTO");
        assert_eq!(resource_interface_name("productOption"), "ProductOptionResource");
        assert_eq!(
            resource_implementation_name("productOption"),
            "ProductOptionResourceImpl"
        );
    }

    #[test]
    fn test_java_identifier() {
        assert_eq!(java_identifier("name"), "name");
        assert_eq!(java_identifier("page-size"), "pageSize");
        assert_eq!(java_identifier("first name"), "firstName");
        assert_eq!(java_identifier("class"), "_class");
        assert_eq!(java_identifier("default"), "_default");
        assert_eq!(java_identifier("2fa"), "_2fa");
        assert_eq!(java_identifier("$ref"), "$ref");
        assert_eq!(java_identifier("--"), "value");
    }

    #[test]
    fn test_model_class_name_is_an_identifier() {
        assert_eq!(model_class_name("product-option"), "ProductOptionDTO");
        assert_eq!(model_class_name("Product"), "ProductDTO");
    }

    #[test]
    fn test_unique_name_suffixes_taken_names() {
        let mut seen = HashSet::from(["language".to_string()]);
        assert_eq!(unique_name(&mut seen, "language"), "language_1");
        assert_eq!(unique_name(&mut seen, "pageSize"), "pageSize");
    }

    #[test]
    fn test_unique_method_name() {
        let mut seen = HashSet::new();
        assert_eq!(unique_method_name(&mut seen, "getProduct"), "getProduct");
        assert_eq!(unique_method_name(&mut seen, "getProduct"), "getProduct_1");
        assert_eq!(unique_method_name(&mut seen, "getProduct"), "getProduct_2");
    }
}
