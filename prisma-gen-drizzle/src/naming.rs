//! Binding and module naming conventions
//!
//! - table binding: `lowerCamel(plural(Model))` in module `kebab(binding)`
//! - relations binding: `<table binding>Relations` in module `<module>-relations`
//! - enum binding: `<lowerCamel(Enum)>Enum` in module `kebab(Enum)-enum`

use heck::{ToKebabCase, ToLowerCamelCase};

/// English plural of a (camel-cased) name
///
/// A name already ending in a plural `s` (`Follows`, `UserSettings`) is kept
/// as is; `ss`, `us` and `is` endings are singular and get `es`.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.ends_with('s') && !["ss", "us", "is"].iter().any(|end| lower.ends_with(end)) {
        return word.to_string();
    }
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", word);
    }
    let mut chars = lower.chars().rev();
    if let (Some('y'), Some(before)) = (chars.next(), chars.next()) {
        if !"aeiou".contains(before) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }
    format!("{}s", word)
}

/// Binding of a model's table declaration (`User` -> `users`)
pub fn table_binding(model_name: &str) -> String {
    pluralize(&model_name.to_lower_camel_case())
}

/// Module holding a model's table declaration
pub fn table_module(model_name: &str) -> String {
    table_binding(model_name).to_kebab_case()
}

/// Binding of a model's relations declaration
pub fn relations_binding(model_name: &str) -> String {
    format!("{}Relations", table_binding(model_name))
}

/// Module holding a model's relations declaration
pub fn relations_module(model_name: &str) -> String {
    format!("{}-relations", table_module(model_name))
}

/// Binding of an enum declaration (`UserRole` -> `userRoleEnum`)
pub fn enum_binding(enum_name: &str) -> String {
    format!("{}Enum", enum_name.to_lower_camel_case())
}

/// Module holding an enum declaration
pub fn enum_module(enum_name: &str) -> String {
    format!("{}-enum", enum_name.to_kebab_case())
}

/// Identifier used for a wildcard import of a module (`users-relations` -> `usersRelations`)
pub fn module_alias(module_name: &str) -> String {
    module_name.to_lower_camel_case()
}

/// Whether `name` can be used as a bare JavaScript identifier
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
