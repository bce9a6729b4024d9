use heck::{ToKebabCase, ToLowerCamelCase};

use crate::parse::operation::HttpMethod;

/// Derive a kebab-case name from a route.
///
/// Examples:
/// - `/users` → `users`
/// - `/users/{userId}` → `users-user-id`
/// - `/v1/pet.json` → `v1-pet-json`
/// - `/` → `index`
pub fn kebab_name_by_path(path: &str) -> String {
    let joined = path
        .split('/')
        .map(|seg| seg.trim_start_matches('{').trim_end_matches('}'))
        .filter(|seg| !seg.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let kebab = joined.to_kebab_case();
    if kebab.is_empty() {
        "index".to_string()
    } else {
        kebab
    }
}

/// `users-user-id` → `usersUserId`
pub fn camel_name_by_kebab(kebab: &str) -> String {
    kebab.to_lower_camel_case()
}

/// File name for one operation. Paths carrying several methods get the
/// method appended so each operation lands in its own file.
pub fn file_name(path: &str, method: HttpMethod, shares_path: bool) -> String {
    let kebab = kebab_name_by_path(path);
    if shares_path {
        format!("{kebab}-{}", method.as_str().to_lowercase())
    } else {
        kebab
    }
}
