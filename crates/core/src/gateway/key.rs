//! Composite key construction and decomposition.
//!
//! Layout: `\0 namespace \0 attr1 \0 attr2 \0 ...`. The leading delimiter
//! keeps composite keys out of the simple-key space, and the trailing
//! delimiter after every attribute means a prefix of attributes is also a
//! byte prefix of every key that extends it.

use paysettle_shared::types::KEY_DELIMITER;

use super::error::GatewayError;

/// Builds a composite key from a namespace and its attributes.
///
/// # Errors
///
/// Returns `GatewayError::InvalidKey` if the namespace is empty or any part
/// contains the delimiter.
pub fn create_composite_key(namespace: &str, attributes: &[&str]) -> Result<String, GatewayError> {
    if namespace.is_empty() {
        return Err(GatewayError::invalid_key("composite key namespace is empty"));
    }
    check_component(namespace)?;

    let mut key = String::with_capacity(
        2 + namespace.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(KEY_DELIMITER);
    key.push_str(namespace);
    key.push(KEY_DELIMITER);
    for attribute in attributes {
        check_component(attribute)?;
        key.push_str(attribute);
        key.push(KEY_DELIMITER);
    }
    Ok(key)
}

/// Decomposes a composite key into `(namespace, attributes)`.
///
/// # Errors
///
/// Returns `GatewayError::InvalidKey` if `key` is not a composite key.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>), GatewayError> {
    let body = key
        .strip_prefix(KEY_DELIMITER)
        .and_then(|rest| rest.strip_suffix(KEY_DELIMITER))
        .ok_or_else(|| GatewayError::invalid_key(format!("not a composite key: {key:?}")))?;

    let mut parts = body.split(KEY_DELIMITER).map(str::to_string);
    let namespace = parts
        .next()
        .filter(|ns| !ns.is_empty())
        .ok_or_else(|| {
            GatewayError::invalid_key(format!("composite key without namespace: {key:?}"))
        })?;

    Ok((namespace, parts.collect()))
}

/// Returns true if `key` uses the composite layout.
#[must_use]
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(KEY_DELIMITER)
}

/// Half-open range covering every key that starts with `prefix`.
///
/// The end bound is the smallest string greater than every extension of
/// `prefix`: its last character bumped by one code point. For a composite
/// prefix that is the trailing `\0` turned into `\u{1}`. An empty end means
/// the range is unbounded above.
#[must_use]
pub fn prefix_range(prefix: &str) -> (String, String) {
    let mut end = prefix.to_string();
    while let Some(last) = end.pop() {
        if let Some(next) = next_char(last) {
            end.push(next);
            return (prefix.to_string(), end);
        }
    }
    (prefix.to_string(), String::new())
}

fn next_char(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        _ => char::from_u32(u32::from(c) + 1),
    }
}

fn check_component(part: &str) -> Result<(), GatewayError> {
    if part.contains(KEY_DELIMITER) {
        return Err(GatewayError::invalid_key(format!(
            "key component contains U+0000: {part:?}"
        )));
    }
    Ok(())
}
