//! Class Name Resolution
//!
//! Pure string helpers that decompose class names such as
//! `ns::Handler<int>` into namespace, short name and embedded type.

/// Separator between namespace segments
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Returns true if the class name carries a namespace prefix
pub fn has_namespace(class_name: &str) -> bool {
    class_name.contains(NAMESPACE_SEPARATOR)
}

/// Strips everything up to and including the last namespace separator
///
/// # Example
/// ```
/// use plugin_manager::names::remove_namespace;
/// assert_eq!(remove_namespace("a::b::Plugin"), "Plugin");
/// assert_eq!(remove_namespace("Plugin"), "Plugin");
/// ```
pub fn remove_namespace(class_name: &str) -> &str {
    match class_name.rfind(NAMESPACE_SEPARATOR) {
        Some(idx) => &class_name[idx + NAMESPACE_SEPARATOR.len()..],
        None => class_name,
    }
}

/// Byte positions of the first `<` and the last `>`, if they enclose a span
fn embedded_span(class_name: &str) -> Option<(usize, usize)> {
    let open = class_name.find('<')?;
    let close = class_name.rfind('>')?;
    (close > open).then_some((open, close))
}

/// Returns true if the class name has an embedded type, e.g. `Item<int>`
pub fn has_embedded_type(class_name: &str) -> bool {
    embedded_span(class_name).is_some()
}

/// Returns the embedded type, e.g. `int` from `Item<int>`
///
/// Empty when the name has no embedded type.
pub fn extract_embedded_type(class_name: &str) -> &str {
    match embedded_span(class_name) {
        Some((open, close)) => &class_name[open + 1..close],
        None => "",
    }
}

/// Returns the base type, e.g. `Item` from `Item<int>`
pub fn extract_base_type(class_name: &str) -> &str {
    match embedded_span(class_name) {
        Some((open, _)) => &class_name[..open],
        None => class_name,
    }
}
