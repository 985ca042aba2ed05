//! XML attribute and text escaping

use std::borrow::Cow;

/// Escape the five XML special characters, the same way the writer escapes
/// labels and attribute values.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}
