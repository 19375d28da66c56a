//! Cells and group entries

use alloc::string::String;

use super::content::Content;
use super::position::Position;

/// A position and its content; the atomic datum of a matrix
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell<const K: usize> {
    pub position: Position<K>,
    pub content: Content,
}

impl<const K: usize> Cell<K> {
    pub fn new(position: Position<K>, content: Content) -> Self {
        Self { position, content }
    }

    /// Render as `c1|..|cK|codec|schema|value` with the given separator.
    ///
    /// Coordinates and schema are written verbatim, so a line only parses
    /// back when neither contains the separator. The value may contain it.
    pub fn to_short_string(&self, separator: &str) -> String {
        if K == 0 {
            return self.content.to_short_string(separator);
        }
        alloc::format!(
            "{}{separator}{}",
            self.position.to_short_string(separator),
            self.content.to_short_string(separator)
        )
    }

    /// Render as a `(key, value)` pair for key-value writers.
    ///
    /// The key is the position joined by `separator`; the value is the
    /// content in short form.
    pub fn to_key_value(&self, separator: &str) -> (String, String) {
        (
            self.position.to_short_string(separator),
            self.content.to_short_string(separator),
        )
    }
}

/// Remainder position and content of a cell inside a group
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<const R: usize> {
    pub remainder: Position<R>,
    pub content: Content,
}

impl<const R: usize> Entry<R> {
    pub fn new(remainder: Position<R>, content: Content) -> Self {
        Self { remainder, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position;

    #[test]
    fn test_short_string() {
        let cell = Cell::new(position!["iris", "petal"], Content::continuous(1.25));
        assert_eq!(cell.to_short_string("|"), "iris|petal|real|continuous|1.25");

        let scalar = Cell::new(position![], Content::discrete(4));
        assert_eq!(scalar.to_short_string(","), "integer,discrete,4");
    }

    #[test]
    fn test_key_value() {
        let cell = Cell::new(position!["a", 1], Content::nominal("red"));
        assert_eq!(
            cell.to_key_value(":"),
            (String::from("a:1"), String::from("text:nominal:red"))
        );
    }
}
