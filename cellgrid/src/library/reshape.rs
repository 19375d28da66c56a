//! Reshape locators

use cellgrid_core::{Cell, Expandable, Locator, Position, Value};

/// Append the promoted value as a new last coordinate.
///
/// Cells without a promoted value take the missing marker, or are dropped
/// when there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendValue {
    missing: Option<Value>,
}

impl AppendValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing(marker: impl Into<Value>) -> Self {
        Self {
            missing: Some(marker.into()),
        }
    }
}

impl<const K: usize, const Q: usize> Locator<K, Q> for AppendValue
where
    Position<K>: Expandable<Expanded = Position<Q>>,
{
    fn locate(&self, cell: &Cell<K>, value: Option<&Value>) -> Option<Position<Q>> {
        let value = value.or(self.missing.as_ref())?;
        Some(cell.position.append(value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_core::{position, Content};

    #[test]
    fn test_append_value() {
        let cell = Cell::new(position!["iris-1", "sepal"], Content::continuous(5.1));
        let promoted = Value::from("setosa");

        let located: Option<Position<3>> = AppendValue::new().locate(&cell, Some(&promoted));
        assert_eq!(located, Some(position!["iris-1", "sepal", "setosa"]));

        let dropped: Option<Position<3>> = AppendValue::new().locate(&cell, None);
        assert_eq!(dropped, None);

        let marked: Option<Position<3>> = AppendValue::with_missing("?").locate(&cell, None);
        assert_eq!(marked, Some(position!["iris-1", "sepal", "?"]));
    }
}
