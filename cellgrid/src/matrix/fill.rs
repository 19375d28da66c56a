//! Completing a matrix over a domain

use cellgrid_core::{Cell, Content, Position, Runtime, Slice};
use tracing::debug;

use super::Matrix;
use crate::error::Result;

/// Member of a heterogeneous fill group
enum Slot<const K: usize> {
    Present(Cell<K>),
    Absent(Position<K>),
    Fill(Content),
}

impl<R: Runtime, const K: usize> Matrix<R, K> {
    /// Give every position of `domain` without a cell the content `content`.
    ///
    /// Existing cells are untouched; `domain` may repeat positions.
    pub fn fill_homogeneous(self, domain: Vec<Position<K>>, content: Content) -> Matrix<R, K> {
        debug!(arity = K, domain = domain.len(), "fill_homogeneous");

        let (runtime, cells, tuner) = self.into_parts();
        let present = runtime.map(cells, |cell| (cell.position, Some(cell.content)));
        let declared = runtime.map(runtime.from_vec(domain), |position| (position, None));

        let groups = runtime.group_by_key(runtime.union(present, declared), &tuner);
        let output = runtime.map(groups, |(position, contents)| {
            let content = contents
                .into_iter()
                .flatten()
                .next()
                .unwrap_or_else(|| content.clone());
            Cell::new(position, content)
        });

        Self::derived(runtime, output, tuner)
    }

    /// Fill the positions of `domain` without a cell from a per-group table.
    ///
    /// `values` holds one fill content per selected key. A missing position
    /// whose group has no fill content stays missing.
    pub fn fill_heterogeneous<Sl, const S: usize>(
        self,
        slice: Sl,
        domain: Vec<Position<K>>,
        values: Vec<Cell<S>>,
    ) -> Result<Matrix<R, K>>
    where
        Sl: Slice<K, Selected = Position<S>>,
    {
        slice.dimension().index(K)?;
        debug!(
            arity = K,
            domain = domain.len(),
            values = values.len(),
            "fill_heterogeneous"
        );

        let (runtime, cells, tuner) = self.into_parts();

        // Positions of the domain that hold no cell
        let present = runtime.map(cells, |cell| (cell.position.clone(), Some(cell)));
        let declared = runtime.map(runtime.from_vec(domain), |position| (position, None));
        let by_position = runtime.group_by_key(runtime.union(present, declared), &tuner);
        let slots = runtime.flat_map(by_position, |(position, cells)| {
            let slot = match cells.into_iter().flatten().next() {
                Some(cell) => Slot::<K>::Present(cell),
                None => Slot::Absent(position),
            };
            let selected = slice.selected(slot_position(&slot)?).ok()?;
            Some((selected, slot))
        });

        let fills = runtime.map(runtime.from_vec(values), |cell| {
            (cell.position, Slot::<K>::Fill(cell.content))
        });

        let groups = runtime.group_by_key(runtime.union(slots, fills), &tuner);
        let output = runtime.flat_map(groups, |(_, slots)| {
            let fill = slots.iter().find_map(|slot| match slot {
                Slot::Fill(content) => Some(content.clone()),
                _ => None,
            });

            slots
                .into_iter()
                .filter_map(|slot| match slot {
                    Slot::Present(cell) => Some(cell),
                    Slot::Absent(position) => fill.clone().map(|content| Cell::new(position, content)),
                    Slot::Fill(_) => None,
                })
                .collect::<Vec<_>>()
        });

        Ok(Self::derived(runtime, output, tuner))
    }
}

fn slot_position<const K: usize>(slot: &Slot<K>) -> Option<&Position<K>> {
    match slot {
        Slot::Present(cell) => Some(&cell.position),
        Slot::Absent(position) => Some(position),
        Slot::Fill(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::matrix::fixtures::*;
    use cellgrid_core::{position, Content, Dimension, Over};

    #[test]
    fn test_fill_homogeneous() {
        let m = matrix(vec![cell(position!["A"], 1.0)]);
        let filled = m
            .fill_homogeneous(
                vec![position!["A"], position!["B"], position!["C"]],
                Content::continuous(0.0),
            )
            .to_sorted_vec();

        assert_eq!(
            filled,
            vec![
                cell(position!["A"], 1.0),
                cell(position!["B"], 0.0),
                cell(position!["C"], 0.0),
            ]
        );
    }

    #[test]
    fn test_fill_homogeneous_over_empty_scalar_domain() {
        let empty = matrix::<0>(Vec::new());
        let domain = empty.clone().domain();
        let filled = empty.fill_homogeneous(domain, Content::continuous(0.0));
        assert_eq!(filled.count(), 0);
    }

    #[test]
    fn test_fill_homogeneous_keeps_cells_outside_domain() {
        let m = matrix(vec![cell(position!["Z"], 4.0)]);
        let filled = m
            .fill_homogeneous(vec![position!["A"]], Content::continuous(0.0))
            .to_sorted_vec();
        assert_eq!(filled, vec![cell(position!["A"], 0.0), cell(position!["Z"], 4.0)]);
    }

    #[test]
    fn test_fill_heterogeneous() {
        let domain = iris().domain();
        assert_eq!(domain.len(), 9);

        let filled = iris()
            .fill_heterogeneous(
                Over(Dimension::Second),
                domain,
                vec![
                    cell(position!["petal"], -1.0),
                    cell(position!["species"], -2.0),
                ],
            )
            .expect("valid slice")
            .to_sorted_vec();

        assert_eq!(filled.len(), 9);
        let species_3 = filled
            .iter()
            .find(|c| c.position == position!["iris-3", "species"])
            .map(|c| c.content.clone());
        assert_eq!(species_3, Some(Content::continuous(-2.0)));
        let species_1 = filled
            .iter()
            .find(|c| c.position == position!["iris-1", "species"])
            .map(|c| c.content.clone());
        assert_eq!(species_1, Some(Content::nominal("setosa")));
    }

    #[test]
    fn test_fill_heterogeneous_without_fill_value() {
        let m = matrix(vec![cell(position!["a", "x"], 1.0), cell(position!["b", "y"], 2.0)]);
        let domain = vec![
            position!["a", "x"],
            position!["a", "y"],
            position!["b", "x"],
            position!["b", "y"],
        ];

        let filled = m
            .fill_heterogeneous(Over(Dimension::Second), domain, vec![cell(position!["y"], 0.0)])
            .expect("valid slice")
            .to_sorted_vec();

        // ("b", "x") has no fill value and stays absent
        assert_eq!(
            filled,
            vec![
                cell(position!["a", "x"], 1.0),
                cell(position!["a", "y"], 0.0),
                cell(position!["b", "y"], 2.0),
            ]
        );
    }
}
