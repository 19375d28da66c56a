//! Pairwise operators
//!
//! Every operator presents its result at the group key extended by a label
//! `(left<op>right)` built from the remainders of the pair. Arithmetic
//! operators read numeric content and skip pairs they cannot interpret.

use cellgrid_core::{Cell, Content, Entry, Expandable, Operator, Position};

/// Remainder text used in labels
const SEPARATOR: &str = "|";

fn label<const R: usize>(left: &Entry<R>, right: &Entry<R>, symbol: &str) -> String {
    format!(
        "({}{symbol}{})",
        left.remainder.to_short_string(SEPARATOR),
        right.remainder.to_short_string(SEPARATOR)
    )
}

fn arithmetic<const S: usize, const R: usize, const Q: usize>(
    selected: &Position<S>,
    left: &Entry<R>,
    right: &Entry<R>,
    symbol: &str,
    apply: impl FnOnce(f64, f64) -> Option<f64>,
) -> Vec<Cell<Q>>
where
    Position<S>: Expandable<Expanded = Position<Q>>,
{
    let result = left
        .content
        .numeric()
        .zip(right.content.numeric())
        .and_then(|(l, r)| apply(l, r));

    match result {
        Some(value) => vec![Cell::new(
            selected.append(label(left, right, symbol)),
            Content::continuous(value),
        )],
        None => Vec::new(),
    }
}

macro_rules! arithmetic_operator {
    ($(#[$doc:meta])* $name:ident, $symbol:literal, $apply:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            pub fn new() -> Self {
                Self
            }
        }

        impl<const S: usize, const R: usize, const Q: usize> Operator<S, R, Q> for $name
        where
            Position<S>: Expandable<Expanded = Position<Q>>,
        {
            fn compute(&self, selected: &Position<S>, left: &Entry<R>, right: &Entry<R>) -> Vec<Cell<Q>> {
                arithmetic(selected, left, right, $symbol, $apply)
            }
        }
    };
}

arithmetic_operator!(
    /// `left + right`
    Plus, "+", |l, r| Some(l + r)
);
arithmetic_operator!(
    /// `left - right`
    Minus, "-", |l, r| Some(l - r)
);
arithmetic_operator!(
    /// `left * right`
    Times, "*", |l, r| Some(l * r)
);
arithmetic_operator!(
    /// `left / right`; pairs with a zero divisor are skipped
    Divide, "/", |l, r| (r != 0.0).then(|| l / r)
);

/// Join the text of both values, as nominal content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concatenate {
    separator: String,
}

impl Concatenate {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl<const S: usize, const R: usize, const Q: usize> Operator<S, R, Q> for Concatenate
where
    Position<S>: Expandable<Expanded = Position<Q>>,
{
    fn compute(&self, selected: &Position<S>, left: &Entry<R>, right: &Entry<R>) -> Vec<Cell<Q>> {
        let text = format!(
            "{}{}{}",
            left.content.value(),
            self.separator,
            right.content.value()
        );
        vec![Cell::new(
            selected.append(label(left, right, &self.separator)),
            Content::nominal(text),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_core::position;

    fn entry(name: &str, content: Content) -> Entry<1> {
        Entry::new(position![name], content)
    }

    fn compute<O: Operator<1, 1, 2>>(operator: &O, left: &Entry<1>, right: &Entry<1>) -> Vec<Cell<2>> {
        operator.compute(&position!["g"], left, right)
    }

    #[test]
    fn test_arithmetic() {
        let a = entry("a", Content::continuous(6.0));
        let b = entry("b", Content::discrete(4));

        assert_eq!(
            compute(&Plus::new(), &a, &b),
            vec![Cell::new(position!["g", "(a+b)"], Content::continuous(10.0))]
        );
        assert_eq!(compute(&Minus::new(), &a, &b)[0].content, Content::continuous(2.0));
        assert_eq!(compute(&Times::new(), &a, &b)[0].content, Content::continuous(24.0));
        assert_eq!(compute(&Divide::new(), &a, &b)[0].content, Content::continuous(1.5));
    }

    #[test]
    fn test_skipped_pairs() {
        let a = entry("a", Content::continuous(6.0));
        let zero = entry("z", Content::continuous(0.0));
        let text = entry("t", Content::nominal("n/a"));

        assert!(compute(&Divide::new(), &a, &zero).is_empty());
        assert!(compute(&Plus::new(), &a, &text).is_empty());
    }

    #[test]
    fn test_concatenate() {
        let a = entry("a", Content::nominal("red"));
        let b = entry("b", Content::discrete(7));
        assert_eq!(
            compute(&Concatenate::new(":"), &a, &b),
            vec![Cell::new(position!["g", "(a:b)"], Content::nominal("red:7"))]
        );
    }
}
