//! Standardise a small data set and split it into train and test files.
//!
//! Run with `RUST_LOG=debug cargo run --example pipeline` to see every
//! matrix operation.

use cellgrid::io::write_cells;
use cellgrid::library::aggregate::{Mean, StandardDeviation};
use cellgrid::library::partition::BinaryHashSplit;
use cellgrid::library::transform::Standardise;
use cellgrid::{
    position, AppendName, Cell, Content, Dimension, LocalRuntime, Matrix, Over, Result,
};
use tracing_subscriber::EnvFilter;

fn cells() -> Vec<Cell<2>> {
    let rows = [
        ("iris-1", 5.1, 3.5, 1.4),
        ("iris-2", 4.9, 3.0, 1.4),
        ("iris-3", 7.0, 3.2, 4.7),
        ("iris-4", 6.4, 3.2, 4.5),
        ("iris-5", 6.3, 3.3, 6.0),
        ("iris-6", 5.8, 2.7, 5.1),
    ];

    rows.iter()
        .flat_map(|&(id, sepal_length, sepal_width, petal_length)| {
            [
                ("sepal-length", sepal_length),
                ("sepal-width", sepal_width),
                ("petal-length", petal_length),
            ]
            .into_iter()
            .map(move |(feature, value)| Cell::new(position![id, feature], Content::continuous(value)))
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matrix = Matrix::from_cells(LocalRuntime::new(), cells());

    let summary = matrix.clone().summarise(
        Over(Dimension::Second),
        (
            Mean::named(AppendName::new("mean")),
            StandardDeviation::named(AppendName::new("sd")),
        ),
    )?;
    for cell in summary.to_sorted_vec() {
        println!("{}", cell.to_short_string("|"));
    }

    let moments = matrix
        .clone()
        .states(Over(Dimension::Second), StandardDeviation::new())?;
    let standardised = matrix.transform_with_value(Standardise::new(Dimension::Second), moments);

    let directory = std::env::temp_dir().join("cellgrid-pipeline");
    std::fs::create_dir_all(&directory)?;

    let partitions = standardised.split(BinaryHashSplit::new(Dimension::First, 10, 6, "train", "test"));
    for (label, part) in partitions.into_matrices() {
        let path = directory.join(format!("{label}.txt"));
        let written = write_cells(&path, &part.to_sorted_vec(), "|")?;
        println!("{label}: {written} cells -> {}", path.display());
    }

    Ok(())
}
