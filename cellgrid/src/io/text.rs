//! File readers and writers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use cellgrid_core::{Cell, Codec};
use tracing::{info, warn};

use super::parse::{parse_lines, Parsed};
use crate::error::{CellgridError, Result};

/// Render a cell, refusing coordinates or schemas that would not parse back
fn short_line<const K: usize>(cell: &Cell<K>, separator: &str) -> Result<String> {
    let schema = cell.content.schema().to_string();
    let fields = cell
        .position
        .coordinates()
        .iter()
        .map(ToString::to_string)
        .chain(std::iter::once(schema));
    for field in fields {
        if !separator.is_empty() && field.contains(separator) {
            return Err(CellgridError::Separator {
                field,
                separator: separator.to_string(),
            });
        }
    }
    Ok(cell.to_short_string(separator))
}

/// Write one cell per line in short form; returns the number of cells written.
///
/// Fails before writing a cell whose coordinates or schema contain the
/// separator.
pub fn write_cells<P: AsRef<Path>, const K: usize>(
    path: P,
    cells: &[Cell<K>],
    separator: &str,
) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(&path)?);
    for cell in cells {
        writeln!(writer, "{}", short_line(cell, separator)?)?;
    }
    writer.flush()?;

    info!(path = %path.as_ref().display(), cells = cells.len(), "wrote cells");
    Ok(cells.len())
}

#[cfg(feature = "mmap")]
fn with_text<P: AsRef<Path>, T>(path: P, f: impl FnOnce(&str) -> T) -> Result<T> {
    use memmap2::MmapOptions;

    let file = File::open(&path)?;
    // Mapping an empty file fails on some platforms
    if file.metadata()?.len() == 0 {
        return Ok(f(""));
    }

    // SAFETY: the mapping is read-only and dropped before this function
    // returns. Concurrent truncation of the file by another process is not
    // guarded against.
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    let text = std::str::from_utf8(&mmap)?;
    Ok(f(text))
}

#[cfg(not(feature = "mmap"))]
fn with_text<P: AsRef<Path>, T>(path: P, f: impl FnOnce(&str) -> T) -> Result<T> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|error| error.utf8_error())?;
    Ok(f(&text))
}

/// Read a whole file as UTF-8 text
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    with_text(path, str::to_owned)
}

/// Read and parse a cell file written by [`write_cells`]
pub fn load_cells<P: AsRef<Path>, const K: usize>(
    path: P,
    separator: &str,
    codecs: &[Arc<dyn Codec>; K],
) -> Result<Parsed<K>> {
    let parsed = with_text(&path, |text| parse_lines(text, separator, codecs))?;

    if parsed.errors.is_empty() {
        info!(path = %path.as_ref().display(), cells = parsed.cells.len(), "loaded cells");
    } else {
        warn!(
            path = %path.as_ref().display(),
            cells = parsed.cells.len(),
            errors = parsed.errors.len(),
            "loaded cells with unparsable lines"
        );
    }
    Ok(parsed)
}

/// Write one JSON object per cell
#[cfg(feature = "serde")]
pub fn write_json_lines<P: AsRef<Path>, const K: usize>(path: P, cells: &[Cell<K>]) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(&path)?);
    for cell in cells {
        serde_json::to_writer(&mut writer, cell)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!(path = %path.as_ref().display(), cells = cells.len(), "wrote JSON lines");
    Ok(cells.len())
}

/// Read cells written by [`write_json_lines`]; the first bad line is an error
#[cfg(feature = "serde")]
pub fn read_json_lines<P: AsRef<Path>, const K: usize>(path: P) -> Result<Vec<Cell<K>>> {
    with_text(path, |text| {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str::<Cell<K>>)
            .collect::<std::result::Result<Vec<_>, _>>()
    })?
    .map_err(Into::into)
}

/// Write one cell per line in short form without blocking the runtime
#[cfg(feature = "async")]
pub async fn write_cells_async<P: AsRef<Path>, const K: usize>(
    path: P,
    cells: &[Cell<K>],
    separator: &str,
) -> Result<usize> {
    use tokio::io::AsyncWriteExt;

    let file = tokio::fs::File::create(&path).await?;
    let mut writer = tokio::io::BufWriter::new(file);
    for cell in cells {
        let mut line = short_line(cell, separator)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
    }
    writer.flush().await?;

    info!(path = %path.as_ref().display(), cells = cells.len(), "wrote cells");
    Ok(cells.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::codecs;
    use cellgrid_core::{position, Content, ValueKind};

    fn cells() -> Vec<Cell<2>> {
        vec![
            Cell::new(position!["iris-1", "sepal"], Content::continuous(5.1)),
            Cell::new(position!["iris-1", "species"], Content::nominal("setosa")),
            Cell::new(position!["iris-2", "petal"], Content::discrete(2)),
        ]
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cells.txt");

        assert_eq!(write_cells(&path, &cells(), "|").expect("write"), 3);

        let parsed = load_cells(&path, "|", &codecs([ValueKind::Text; 2])).expect("load");
        assert!(parsed.is_clean());
        assert_eq!(parsed.cells, cells());
    }

    #[test]
    fn test_write_rejects_separator_in_coordinate() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cells.txt");
        let ambiguous = vec![Cell::new(position!["a|b", "x"], Content::continuous(1.0))];

        assert!(matches!(
            write_cells(&path, &ambiguous, "|"),
            Err(CellgridError::Separator { ref field, .. }) if field == "a|b"
        ));

        // A different separator keeps the coordinate intact
        write_cells(&path, &ambiguous, ";").expect("write");
        let parsed = load_cells(&path, ";", &codecs([ValueKind::Text; 2])).expect("load");
        assert_eq!(parsed.cells, ambiguous);

        // Values are the tail of the line and may hold the separator
        let text = vec![Cell::new(position!["a", "x"], Content::nominal("p|q"))];
        write_cells(&path, &text, "|").expect("write");
        let parsed = load_cells(&path, "|", &codecs([ValueKind::Text; 2])).expect("load");
        assert_eq!(parsed.cells, text);
    }

    #[test]
    fn test_load_reports_bad_lines() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cells.txt");
        std::fs::write(&path, "1|real|continuous|1.5\nx|real|continuous|2.5\n").expect("write");

        let parsed = load_cells(&path, "|", &codecs([ValueKind::Integer])).expect("load");
        assert_eq!(parsed.cells.len(), 1);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
    }

    #[test]
    fn test_read_text_edge_cases() {
        let dir = tempfile::tempdir().expect("temp dir");

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "").expect("write");
        assert_eq!(read_text(&empty).expect("read"), "");

        let binary = dir.path().join("binary.bin");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).expect("write");
        assert!(matches!(read_text(&binary), Err(CellgridError::Utf8(_))));

        let missing = dir.path().join("missing.txt");
        assert!(matches!(read_text(&missing), Err(CellgridError::Io(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_lines() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cells.jsonl");

        write_json_lines(&path, &cells()).expect("write");
        let read: Vec<Cell<2>> = read_json_lines(&path).expect("read");
        assert_eq!(read, cells());

        assert!(matches!(
            read_json_lines::<_, 3>(&path),
            Err(CellgridError::Json(_))
        ));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_write_cells_async() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cells.txt");

        let written = write_cells_async(&path, &cells(), "|").await.expect("write");
        assert_eq!(written, 3);

        let text = read_text(&path).expect("read");
        assert_eq!(text.lines().next(), Some("iris-1|sepal|real|continuous|5.1"));
    }
}
