//! A formatter writing one delimited line per row.

use std::fmt::Display;
use std::io::Write;

use tessera_core::Point;
use tessera_grid::{Occupant, Payload};

use crate::error::RenderError;
use crate::formatter::GridFormatter;

/// Writes each row as one line of delimiter-separated cells.
///
/// A cell's text is the concatenation of its occupants' labels, falling
/// back to their payloads' `Display` output. Text containing the
/// delimiter, a double quote, or a line break is wrapped in double quotes
/// with inner quotes doubled.
///
/// ```
/// use tessera_core::Point;
/// use tessera_grid::{Grid, Occupant};
/// use tessera_render::{DelimitedFormatter, GridWriter};
///
/// let grid = Grid::new(3, 2).unwrap();
/// grid.insert(&Occupant::from_payload('x', Point::new(1, 0), [])).unwrap();
///
/// let mut out = DelimitedFormatter::new(Vec::new()).with_delimiter(',');
/// GridWriter::write(&grid, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out.into_inner()).unwrap(), ",x,\n,,\n");
/// ```
#[derive(Debug)]
pub struct DelimitedFormatter<W> {
    out: W,
    delimiter: char,
    text: String,
}

impl<W: Write> DelimitedFormatter<W> {
    /// A tab-delimited formatter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            delimiter: '\t',
            text: String::new(),
        }
    }

    /// Use `delimiter` between cells.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// The delimiter in use.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn needs_quoting(&self) -> bool {
        self.text
            .chars()
            .any(|c| c == self.delimiter || c == '"' || c == '\n' || c == '\r')
    }
}

fn occupant_text<T: Payload + Display>(occupant: &Occupant<T>) -> String {
    occupant.label().unwrap_or_else(|| {
        occupant.with_payload(|payload| payload.map(ToString::to_string).unwrap_or_default())
    })
}

impl<W, T> GridFormatter<T> for DelimitedFormatter<W>
where
    W: Write,
    T: Payload + Display,
{
    type Error = RenderError;

    fn cell(
        &mut self,
        _position: Point,
        index: usize,
        occupants: &[Occupant<T>],
    ) -> Result<(), RenderError> {
        if index > 0 {
            write!(self.out, "{}", self.delimiter)?;
        }
        self.text.clear();
        for occupant in occupants {
            self.text.push_str(&occupant_text(occupant));
        }
        if self.needs_quoting() {
            write!(self.out, "\"{}\"", self.text.replace('"', "\"\""))?;
        } else {
            self.out.write_all(self.text.as_bytes())?;
        }
        Ok(())
    }

    fn end_row(&mut self) -> Result<(), RenderError> {
        writeln!(self.out)?;
        Ok(())
    }

    fn end_grid(&mut self) -> Result<(), RenderError> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_grid::{Grid, GridConfig};

    use crate::writer::GridWriter;

    fn render<T: Payload + Display>(grid: &Grid<T>, delimiter: char) -> String {
        let mut out = DelimitedFormatter::new(Vec::new()).with_delimiter(delimiter);
        GridWriter::write(grid, &mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn tab_is_the_default_delimiter() {
        let grid: Grid<u8> = Grid::new(2, 1).unwrap();
        grid.place(1, 0, 0).unwrap();
        assert_eq!(DelimitedFormatter::new(Vec::new()).delimiter(), '\t');
        assert_eq!(render(&grid, '\t'), "1\t\n");
    }

    #[test]
    fn labels_take_precedence_over_payloads() {
        let grid = Grid::new(2, 1).unwrap();
        grid.insert(&Occupant::from_payload(5u32, Point::new(0, 0), []).with_label("five"))
            .unwrap();
        grid.place(6u32, 1, 0).unwrap();
        assert_eq!(render(&grid, ';'), "five;6\n");
    }

    #[test]
    fn overlapping_occupants_concatenate() {
        let grid = Grid::with_config(GridConfig::new(1, 1).with_overlapping(true)).unwrap();
        grid.place("a", 0, 0).unwrap();
        grid.place("b", 0, 0).unwrap();
        assert_eq!(render(&grid, ','), "ab\n");
    }

    #[test]
    fn delimiter_and_quotes_are_escaped() {
        let grid = Grid::new(2, 1).unwrap();
        grid.place("x,y", 0, 0).unwrap();
        grid.place("say \"hi\"", 1, 0).unwrap();
        assert_eq!(render(&grid, ','), "\"x,y\",\"say \"\"hi\"\"\"\n");
    }
}
