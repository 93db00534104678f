use core::fmt;

use crate::*;

/// Player view: `#` hidden, `F` flagged, `*` mine, digits for counts.
impl fmt::Display for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells().rows() {
            for cell in row {
                match cell.visibility {
                    Visibility::Hidden => f.write_str("# ")?,
                    Visibility::Flagged => f.write_str("F ")?,
                    Visibility::Revealed => write!(f, "{} ", ContentSymbol(cell.content))?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Every cell's content with the mask ignored, for debugging.
#[derive(Copy, Clone, Debug)]
pub struct BoardDump<'a>(pub &'a GameBoard);

impl fmt::Display for BoardDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.snapshot().rows() {
            for &content in row {
                write!(f, "{} ", ContentSymbol(content))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

struct ContentSymbol(CellContent);

impl fmt::Display for ContentSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            CellContent::Mine => f.write_str("*"),
            CellContent::Count(count) => write!(f, "{count}"),
        }
    }
}
