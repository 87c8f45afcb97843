//! Paint an element's visible text to a terminal.
//!
//! Lines are wrapped exactly as the layout measured them and clipped to the
//! element's box, so what is painted is what the engine fit.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::dom::{Document, NodeId};
use crate::layout::wrap_words;

/// Paint `node` with its top-left corner at `(x, y)`.
///
/// Each row of the box is cleared to the end of the line before text is
/// printed. Returns the number of rows painted. Nothing is flushed; the
/// caller owns the writer.
pub fn paint<W: Write>(doc: &mut Document, node: NodeId, x: u16, y: u16, out: &mut W) -> io::Result<u16> {
    let Some(b) = doc.layout_box(node).map_err(io::Error::other)? else {
        return Ok(0);
    };

    let text = doc.inner_text(node).map_err(io::Error::other)?;
    let lines = wrap_words(&text, b.content_width() as usize);
    let line_height = u32::from(b.line_height.max(1));
    let rows = b.content_height();
    let height = u16::try_from(b.height).unwrap_or(u16::MAX);

    for row in 0..height {
        queue!(out, MoveTo(x, y.saturating_add(row)), Clear(ClearType::UntilNewLine))?;
    }

    let top = y.saturating_add(b.padding);
    let mut painted = 0u16;
    for (i, line) in lines.iter().enumerate() {
        let offset = u32::try_from(i).unwrap_or(u32::MAX).saturating_mul(line_height);
        if offset >= rows {
            break;
        }
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        queue!(
            out,
            MoveTo(x.saturating_add(b.padding), top.saturating_add(offset)),
            Print(line)
        )?;
        painted = painted.saturating_add(1);
    }

    Ok(painted)
}
