//! RevealText Widget
//!
//! Draws [`RevealCell`]s: each character is tinted by its opacity and, while
//! its offset is still above half a row, drawn one row lower so it appears
//! to slide up into place.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

use masq_core::animation::RevealCell;

use crate::theme;

/// Opacity below which a character is not drawn at all
const MIN_VISIBLE_OPACITY: f32 = 0.05;

/// Break cells into rows of at most `width` columns
///
/// Newlines start a new row and are not drawn.
pub fn layout_rows(cells: &[RevealCell], width: u16) -> Vec<Vec<RevealCell>> {
    let width = width.max(1) as usize;
    let mut rows = vec![Vec::new()];
    let mut used = 0usize;

    for cell in cells {
        if cell.ch == '\n' {
            rows.push(Vec::new());
            used = 0;
            continue;
        }
        let w = cell.ch.width().unwrap_or(0);
        if used + w > width && used > 0 {
            rows.push(Vec::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(*cell);
        }
        used += w;
    }

    rows
}

/// Per-character animated text
pub struct RevealText<'a> {
    cells: &'a [RevealCell],
    color: Color,
    modifier: Modifier,
    centered: bool,
}

impl<'a> RevealText<'a> {
    pub fn new(cells: &'a [RevealCell]) -> Self {
        Self {
            cells,
            color: theme::PHOSPHOR,
            modifier: Modifier::empty(),
            centered: false,
        }
    }

    /// Fully revealed color
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Center each row horizontally
    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

impl<'a> Widget for RevealText<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let rows = layout_rows(self.cells, area.width);
        let bottom = area.y + area.height;

        for (r, row) in rows.iter().take(area.height as usize).enumerate() {
            let row_width: u16 = row
                .iter()
                .map(|c| c.ch.width().unwrap_or(0) as u16)
                .sum();
            let mut x = if self.centered {
                area.x + (area.width.saturating_sub(row_width)) / 2
            } else {
                area.x
            };
            let y = area.y + r as u16;

            for cell in row {
                let w = cell.ch.width().unwrap_or(0) as u16;
                if cell.opacity >= MIN_VISIBLE_OPACITY {
                    let draw_y = if cell.offset >= 0.5 { y + 1 } else { y };
                    if draw_y < bottom {
                        let style = Style::default()
                            .fg(theme::fade(self.color, cell.opacity))
                            .add_modifier(self.modifier);
                        buf.set_stringn(x, draw_y, cell.ch.to_string(), w as usize, style);
                    }
                }
                x += w;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cells(text: &str, opacity: f32, offset: f32) -> Vec<RevealCell> {
        text.chars()
            .map(|ch| RevealCell {
                ch,
                opacity,
                offset,
            })
            .collect()
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_layout_rows_wraps_and_breaks() {
        let rows = layout_rows(&cells("abcdef\ngh", 1.0, 0.0), 4);
        let text: Vec<String> = rows
            .iter()
            .map(|r| r.iter().map(|c| c.ch).collect())
            .collect();
        assert_eq!(text, vec!["abcd", "ef", "gh"]);
    }

    #[test]
    fn test_settled_text_renders_in_place() {
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);

        RevealText::new(&cells("hi", 1.0, 0.0))
            .centered()
            .render(area, &mut buf);

        assert_eq!(row(&buf, 0), "  hi  ");
        assert_eq!(buf[(2, 0)].fg, theme::PHOSPHOR);
    }

    #[test]
    fn test_invisible_cells_skipped() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);

        RevealText::new(&cells("ab", 0.0, 1.0)).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "    ");
    }

    #[test]
    fn test_rising_cells_drawn_below() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);

        RevealText::new(&cells("ab", 0.5, 0.8)).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "    ");
        assert_eq!(row(&buf, 1), "ab  ");
    }
}
