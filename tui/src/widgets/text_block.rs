//! TextBlock Widget
//!
//! A borderless, scrollable, optionally centered text region. Used for the
//! conversion result, which can run to many lines for long token lists.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines
    pub total_lines: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: i32) {
        let new_offset = self.scroll_offset as i32 + delta;
        self.scroll_offset = new_offset.max(0) as usize;
    }

    /// Back to the first line
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    /// Whether content extends past the visible height
    pub fn overflows(&self, height: u16) -> bool {
        self.total_lines > height as usize
    }
}

/// Wrap `content` to `width` columns, keeping blank lines
pub fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    content
        .lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect()
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
    centered: bool,
}

impl<'a> TextBlock<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
            centered: false,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Center each line horizontally
    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

impl<'a> StatefulWidget for TextBlock<'a> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let wrapped = wrap_lines(self.content, area.width as usize);
        state.total_lines = wrapped.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(area.height as usize);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        // Render visible lines
        for (i, line) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            let x = if self.centered {
                let width = (line.width() as u16).min(area.width);
                area.x + (area.width - width) / 2
            } else {
                area.x
            };
            buf.set_stringn(x, y, line, area.width as usize, self.style);
        }
    }
}
