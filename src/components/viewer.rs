use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;
use crate::viewer::OFFSET_COLUMN;

/// Full-screen file viewer. Rows are produced by `ViewerState::rows`.
pub struct ViewerWidget<'a> {
    rows: &'a [String],
    is_text: bool,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> ViewerWidget<'a> {
    pub fn new(rows: &'a [String], is_text: bool, theme: &'a ThemeColors) -> Self {
        Self {
            rows,
            is_text,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn hex_line(&self, row: &'a str) -> Line<'a> {
        let split = row
            .char_indices()
            .nth(OFFSET_COLUMN)
            .map(|(i, _)| i)
            .unwrap_or(row.len());
        let (offset, bytes) = row.split_at(split);
        Line::from(vec![
            Span::styled(offset, Style::default().fg(self.theme.viewer_offset_fg)),
            Span::styled(bytes, Style::default().fg(self.theme.viewer_fg)),
        ])
    }
}

impl<'a> Widget for ViewerWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        for (i, row) in self.rows.iter().take(inner.height as usize).enumerate() {
            let line = if self.is_text {
                Line::from(Span::styled(
                    row.as_str(),
                    Style::default().fg(self.theme.viewer_fg),
                ))
            } else {
                self.hex_line(row)
            };
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}
