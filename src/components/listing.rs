use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::directory::DirectoryState;
use crate::fs::lister::Entry;
use crate::theme::ThemeColors;

/// Renders the visible slice of a directory listing with the selection highlighted.
pub struct ListingWidget<'a> {
    directory: &'a DirectoryState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> ListingWidget<'a> {
    pub fn new(directory: &'a DirectoryState, theme: &'a ThemeColors) -> Self {
        Self {
            directory,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn indicator(entry: &Entry) -> &'static str {
        if entry.is_parent_marker || entry.is_placeholder {
            "    "
        } else if entry.is_dir() {
            "[D] "
        } else {
            "[F] "
        }
    }

    fn entry_style(&self, entry: &Entry, selected: bool) -> Style {
        if selected {
            return Style::default()
                .bg(self.theme.list_selected_bg)
                .fg(self.theme.list_selected_fg)
                .add_modifier(Modifier::BOLD);
        }
        if entry.is_parent_marker {
            Style::default().fg(self.theme.list_marker_fg)
        } else if entry.is_placeholder {
            Style::default()
                .fg(self.theme.list_marker_fg)
                .add_modifier(Modifier::ITALIC)
        } else if entry.is_dir() {
            Style::default()
                .fg(self.theme.list_dir_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.list_file_fg)
        }
    }
}

impl<'a> Widget for ListingWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner_area.height == 0 || inner_area.width == 0 {
            return;
        }

        let first = self.directory.scroll_top();
        let selected = self.directory.selected();

        for (i, entry) in self
            .directory
            .visible()
            .iter()
            .take(inner_area.height as usize)
            .enumerate()
        {
            let y = inner_area.y + i as u16;
            let is_selected = first + i == selected;
            let style = self.entry_style(entry, is_selected);

            // Pad the selected row so the highlight spans the panel.
            let mut text = format!("{}{}", Self::indicator(entry), entry.name);
            if is_selected {
                let width = inner_area.width as usize;
                let len = text.chars().count();
                if len < width {
                    text.push_str(&" ".repeat(width - len));
                }
            }
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
