use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::prompt::{Prompt, PromptKind};
use crate::theme::ThemeColors;

/// Centered modal overlay for the active prompt.
pub struct DialogWidget<'a> {
    prompt: &'a Prompt,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(prompt: &'a Prompt, theme: &'a ThemeColors) -> Self {
        Self { prompt, theme }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(x, y, w, h)
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = self.prompt.title();
        let dialog_width = (title.chars().count() as u16 + 6)
            .max(50)
            .min(area.width.saturating_sub(4));
        let rect = Self::centered_rect(dialog_width, 5, area);

        Clear.render(rect, buf);

        let border_fg = match self.prompt.kind() {
            PromptKind::FreeText => self.theme.dialog_border_fg,
            PromptKind::Confirm => self.theme.warning_fg,
        };
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));

        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let hint = match self.prompt.kind() {
            PromptKind::FreeText => {
                render_input(self.prompt, self.theme, inner, buf);
                "[Enter] Confirm  [Esc] Cancel"
            }
            PromptKind::Confirm => "[y] Yes  [n] No",
        };

        if inner.height > 1 {
            let hint_line = Line::from(Span::styled(
                hint,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ));
            buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
        }
    }
}

/// Input line with a block cursor after the text. Long input scrolls left.
fn render_input(prompt: &Prompt, theme: &ThemeColors, inner: Rect, buf: &mut Buffer) {
    let max_width = (inner.width as usize).saturating_sub(1);
    let skip = prompt.cursor_len().saturating_sub(max_width);
    let visible: String = prompt.buffer().chars().skip(skip).collect();

    let spans = vec![
        Span::styled(visible, Style::default().fg(theme.list_fg)),
        Span::styled(
            " ",
            Style::default()
                .bg(theme.list_fg)
                .fg(theme.dialog_bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    buf.set_line(inner.x, inner.y + inner.height / 2, &Line::from(spans), inner.width);
}
