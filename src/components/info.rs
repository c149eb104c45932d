use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;

/// Info panel: one `Label: value` line per row, labels highlighted.
pub struct InfoWidget<'a> {
    lines: &'a [String],
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> InfoWidget<'a> {
    pub fn new(lines: &'a [String], theme: &'a ThemeColors) -> Self {
        Self {
            lines,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }
}

impl<'a> Widget for InfoWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let label_style = Style::default()
            .fg(self.theme.info_label_fg)
            .add_modifier(Modifier::BOLD);
        let value_style = Style::default().fg(self.theme.list_fg);

        for (i, text) in self.lines.iter().take(inner.height as usize).enumerate() {
            let line = match text.split_once(": ") {
                Some((label, value)) => Line::from(vec![
                    Span::styled(format!("{}: ", label), label_style),
                    Span::styled(value, value_style),
                ]),
                None => Line::from(Span::styled(
                    text.as_str(),
                    value_style.add_modifier(Modifier::ITALIC),
                )),
            };
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn row(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn renders_label_value_lines() {
        let tc = theme::dark_theme();
        let lines = vec!["Name: notes".to_string(), "Type: File".to_string()];
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        InfoWidget::new(&lines, &tc).render(area, &mut buf);

        assert!(row(&buf, 0, 30).starts_with("Name: notes"));
        assert!(row(&buf, 1, 30).starts_with("Type: File"));
        assert_eq!(buf.cell((0, 0)).expect("cell").fg, tc.info_label_fg);
        assert_eq!(buf.cell((6, 0)).expect("cell").fg, tc.list_fg);
    }

    #[test]
    fn plain_line_is_rendered() {
        let tc = theme::dark_theme();
        let lines = vec!["Press Enter to go back".to_string()];
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        InfoWidget::new(&lines, &tc).render(area, &mut buf);
        assert!(row(&buf, 0, 30).contains("Press Enter to go back"));
    }

    #[test]
    fn lines_beyond_height_are_dropped() {
        let tc = theme::dark_theme();
        let lines: Vec<String> = (0..5).map(|i| format!("Line: {}", i)).collect();
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        InfoWidget::new(&lines, &tc).render(area, &mut buf);
        assert!(row(&buf, 1, 20).contains("Line: 1"));
    }
}
