use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const BROWSE_HINTS: &str = " r:ren c:cp m:mv d:del n:new /:find q:quit ";
const VIEW_HINTS: &str = " PgUp/PgDn:page e:exit ";

/// Status bar: current path, busy indicator and key hints, or a status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    busy: Option<&'a str>,
    viewing: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            theme,
            status_message: None,
            is_error: false,
            busy: None,
            viewing: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn busy(mut self, label: &'a str) -> Self {
        self.busy = Some(label);
        self
    }

    /// Show viewer key hints instead of browser ones.
    pub fn viewing(mut self, viewing: bool) -> Self {
        self.viewing = viewing;
        self
    }
}

/// Keep the last `budget` characters, prefixed with `...` when cut.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().take(budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                Style::default().fg(self.theme.success_fg)
            };

            let display: String = msg.chars().take(width).collect();
            let pad = width.saturating_sub(display.chars().count());
            let line = Line::from(Span::styled(
                format!("{}{}", display, " ".repeat(pad)),
                style,
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [path] [busy] [key_hints]
        let key_hints = if self.viewing { VIEW_HINTS } else { BROWSE_HINTS };
        let busy = self.busy.map(|b| format!(" {} ", b)).unwrap_or_default();
        let fixed = key_hints.chars().count() + busy.chars().count();
        let path_display = truncate_left(self.path_str, width.saturating_sub(fixed));

        let used = path_display.chars().count() + fixed;
        let gap = width.saturating_sub(used);

        let spans = vec![
            Span::styled(path_display, Style::default().fg(self.theme.status_fg)),
            Span::raw(" ".repeat(gap)),
            Span::styled(
                busy,
                Style::default()
                    .fg(self.theme.warning_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                key_hints,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ),
        ];

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn content(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_status_message_success() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/path/", &tc).status_message("Copied a to /b", false);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(content(&buf, 80).contains("Copied a to /b"));
        assert_eq!(buf.cell((0, 0)).expect("cell").fg, tc.success_fg);
    }

    #[test]
    fn test_status_message_error() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/path/", &tc).status_message("Permission denied", true);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(content(&buf, 80).contains("Permission denied"));
        assert_eq!(buf.cell((0, 0)).expect("cell").bg, tc.error_fg);
    }

    #[test]
    fn test_normal_bar_rendering() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/home/user/project/", &tc);

        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let text = content(&buf, 100);
        assert!(text.starts_with("/home/user/project/"));
        assert!(text.contains("r:ren"));
        assert!(text.contains("q:quit"));
    }

    #[test]
    fn test_busy_indicator_displayed() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/path/", &tc).busy("Copying big.iso…");

        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(content(&buf, 100).contains("Copying big.iso"));
    }

    #[test]
    fn test_viewer_hints() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/path/file", &tc).viewing(true);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let text = content(&buf, 80);
        assert!(text.contains("e:exit"));
        assert!(!text.contains("r:ren"));
    }

    #[test]
    fn test_long_path_truncated_from_left() {
        assert_eq!(truncate_left("/a/b/c/d/e", 7), ".../d/e");
        assert_eq!(truncate_left("/a", 7), "/a");
        assert_eq!(truncate_left("/abc", 2), "/a");
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let widget = StatusBarWidget::new("/path", &tc);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
