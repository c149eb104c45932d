use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, Mode};
use crate::components::dialog::DialogWidget;
use crate::components::info::InfoWidget;
use crate::components::listing::ListingWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::viewer::ViewerWidget;
use crate::theme::ThemeColors;

/// Render the application UI.
pub fn render(app: &mut App, theme: &ThemeColors, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());
    let (body, status_area) = (chunks[0], chunks[1]);

    let status_path = match app.mode {
        Mode::Viewing(_) => render_viewer(app, theme, frame, body),
        _ => {
            render_browser(app, theme, frame, body);
            app.directory.cwd().to_string()
        }
    };

    let mut status = StatusBarWidget::new(&status_path, theme)
        .viewing(matches!(app.mode, Mode::Viewing(_)));
    if let Some(label) = app.busy.as_deref() {
        status = status.busy(label);
    }
    if let Some(msg) = &app.status_message {
        status = status.status_message(&msg.text, msg.is_error);
    }
    frame.render_widget(status, status_area);

    if let Mode::Prompting(ref prompt) = app.mode {
        frame.render_widget(DialogWidget::new(prompt, theme), frame.area());
    }
}

fn panel<'a>(title: String, theme: &ThemeColors, focused: bool) -> Block<'a> {
    let fg = if focused {
        theme.border_focused_fg
    } else {
        theme.border_fg
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(fg))
}

/// Listing on the left, info panel on the right.
fn render_browser(app: &mut App, theme: &ThemeColors, frame: &mut Frame, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // The scroll window follows the real panel height.
    app.directory
        .set_viewport_height(halves[0].height.saturating_sub(2) as usize);

    let listing_block = panel(format!(" {} ", app.directory.cwd()), theme, true);
    frame.render_widget(
        ListingWidget::new(&app.directory, theme).block(listing_block),
        halves[0],
    );

    let lines = app.info_lines();
    frame.render_widget(
        InfoWidget::new(&lines, theme).block(panel(" Info ".to_string(), theme, false)),
        halves[1],
    );
}

/// Full-screen viewer. Returns the path shown in the status bar.
fn render_viewer(app: &mut App, theme: &ThemeColors, frame: &mut Frame, area: Rect) -> String {
    let height = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;
    app.viewer_height = height.max(1);

    let Mode::Viewing(ref viewer) = app.mode else {
        return String::new();
    };
    let path = viewer.path().display().to_string();
    let is_text = viewer.is_text();
    let title = format!(
        " {} [{}, {} bytes] {} {} ",
        path,
        if is_text { "text" } else { "binary" },
        viewer.file_len(),
        if is_text { "line" } else { "row" },
        viewer.page_start() + 1
    );

    match app.viewer_rows(height, width) {
        Some(rows) => {
            frame.render_widget(
                ViewerWidget::new(&rows, is_text, theme).block(panel(title, theme, true)),
                area,
            );
            path
        }
        None => {
            render_browser(app, theme, frame, area);
            app.directory.cwd().to_string()
        }
    }
}
