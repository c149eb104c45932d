//! Built-in color palettes and their selection from config.

use ratatui::style::Color;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Listing panel
    pub list_fg: Color,
    pub list_selected_bg: Color,
    pub list_selected_fg: Color,
    pub list_dir_fg: Color,
    pub list_file_fg: Color,
    pub list_marker_fg: Color,

    // Info panel and viewer
    pub info_label_fg: Color,
    pub viewer_fg: Color,
    pub viewer_offset_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using the Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        list_fg: Color::Rgb(205, 214, 244),          // #cdd6f4 (text)
        list_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        list_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        list_dir_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        list_file_fg: Color::Rgb(205, 214, 244),     // #cdd6f4
        list_marker_fg: Color::Rgb(108, 112, 134),   // #6c7086 (overlay0)

        info_label_fg: Color::Rgb(203, 166, 247),   // #cba6f7 (mauve)
        viewer_fg: Color::Rgb(205, 214, 244),
        viewer_offset_fg: Color::Rgb(108, 112, 134),

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),           // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)

        dialog_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        dim_fg: Color::Rgb(108, 112, 134),
    }
}

/// Light theme using the Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        list_fg: Color::Rgb(76, 79, 105),             // #4c4f69 (text)
        list_selected_bg: Color::Rgb(204, 208, 218),  // #ccd0da (surface0)
        list_selected_fg: Color::Rgb(76, 79, 105),
        list_dir_fg: Color::Rgb(30, 102, 245),        // #1e66f5 (blue)
        list_file_fg: Color::Rgb(76, 79, 105),
        list_marker_fg: Color::Rgb(140, 143, 161),    // #8c8fa1 (overlay1)

        info_label_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)
        viewer_fg: Color::Rgb(76, 79, 105),
        viewer_offset_fg: Color::Rgb(140, 143, 161),

        status_bg: Color::Rgb(230, 233, 239), // #e6e9ef (mantle)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),

        dialog_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        success_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        dim_fg: Color::Rgb(140, 143, 161),
    }
}

/// Pick the palette for a `[theme] scheme` value. Unknown names fall back to dark.
pub fn resolve_theme(scheme: &str) -> ThemeColors {
    match scheme {
        "light" => light_theme(),
        _ => dark_theme(),
    }
}
