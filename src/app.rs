use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::fs::directory::{DirectoryState, Enter};
use crate::fs::lister::ListOptions;
use crate::fs::operations::{self, DEFAULT_MAX_DEPTH};
use crate::fs::path::{validate_name, DirPath};
use crate::prompt::{Prompt, PromptInput, PromptStep, Purpose};
use crate::search;
use crate::viewer::{ViewerOptions, ViewerState};
use crate::worker::{Task, TaskOutcome};

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Viewer page height used until the renderer reports the real one.
const DEFAULT_VIEWER_HEIGHT: usize = 20;

/// Application mode.
#[derive(Debug, Default)]
pub enum Mode {
    #[default]
    Browsing,
    Viewing(ViewerState),
    Prompting(Prompt),
}

/// Logical user actions, decoded from keys by the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Enter,
    Quit,
    Rename,
    Copy,
    Move,
    Delete,
    Create,
    Search,
    PageUp,
    PageDown,
    ViewerExit,
    Char(char),
    Backspace,
    ConfirmYes,
    ConfirmNo,
    Cancel,
}

/// Runtime settings resolved from the config.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub list: ListOptions,
    pub viewer: ViewerOptions,
    pub max_depth: usize,
    pub confirm_delete: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            list: ListOptions::default(),
            viewer: ViewerOptions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            confirm_delete: true,
        }
    }
}

impl From<&AppConfig> for Settings {
    fn from(config: &AppConfig) -> Self {
        Self {
            list: config.list_options(),
            viewer: config.viewer_options(),
            max_depth: config.max_depth(),
            confirm_delete: config.confirm_delete(),
        }
    }
}

/// A transient message for the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

/// Main application state.
pub struct App {
    pub directory: DirectoryState,
    pub mode: Mode,
    pub should_quit: bool,
    pub status_message: Option<StatusMessage>,
    /// Label of the in-flight copy or move, if any.
    pub busy: Option<String>,
    /// Rows available to the viewer, reported by the renderer.
    pub viewer_height: usize,
    settings: Settings,
    pending_tasks: Vec<Task>,
    /// Directory whose size scan is in flight. At most one runs at a time.
    sizing: Option<PathBuf>,
    size_failed: HashSet<PathBuf>,
}

impl App {
    /// Create a new App listing `start`.
    pub fn new(start: &Path, settings: Settings) -> Result<Self> {
        let cwd = DirPath::new(start)?;
        let directory = DirectoryState::load(cwd, settings.list)?;
        let mut app = Self {
            directory,
            mode: Mode::Browsing,
            should_quit: false,
            status_message: None,
            busy: None,
            viewer_height: DEFAULT_VIEWER_HEIGHT,
            settings,
            pending_tasks: Vec::new(),
            sizing: None,
            size_failed: HashSet::new(),
        };
        app.request_size();
        Ok(app)
    }

    /// Set an informational status message.
    pub fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: msg.into(),
            is_error: false,
            created: Instant::now(),
        });
    }

    /// Set an error status message.
    pub fn set_error(&mut self, err: &AppError) {
        warn!(error = %err, "operation failed");
        self.status_message = Some(StatusMessage {
            text: err.to_string(),
            is_error: true,
            created: Instant::now(),
        });
    }

    /// Clear the status message once it has been displayed long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some(ref status) = self.status_message {
            if status.created.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
            }
        }
    }

    /// Drain the tasks queued since the last call.
    pub fn take_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.pending_tasks)
    }

    /// Apply one action to the current mode.
    pub fn dispatch(&mut self, action: Action) {
        match self.mode {
            Mode::Browsing => self.browse(action),
            Mode::Viewing(_) => self.view(action),
            Mode::Prompting(_) => self.prompt(action),
        }
    }

    fn browse(&mut self, action: Action) {
        match action {
            Action::Up => self.move_selection(-1),
            Action::Down => self.move_selection(1),
            Action::PageUp => self.move_selection(-(self.directory.viewport_height() as isize)),
            Action::PageDown => self.move_selection(self.directory.viewport_height() as isize),
            Action::Enter => self.enter_selected(),
            Action::Quit => self.should_quit = true,
            Action::Search => self.mode = Mode::Prompting(Prompt::new(Purpose::Search)),
            Action::Create => {
                if self.ensure_idle() {
                    self.mode = Mode::Prompting(Prompt::new(Purpose::Create));
                }
            }
            Action::Rename => {
                if let Some(target) = self.mutation_target() {
                    let name = self
                        .directory
                        .selected_entry()
                        .map(|e| e.name.clone())
                        .unwrap_or_default();
                    self.mode = Mode::Prompting(Prompt::with_text(Purpose::Rename { target }, &name));
                }
            }
            Action::Delete => {
                if let Some(target) = self.mutation_target() {
                    if self.settings.confirm_delete {
                        self.mode = Mode::Prompting(Prompt::new(Purpose::Delete { target }));
                    } else {
                        self.delete(&target);
                    }
                }
            }
            Action::Copy => {
                if let Some(source) = self.mutation_target() {
                    self.mode = Mode::Prompting(Prompt::new(Purpose::Copy { source }));
                }
            }
            Action::Move => {
                if let Some(source) = self.mutation_target() {
                    self.mode = Mode::Prompting(Prompt::new(Purpose::Move { source }));
                }
            }
            _ => {}
        }
    }

    fn view(&mut self, action: Action) {
        let height = self.viewer_height;
        let Mode::Viewing(ref mut viewer) = self.mode else {
            return;
        };
        match action {
            Action::PageDown => viewer.page_down(height),
            Action::PageUp => viewer.page_up(height),
            Action::Down => viewer.scroll_down(),
            Action::Up => viewer.scroll_up(),
            Action::ViewerExit | Action::Cancel => self.mode = Mode::Browsing,
            _ => {}
        }
    }

    fn prompt(&mut self, action: Action) {
        let input = match action {
            Action::Char(c) => PromptInput::Char(c),
            Action::Backspace => PromptInput::Backspace,
            Action::Enter => PromptInput::Enter,
            Action::ConfirmYes => PromptInput::Yes,
            Action::ConfirmNo => PromptInput::No,
            Action::Cancel => PromptInput::Cancel,
            _ => return,
        };
        let Mode::Prompting(ref mut prompt) = self.mode else {
            return;
        };
        let step = prompt.handle(input);
        if step == PromptStep::Pending {
            return;
        }
        let purpose = prompt.purpose().clone();
        self.mode = Mode::Browsing;
        self.finish_prompt(purpose, step);
    }

    fn finish_prompt(&mut self, purpose: Purpose, step: PromptStep) {
        let mut select = None;
        match (purpose, step) {
            (_, PromptStep::Cancelled) => {
                debug!("prompt cancelled");
                return;
            }
            (Purpose::Rename { target }, PromptStep::Submitted(new_name)) => {
                match validate_name(&new_name) {
                    Ok(()) => {
                        self.mode =
                            Mode::Prompting(Prompt::new(Purpose::ConfirmRename { target, new_name }))
                    }
                    Err(e) => self.set_error(&e),
                }
                return;
            }
            (Purpose::ConfirmRename { target, new_name }, PromptStep::Answered(true)) => {
                match operations::rename(&target, &new_name) {
                    Ok(_) => {
                        self.set_status_message(format!("Renamed to {}", new_name));
                        select = Some(new_name);
                    }
                    Err(e) => self.set_error(&e),
                }
            }
            (Purpose::Delete { target }, PromptStep::Answered(true)) => {
                self.delete(&target);
                return;
            }
            (Purpose::Create, PromptStep::Submitted(name)) => {
                let created = validate_name(&name)
                    .and_then(|()| operations::create_empty(&self.directory.cwd().child(&name)));
                match created {
                    Ok(()) => {
                        self.set_status_message(format!("Created {}", name));
                        select = Some(name);
                    }
                    Err(e) => self.set_error(&e),
                }
            }
            (Purpose::Copy { source }, PromptStep::Submitted(dest)) => {
                self.queue_transfer(source, &dest, false)
            }
            (Purpose::Move { source }, PromptStep::Submitted(dest)) => {
                self.queue_transfer(source, &dest, true)
            }
            (Purpose::Search, PromptStep::Submitted(term)) => {
                self.reload();
                self.search(&term);
                self.request_size();
                return;
            }
            _ => {}
        }
        self.reload();
        if let Some(name) = select {
            self.directory.select_name(&name);
        }
        self.request_size();
    }

    fn move_selection(&mut self, delta: isize) {
        self.directory.move_selection(delta);
        self.request_size();
    }

    fn enter_selected(&mut self) {
        match self.directory.enter() {
            Ok(Enter::Directory(next)) => {
                debug!(cwd = %next.cwd(), "changed directory");
                self.directory = next;
                self.size_failed.clear();
                self.request_size();
            }
            Ok(Enter::File(path)) => match ViewerState::open(&path, &self.settings.viewer) {
                Ok(viewer) => {
                    debug!(path = %path.display(), text = viewer.is_text(), "opened viewer");
                    self.mode = Mode::Viewing(viewer);
                }
                Err(e) => self.set_error(&e),
            },
            Ok(Enter::Stay) => {}
            Err(e) => self.set_error(&e),
        }
    }

    /// False (with a status message) while a copy or move is in flight.
    fn ensure_idle(&mut self) -> bool {
        match self.busy.clone() {
            Some(label) => {
                self.status_message = Some(StatusMessage {
                    text: format!("Busy: {}", label),
                    is_error: true,
                    created: Instant::now(),
                });
                false
            }
            None => true,
        }
    }

    /// Path of the selection when a mutating command may act on it.
    fn mutation_target(&mut self) -> Option<PathBuf> {
        if !self.ensure_idle() {
            return None;
        }
        let target = self.directory.selected_path();
        if target.is_none() {
            self.set_status_message("Nothing to act on");
        }
        target
    }

    fn delete(&mut self, target: &Path) {
        match operations::delete(target) {
            Ok(()) => self.set_status_message(format!("Deleted {}", file_name(target))),
            Err(e) => self.set_error(&e),
        }
        self.reload();
        self.request_size();
    }

    fn queue_transfer(&mut self, source: PathBuf, dest: &str, is_move: bool) {
        if dest.trim().is_empty() {
            self.set_error(&AppError::invalid_input("destination must not be empty"));
            return;
        }
        let dest_dir = self.directory.cwd().resolve(dest);
        let task = if is_move {
            Task::Move { source, dest_dir }
        } else {
            Task::Copy { source, dest_dir }
        };
        if task.is_mutating() {
            self.busy = Some(task.label());
        }
        self.pending_tasks.push(task);
    }

    fn search(&mut self, term: &str) {
        if term.is_empty() {
            self.set_error(&AppError::invalid_input("search term must not be empty"));
            return;
        }
        match search::find(self.directory.entries(), term) {
            Some(index) => self.directory.select(index),
            None => self.set_status_message(format!("No match for \"{}\"", term)),
        }
    }

    /// Rows for the open viewer. A read failure is reported once and closes
    /// the viewer.
    pub fn viewer_rows(&mut self, height: usize, width: usize) -> Option<Vec<String>> {
        let Mode::Viewing(ref mut viewer) = self.mode else {
            return None;
        };
        match viewer.rows(height, width) {
            Ok(rows) => Some(rows),
            Err(e) => {
                self.mode = Mode::Browsing;
                self.set_error(&e);
                None
            }
        }
    }

    /// Re-list the current directory, keeping the selection where possible.
    pub fn reload(&mut self) {
        match self.directory.reload() {
            Ok(next) => self.directory = next,
            Err(e) => self.set_error(&e),
        }
    }

    /// Queue a size scan for the selected directory unless it is cached or
    /// another scan is still running. A finished scan calls this again, so
    /// the newest selection is measured next.
    fn request_size(&mut self) {
        if self.sizing.is_some() {
            return;
        }
        let Some(entry) = self.directory.selected_entry() else {
            return;
        };
        if !entry.is_real() || !entry.is_dir() || entry.summary.is_some() {
            return;
        }
        let path = self.directory.cwd().child(&entry.name);
        if self.size_failed.contains(&path) {
            return;
        }
        self.sizing = Some(path.clone());
        self.pending_tasks.push(Task::Size {
            path,
            max_depth: self.settings.max_depth,
        });
    }

    /// Apply the result of a finished background task.
    pub fn handle_task_complete(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Copied { source, result } => {
                self.busy = None;
                self.finish_transfer("Copied", &source, result);
            }
            TaskOutcome::Moved { source, result } => {
                self.busy = None;
                self.finish_transfer("Moved", &source, result);
            }
            TaskOutcome::Sized { path, result } => {
                self.sizing = None;
                match result {
                    Ok(summary) => {
                        if summary.skipped > 0 {
                            debug!(path = %path.display(), skipped = summary.skipped, "size scan skipped subtrees");
                        }
                        self.directory.record_summary(&path, summary);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "size scan failed");
                        self.size_failed.insert(path);
                    }
                }
                self.request_size();
            }
        }
    }

    fn finish_transfer(&mut self, verb: &str, source: &Path, result: Result<PathBuf>) {
        match result {
            Ok(dest) => {
                let into = dest.parent().unwrap_or(dest.as_path());
                self.set_status_message(format!(
                    "{} {} to {}",
                    verb,
                    file_name(source),
                    into.display()
                ));
            }
            Err(e) => self.set_error(&e),
        }
        self.reload();
        self.request_size();
    }

    /// Lines for the info panel describing the selection.
    pub fn info_lines(&self) -> Vec<String> {
        let Some(entry) = self.directory.selected_entry() else {
            return Vec::new();
        };
        if entry.is_parent_marker {
            return vec!["Press Enter to go back".to_string()];
        }
        if entry.is_placeholder {
            return vec!["This directory is empty".to_string()];
        }

        let mut lines = vec![
            format!("Name: {}", entry.name),
            format!("Type: {}", if entry.is_dir() { "Folder" } else { "File" }),
        ];
        if !entry.is_dir() {
            lines.push(format!("Size: {:.2} KB", entry.size_bytes as f64 / 1024.0));
            lines.push("No. Files: 1".to_string());
            return lines;
        }

        let path = self.directory.cwd().child(&entry.name);
        match entry.summary {
            Some(summary) => {
                lines.push(format!("Size: {:.2} KB", summary.total_kib));
                lines.push(format!("No. Files: {}", summary.file_count));
                lines.push(format!("No. Folders: {}", summary.dir_count));
                if summary.skipped > 0 {
                    lines.push(format!("Skipped: {}", summary.skipped));
                }
            }
            None if self.size_failed.contains(&path) => {
                lines.push("Size: unavailable".to_string());
            }
            None => lines.push("Size: calculating…".to_string()),
        }
        lines
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().expect("tempdir");
        File::create(dir.path().join("a.txt")).expect("create");
        fs::write(dir.path().join("bravo"), b"hello").expect("write");
        fs::create_dir(dir.path().join("cat")).expect("mkdir");
        let app = App::new(dir.path(), Settings::default()).expect("app");
        (dir, app)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Char(c));
        }
    }

    /// Run queued tasks synchronously, feeding outcomes back.
    fn run_tasks(app: &mut App) {
        loop {
            let tasks = app.take_tasks();
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                let outcome = task.run();
                app.handle_task_complete(outcome);
            }
        }
    }

    fn names(app: &App) -> Vec<String> {
        app.directory.entries().iter().map(|e| e.name.clone()).collect()
    }

    fn select(app: &mut App, name: &str) {
        assert!(app.directory.select_name(name), "{} not listed", name);
    }

    #[test]
    fn starts_browsing_with_parent_marker() {
        let (_dir, app) = setup_app();
        assert!(matches!(app.mode, Mode::Browsing));
        assert_eq!(names(&app), vec!["..", "a.txt", "bravo", "cat"]);
        assert_eq!(app.directory.selected(), 0);
    }

    #[test]
    fn new_fails_for_missing_directory() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("gone");
        assert!(App::new(&missing, Settings::default()).is_err());
    }

    #[test]
    fn up_down_clamp() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Action::Up);
        assert_eq!(app.directory.selected(), 0);
        for _ in 0..10 {
            app.dispatch(Action::Down);
        }
        assert_eq!(app.directory.selected(), 3);
    }

    #[test]
    fn quit_sets_flag() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn quit_ignored_outside_browsing() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Action::Search);
        app.dispatch(Action::Quit);
        assert!(!app.should_quit);
        assert!(matches!(app.mode, Mode::Prompting(_)));
    }

    #[test]
    fn enter_directory_and_back() {
        let (dir, mut app) = setup_app();
        select(&mut app, "cat");
        app.dispatch(Action::Enter);
        assert_eq!(app.directory.cwd().as_path(), dir.path().join("cat"));
        assert_eq!(names(&app), vec!["..", "(empty)"]);

        app.dispatch(Action::Enter);
        assert_eq!(app.directory.cwd().as_path(), dir.path());
    }

    #[test]
    fn enter_file_opens_viewer_and_exit_returns() {
        let (_dir, mut app) = setup_app();
        select(&mut app, "bravo");
        app.dispatch(Action::Enter);
        match &app.mode {
            Mode::Viewing(v) => assert!(v.is_text()),
            other => panic!("expected viewer, got {:?}", other),
        }
        app.dispatch(Action::PageDown);
        if let Mode::Viewing(v) = &app.mode {
            assert_eq!(v.page_start(), app.viewer_height);
        }
        app.dispatch(Action::PageUp);
        if let Mode::Viewing(v) = &app.mode {
            assert_eq!(v.page_start(), 0);
        }
        app.dispatch(Action::ViewerExit);
        assert!(matches!(app.mode, Mode::Browsing));
    }

    #[test]
    fn rename_flow_confirms_then_renames() {
        let (dir, mut app) = setup_app();
        select(&mut app, "a.txt");
        app.dispatch(Action::Rename);
        match &app.mode {
            Mode::Prompting(p) => assert_eq!(p.buffer(), "a.txt"),
            other => panic!("expected prompt, got {:?}", other),
        }
        for _ in 0.."a.txt".len() {
            app.dispatch(Action::Backspace);
        }
        type_text(&mut app, "z.txt");
        app.dispatch(Action::Enter);
        match &app.mode {
            Mode::Prompting(p) => assert_eq!(p.title(), "Rename a.txt to z.txt? (y/n)"),
            other => panic!("expected confirm, got {:?}", other),
        }
        app.dispatch(Action::ConfirmYes);

        assert!(matches!(app.mode, Mode::Browsing));
        assert!(dir.path().join("z.txt").exists());
        assert!(!dir.path().join("a.txt").exists());
        assert_eq!(
            app.directory.selected_entry().map(|e| e.name.as_str()),
            Some("z.txt")
        );
    }

    #[test]
    fn rename_declined_leaves_file() {
        let (dir, mut app) = setup_app();
        select(&mut app, "a.txt");
        app.dispatch(Action::Rename);
        app.dispatch(Action::Backspace);
        app.dispatch(Action::Enter);
        app.dispatch(Action::ConfirmNo);
        assert!(matches!(app.mode, Mode::Browsing));
        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("a.tx").exists());
    }

    #[test]
    fn rename_onto_existing_reports_error() {
        let (dir, mut app) = setup_app();
        select(&mut app, "a.txt");
        app.dispatch(Action::Rename);
        for _ in 0.."a.txt".len() {
            app.dispatch(Action::Backspace);
        }
        type_text(&mut app, "bravo");
        app.dispatch(Action::Enter);
        app.dispatch(Action::ConfirmYes);

        let status = app.status_message.as_ref().expect("status");
        assert!(status.is_error);
        assert!(status.text.starts_with("Already exists"));
        assert_eq!(fs::read(dir.path().join("bravo")).expect("read"), b"hello");
    }

    #[test]
    fn rename_on_parent_marker_is_refused() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Action::Rename);
        assert!(matches!(app.mode, Mode::Browsing));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn delete_with_confirmation() {
        let (dir, mut app) = setup_app();
        select(&mut app, "a.txt");
        app.dispatch(Action::Delete);
        assert!(matches!(app.mode, Mode::Prompting(_)));
        app.dispatch(Action::Char('y'));
        assert!(!dir.path().join("a.txt").exists());
        assert!(!names(&app).contains(&"a.txt".to_string()));
    }

    #[test]
    fn delete_declined_keeps_file() {
        let (dir, mut app) = setup_app();
        select(&mut app, "a.txt");
        app.dispatch(Action::Delete);
        app.dispatch(Action::ConfirmNo);
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn delete_without_confirmation() {
        let dir = TempDir::new().expect("tempdir");
        File::create(dir.path().join("x")).expect("create");
        let settings = Settings {
            confirm_delete: false,
            ..Settings::default()
        };
        let mut app = App::new(dir.path(), settings).expect("app");
        select(&mut app, "x");
        app.dispatch(Action::Delete);
        assert!(matches!(app.mode, Mode::Browsing));
        assert!(!dir.path().join("x").exists());
    }

    #[test]
    fn create_file_selects_it() {
        let (dir, mut app) = setup_app();
        app.dispatch(Action::Create);
        type_text(&mut app, "new.md");
        app.dispatch(Action::Enter);
        assert!(dir.path().join("new.md").is_file());
        assert_eq!(
            app.directory.selected_entry().map(|e| e.name.as_str()),
            Some("new.md")
        );
    }

    #[test]
    fn create_rejects_bad_name() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Action::Create);
        type_text(&mut app, "a/b");
        app.dispatch(Action::Enter);
        let status = app.status_message.as_ref().expect("status");
        assert!(status.is_error);
    }

    #[test]
    fn cancel_returns_to_browsing() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Action::Create);
        type_text(&mut app, "abc");
        app.dispatch(Action::Cancel);
        assert!(matches!(app.mode, Mode::Browsing));
    }

    #[test]
    fn search_selects_first_match() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Action::Search);
        type_text(&mut app, "rav");
        app.dispatch(Action::Enter);
        assert_eq!(
            app.directory.selected_entry().map(|e| e.name.as_str()),
            Some("bravo")
        );
    }

    #[test]
    fn search_without_match_keeps_selection() {
        let (_dir, mut app) = setup_app();
        select(&mut app, "cat");
        app.dispatch(Action::Search);
        type_text(&mut app, "zzz");
        app.dispatch(Action::Enter);
        assert_eq!(
            app.directory.selected_entry().map(|e| e.name.as_str()),
            Some("cat")
        );
        assert!(app.status_message.is_some());
    }

    #[test]
    fn empty_search_is_invalid_input() {
        let (_dir, mut app) = setup_app();
        app.dispatch(Action::Search);
        app.dispatch(Action::Enter);
        let status = app.status_message.as_ref().expect("status");
        assert!(status.is_error);
        assert!(status.text.starts_with("Invalid input"));
    }

    #[test]
    fn copy_runs_as_task_and_clears_busy() {
        let (dir, mut app) = setup_app();
        select(&mut app, "bravo");
        app.dispatch(Action::Copy);
        type_text(&mut app, "cat");
        app.dispatch(Action::Enter);
        assert!(app.busy.is_some());

        // Mutations are refused while the copy is in flight.
        app.dispatch(Action::Delete);
        assert!(matches!(app.mode, Mode::Browsing));
        assert!(dir.path().join("bravo").exists());

        run_tasks(&mut app);
        assert!(app.busy.is_none());
        assert_eq!(
            fs::read(dir.path().join("cat").join("bravo")).expect("read"),
            b"hello"
        );
        assert!(dir.path().join("bravo").exists());
    }

    #[test]
    fn move_runs_as_task() {
        let (dir, mut app) = setup_app();
        select(&mut app, "bravo");
        app.dispatch(Action::Move);
        type_text(&mut app, "cat");
        app.dispatch(Action::Enter);
        run_tasks(&mut app);
        assert!(dir.path().join("cat").join("bravo").exists());
        assert!(!dir.path().join("bravo").exists());
        assert!(!names(&app).contains(&"bravo".to_string()));
    }

    #[test]
    fn copy_failure_is_reported() {
        let (_dir, mut app) = setup_app();
        select(&mut app, "bravo");
        app.dispatch(Action::Copy);
        type_text(&mut app, "missing");
        app.dispatch(Action::Enter);
        run_tasks(&mut app);
        assert!(app.busy.is_none());
        assert!(app.status_message.as_ref().expect("status").is_error);
    }

    #[test]
    fn directory_size_is_calculated_in_background() {
        let (dir, mut app) = setup_app();
        fs::write(dir.path().join("cat").join("f"), vec![0u8; 2048]).expect("write");
        select(&mut app, "bravo");
        app.dispatch(Action::Down);
        assert!(app.info_lines().contains(&"Size: calculating…".to_string()));

        run_tasks(&mut app);
        let lines = app.info_lines();
        assert!(lines.contains(&"Name: cat".to_string()));
        assert!(lines.contains(&"Type: Folder".to_string()));
        assert!(lines.contains(&"Size: 2.00 KB".to_string()));
        assert!(lines.contains(&"No. Files: 1".to_string()));
    }

    #[test]
    fn size_scans_run_one_at_a_time() {
        let dir = TempDir::new().expect("tempdir");
        for i in 0..40 {
            fs::create_dir(dir.path().join(format!("d{:02}", i))).expect("mkdir");
        }
        let mut app = App::new(dir.path(), Settings::default()).expect("app");
        for _ in 0..40 {
            app.dispatch(Action::Down);
        }
        let queued = app.take_tasks();
        assert_eq!(queued.len(), 1);
        assert_eq!(
            queued[0],
            Task::Size {
                path: dir.path().join("d00"),
                max_depth: DEFAULT_MAX_DEPTH,
            }
        );
        assert!(app.take_tasks().is_empty());

        // Finishing the first scan starts one for the current selection.
        for task in queued {
            app.handle_task_complete(task.run());
        }
        let next = app.take_tasks();
        assert_eq!(next.len(), 1);
        assert_eq!(
            next[0],
            Task::Size {
                path: dir.path().join("d39"),
                max_depth: DEFAULT_MAX_DEPTH,
            }
        );
    }

    #[test]
    fn unreadable_viewer_page_returns_to_browsing() {
        let (dir, mut app) = setup_app();
        let blob = dir.path().join("blob.bin");
        fs::write(&blob, vec![0xffu8; 4096]).expect("write");
        app.reload();
        select(&mut app, "blob.bin");
        app.dispatch(Action::Enter);
        assert!(app.viewer_rows(4, 40).is_some());

        fs::remove_file(&blob).expect("remove");
        app.dispatch(Action::PageDown);
        assert!(app.viewer_rows(4, 40).is_none());
        assert!(matches!(app.mode, Mode::Browsing));
        let status = app.status_message.as_ref().expect("status");
        assert!(status.is_error);

        // Nothing more to report on the next frame.
        let created = status.created;
        assert!(app.viewer_rows(4, 40).is_none());
        assert_eq!(app.status_message.as_ref().map(|s| s.created), Some(created));
    }

    #[test]
    fn info_for_file_and_parent() {
        let (_dir, mut app) = setup_app();
        assert_eq!(app.info_lines(), vec!["Press Enter to go back"]);
        select(&mut app, "bravo");
        assert_eq!(
            app.info_lines(),
            vec!["Name: bravo", "Type: File", "Size: 0.00 KB", "No. Files: 1"]
        );
    }

    #[test]
    fn clear_expired_status_keeps_recent() {
        let (_dir, mut app) = setup_app();
        app.set_status_message("hello");
        app.clear_expired_status();
        assert!(app.status_message.is_some());
    }

    #[test]
    fn clear_expired_status_removes_old() {
        let (_dir, mut app) = setup_app();
        app.status_message = Some(StatusMessage {
            text: "old".into(),
            is_error: false,
            created: Instant::now() - Duration::from_secs(4),
        });
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }
}
