use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use apkguard_core::{
    DashboardSnapshot, ScanHistory, ScanMessage, ScanOutcome, ScanProgressState, Sequencer,
    SequencerConfig, SelectedFile, UploadQueue, UploadedFile, generate,
};
use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use tracing::{info, warn};
use uuid::Uuid;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the upload list or dashboard
    Browsing,
    /// Showing help overlay
    Help,
    /// Typing a path into the add-file prompt
    AddFile,
}

/// Which screen is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Uploads,
    Dashboard,
}

/// A sequencer run in flight, owned by the UI thread
pub struct ScanSession {
    pub file_id: Uuid,
    pub file_name: String,
    pub phase_name: String,
    pub progress: ScanProgressState,
    receiver: Receiver<ScanMessage>,
    handle: Option<JoinHandle<ScanOutcome>>,
}

/// Application state
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Current screen
    pub view_mode: ViewMode,
    /// Accepted APKs and their scan status
    pub queue: UploadQueue,
    /// Past scans, newest first
    pub history: ScanHistory,
    /// Latest dashboard snapshot from the ticker
    pub dashboard: Option<DashboardSnapshot>,
    /// Running scan, if any
    pub scan: Option<ScanSession>,
    /// Currently selected row in the upload list
    pub selected_index: usize,
    /// Scroll offset for the upload list
    pub scroll_offset: usize,
    /// Visible area height (set by UI)
    pub visible_height: usize,
    /// Whether app should quit
    pub should_quit: bool,
    /// Spinner frame for animation
    pub spinner_frame: usize,
    /// Error message to display
    pub error_message: Option<String>,
    /// Text typed into the add-file prompt
    pub input: String,
    sequencer_config: SequencerConfig,
    rng: StdRng,
}

impl AppState {
    pub fn new(sequencer_config: SequencerConfig, history: ScanHistory, rng: StdRng) -> Self {
        Self {
            mode: AppMode::Browsing,
            view_mode: ViewMode::Uploads,
            queue: UploadQueue::new(),
            history,
            dashboard: None,
            scan: None,
            selected_index: 0,
            scroll_offset: 0,
            visible_height: 20,
            should_quit: false,
            spinner_frame: 0,
            error_message: None,
            input: String::new(),
            sequencer_config,
            rng,
        }
    }

    /// Advance spinner animation
    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    pub fn selected_file(&self) -> Option<&UploadedFile> {
        self.queue.files().get(self.selected_index)
    }

    pub fn is_scanning(&self) -> bool {
        self.scan.is_some()
    }

    /// Take in files from disk; non-APKs are dropped, and a selection
    /// without any APK leaves the list unchanged and raises the alert.
    pub fn add_paths<P: AsRef<Path>>(&mut self, paths: &[P]) {
        let mut selection = Vec::new();
        for path in paths {
            match SelectedFile::from_path(path.as_ref()) {
                Ok(file) => selection.push(file),
                Err(e) => {
                    warn!(path = %path.as_ref().display(), error = %e, "cannot read selection");
                    self.set_error(format!("{}: {}", path.as_ref().display(), e));
                    return;
                }
            }
        }

        match self.queue.accept(selection) {
            Ok(ids) => {
                self.clear_error();
                if let Some(last) = ids.last()
                    && let Some(idx) = self.queue.files().iter().position(|f| f.id == *last)
                {
                    self.selected_index = idx;
                    self.ensure_visible();
                }
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Start the sequencer for the selected file
    pub fn start_scan(&mut self) {
        let Some(file) = self.selected_file() else {
            return;
        };
        let (file_id, file_name) = (file.id, file.name.clone());

        let cancel_token = match self.queue.begin_scan(file_id) {
            Ok(token) => token,
            Err(e) => {
                self.set_error(e.to_string());
                return;
            }
        };

        self.clear_error();
        let sequencer =
            Sequencer::new(self.sequencer_config.clone()).with_cancellation(cancel_token);
        let (receiver, handle) = sequencer.spawn();

        self.scan = Some(ScanSession {
            file_id,
            file_name,
            phase_name: String::new(),
            progress: ScanProgressState::default(),
            receiver,
            handle: Some(handle),
        });
    }

    /// Drain sequencer messages; on completion generate and store the result
    pub fn poll_scan(&mut self) {
        let mut finished = None;

        if let Some(session) = &mut self.scan {
            while let Ok(msg) = session.receiver.try_recv() {
                match msg {
                    ScanMessage::PhaseStarted { name, .. } => session.phase_name = name,
                    ScanMessage::Progress(progress) => session.progress = progress,
                    ScanMessage::Completed => {
                        finished = Some(ScanOutcome::Completed);
                        break;
                    }
                    ScanMessage::Cancelled => {
                        finished = Some(ScanOutcome::Cancelled);
                        break;
                    }
                }
            }
        }

        let Some(outcome) = finished else {
            return;
        };
        let Some(mut session) = self.scan.take() else {
            return;
        };
        if let Some(handle) = session.handle.take() {
            let _ = handle.join();
        }

        if outcome == ScanOutcome::Completed {
            let size = self
                .queue
                .get(session.file_id)
                .map(|f| f.size_bytes)
                .unwrap_or_default();
            let result = generate(&mut self.rng, session.file_id, &session.file_name, size);
            if self.queue.complete_scan(session.file_id, result.clone()) {
                self.history.record(&result);
            }
        }
    }

    /// Stop the running scan; the file goes back to `uploaded`
    pub fn cancel_scan(&mut self) {
        if self.queue.abort_scan().is_some() {
            // The sequencer thread exits at its next sub-step
            self.scan = None;
        }
    }

    /// Remove the selected file, cancelling its scan if it is running
    pub fn remove_selected(&mut self) {
        let Some(id) = self.selected_file().map(|f| f.id) else {
            return;
        };

        if let Some(removed) = self.queue.remove(id) {
            info!(file = %removed.name, "removed from upload list");
        }
        if self.scan.as_ref().is_some_and(|s| s.file_id == id) {
            self.scan = None;
        }
        self.clamp_selection();
    }

    /// Empty the upload list
    pub fn clear_all(&mut self) {
        self.queue.clear();
        self.scan = None;
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn update_dashboard(&mut self, snapshot: DashboardSnapshot) {
        self.dashboard = Some(snapshot);
    }

    /// Ensure the selected index is visible within the scroll viewport
    fn ensure_visible(&mut self) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.selected_index + 1 - self.visible_height.max(1);
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.queue.len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
        self.ensure_visible();
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
        self.ensure_visible();
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        if self.selected_index < self.queue.len().saturating_sub(1) {
            self.selected_index += 1;
        }
        self.ensure_visible();
    }

    /// Move selection up by a page
    pub fn page_up(&mut self) {
        let page_size = self.visible_height.saturating_sub(2).max(1);
        self.selected_index = self.selected_index.saturating_sub(page_size);
        self.ensure_visible();
    }

    /// Move selection down by a page
    pub fn page_down(&mut self) {
        let page_size = self.visible_height.saturating_sub(2).max(1);
        self.selected_index =
            (self.selected_index + page_size).min(self.queue.len().saturating_sub(1));
        self.ensure_visible();
    }

    /// Go to first item
    pub fn go_to_first(&mut self) {
        self.selected_index = 0;
        self.ensure_visible();
    }

    /// Go to last item
    pub fn go_to_last(&mut self) {
        self.selected_index = self.queue.len().saturating_sub(1);
        self.ensure_visible();
    }

    /// Switch between uploads and dashboard
    pub fn next_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Uploads => ViewMode::Dashboard,
            ViewMode::Dashboard => ViewMode::Uploads,
        };
    }

    /// Open the add-file prompt
    pub fn begin_add_file(&mut self) {
        self.input.clear();
        self.mode = AppMode::AddFile;
    }

    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input.pop();
    }

    /// Add the typed path and close the prompt
    pub fn submit_input(&mut self) {
        let raw = std::mem::take(&mut self.input);
        self.mode = AppMode::Browsing;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let path = expand_home(trimmed);
        self.add_paths(&[path]);
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.mode = AppMode::Browsing;
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    /// Hide help overlay
    pub fn hide_help(&mut self) {
        self.mode = AppMode::Browsing;
    }

    /// Request quit
    pub fn quit(&mut self) {
        if let Some(session) = &self.scan {
            info!(file = %session.file_name, "quitting with scan in progress");
        }
        self.queue.abort_scan();
        self.should_quit = true;
    }

    /// Set error message
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(input)
}
