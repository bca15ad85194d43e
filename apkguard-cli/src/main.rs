mod app;
mod headless;
mod logging;
mod tui;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use apkguard_core::{
    ApiConfig, CancellationToken, Dashboard, FileStatus, ScanHistory, SequencerConfig, Ticker,
    TickerConfig, format_percent,
};
use chrono::Utc;
use clap::Parser;
use color_eyre::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend, style::Style, widgets::Widget};

use app::{Action, AppMode, AppState, ViewMode};
use logging::LogTarget;
use tui::{AppEvent, EventHandler, handle_key};
use ui::{
    AddFilePrompt, AppLayout, DashboardView, Footer, Header, HelpView, ProgressView, ResultView,
    Theme, UploadListView,
};

/// APKGUARD - Terminal APK security scanning simulator
#[derive(Parser, Debug)]
#[command(name = "apkguard")]
#[command(about = "Simulated APK security scans with a live threat dashboard")]
#[command(version)]
struct Args {
    /// APK files to add at start-up
    files: Vec<PathBuf>,

    /// Scan every file without the TUI and print the results as JSON
    #[arg(long)]
    json: bool,

    /// Submit files to the analysis backend instead of simulating
    #[arg(long, conflicts_with = "json")]
    remote: bool,

    /// Check the analysis backend and exit
    #[arg(long, conflicts_with_all = ["json", "remote"])]
    health: bool,

    /// Seed for reproducible results and dashboard values
    #[arg(long)]
    seed: Option<u64>,

    /// Multiplier for scan phase durations (0 = instant)
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Analysis backend base URL [default: $APKGUARD_API_URL or http://localhost:5000]
    #[arg(long)]
    api_url: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with an empty scan history
    #[arg(long)]
    no_samples: bool,
}

impl Args {
    fn is_headless(&self) -> bool {
        self.json || self.remote || self.health
    }

    fn api_config(&self) -> ApiConfig {
        let config = ApiConfig::from_env().with_timeout(Duration::from_secs(self.timeout_secs));
        match &self.api_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }

    fn sequencer_config(&self) -> SequencerConfig {
        SequencerConfig {
            time_scale: self.time_scale,
            ..Default::default()
        }
    }

    /// Independent RNG streams derived from `--seed`
    fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let log_target = match (&args.log_file, args.is_headless()) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::Off,
    };
    logging::init(log_target)?;

    if args.health {
        return headless::run_health(args.api_config());
    }
    if args.remote {
        return headless::run_remote(&args.files, args.api_config());
    }
    if args.json {
        return headless::run_json(&args.files, &args.sequencer_config(), &mut args.rng(0));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, &args);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, args: &Args) -> Result<()> {
    let theme = Theme::default();
    let history = if args.no_samples {
        ScanHistory::new()
    } else {
        ScanHistory::with_samples(Utc::now())
    };
    let mut state = AppState::new(args.sequencer_config(), history, args.rng(0));
    let event_handler = EventHandler::new(50); // 50ms tick rate

    if !args.files.is_empty() {
        state.add_paths(&args.files);
    }

    // Dashboard ticker
    let mut dashboard_rng = args.rng(1);
    let dashboard = Dashboard::new(&mut dashboard_rng);
    let ticker_token = CancellationToken::new();
    let mut ticker = Ticker::new(TickerConfig::default()).with_cancellation(ticker_token.clone());
    let dashboard_rx = ticker.subscribe();
    // Detached: the thread exits at its next tick after cancellation
    let _ticker_handle = ticker.spawn(dashboard, dashboard_rng);

    let phases = args.sequencer_config().phases;

    loop {
        // Drain background channels
        state.poll_scan();
        while let Ok(snapshot) = dashboard_rx.try_recv() {
            state.update_dashboard(snapshot);
        }

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();
            let layout = AppLayout::new(area);

            // Background
            frame
                .buffer_mut()
                .set_style(area, Style::default().bg(theme.bg));

            Header::new(&state, &theme).render(layout.header, frame.buffer_mut());
            render_scan_bar(&state, &theme, layout.scan_bar, frame.buffer_mut());

            match state.view_mode {
                ViewMode::Uploads => {
                    let (list_area, detail_area) = layout.split_body();
                    // Borders take two rows
                    state.visible_height = list_area.height.saturating_sub(2) as usize;

                    UploadListView::new(
                        state.queue.files(),
                        state.selected_index,
                        state.scroll_offset,
                        &theme,
                    )
                    .render(list_area, frame.buffer_mut());

                    let selected = state.selected_file();
                    match (&state.scan, selected) {
                        (Some(session), Some(file)) if session.file_id == file.id => {
                            ProgressView::new(session, &phases, state.spinner_frame, &theme)
                                .render(detail_area, frame.buffer_mut());
                        }
                        (_, Some(file)) if file.result.is_some() => {
                            if let Some(result) = &file.result {
                                ResultView::new(result, &theme)
                                    .render(detail_area, frame.buffer_mut());
                            }
                        }
                        (Some(session), _) => {
                            ProgressView::new(session, &phases, state.spinner_frame, &theme)
                                .render(detail_area, frame.buffer_mut());
                        }
                        _ => {
                            DashboardView::new(state.dashboard.as_ref(), &state.history, &theme)
                                .render(detail_area, frame.buffer_mut());
                        }
                    }
                }
                ViewMode::Dashboard => {
                    DashboardView::new(state.dashboard.as_ref(), &state.history, &theme)
                        .render(layout.body, frame.buffer_mut());
                }
            }

            match state.mode {
                AppMode::Help => HelpView::new(&theme).render(area, frame.buffer_mut()),
                AppMode::AddFile => {
                    AddFilePrompt::new(&state.input, &theme).render(area, frame.buffer_mut())
                }
                AppMode::Browsing => {}
            }

            Footer::new(state.mode, state.view_mode, state.is_scanning(), &theme)
                .render(layout.footer, frame.buffer_mut());
        })?;

        // Handle events
        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = handle_key(key, state.mode);
                handle_action(&mut state, action);
            }
            AppEvent::Resize(_, _) => {
                // Terminal will redraw on next loop
            }
            AppEvent::Tick => {
                state.tick_spinner();
            }
        }

        if state.should_quit {
            ticker_token.cancel();
            break;
        }
    }

    Ok(())
}

fn handle_action(state: &mut AppState, action: Action) {
    match action {
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::PageUp => state.page_up(),
        Action::PageDown => state.page_down(),
        Action::GoToFirst => state.go_to_first(),
        Action::GoToLast => state.go_to_last(),
        Action::StartScan => state.start_scan(),
        Action::CancelScan => state.cancel_scan(),
        Action::Remove => state.remove_selected(),
        Action::ClearAll => state.clear_all(),
        Action::AddFile => state.begin_add_file(),
        Action::InputChar(c) => state.input_char(c),
        Action::InputBackspace => state.input_backspace(),
        Action::SubmitInput => state.submit_input(),
        Action::CancelInput => state.cancel_input(),
        Action::NextView => state.next_view(),
        Action::ShowHelp => state.show_help(),
        Action::HideHelp => state.hide_help(),
        Action::Quit => state.quit(),
        Action::Tick => {}
    }
}

fn render_scan_bar(
    state: &AppState,
    theme: &Theme,
    area: ratatui::layout::Rect,
    buf: &mut ratatui::buffer::Buffer,
) {
    if area.width < 30 {
        return;
    }

    let bar_width = area.width.saturating_sub(30) as usize;

    // While scanning: scan progress. Otherwise: share of the list that is scanned
    let (percent, label, color) = match &state.scan {
        Some(session) => (
            session.progress.percent,
            format!("{} {}", format_percent(session.progress.percent), session.phase_name),
            theme.blue,
        ),
        None => {
            let total = state.queue.len();
            let done = state
                .queue
                .files()
                .iter()
                .filter(|f| f.status == FileStatus::Completed)
                .count();
            let percent = if total == 0 {
                0.0
            } else {
                done as f64 / total as f64 * 100.0
            };
            (percent, format!("{done}/{total} scanned"), theme.green)
        }
    };

    let (bar, color) = ui::bar_chart::render_bar(percent, bar_width, color);
    buf.set_string(area.x + 1, area.y, &bar, Style::default().fg(color));

    let label: String = label.chars().take(27).collect();
    buf.set_string(
        area.x + area.width - label.chars().count() as u16 - 1,
        area.y,
        &label,
        Style::default().fg(theme.fg_dim),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_headless_flags() {
        let args = Args::try_parse_from(["apkguard", "--json", "--seed", "3", "a.apk"]).unwrap();
        assert!(args.is_headless());
        assert_eq!(args.files, vec![PathBuf::from("a.apk")]);
        assert_eq!(args.time_scale, 1.0);

        assert!(Args::try_parse_from(["apkguard", "--json", "--remote"]).is_err());
    }

    #[test]
    fn test_seeded_streams_differ() {
        use rand::Rng;
        let args = Args::try_parse_from(["apkguard", "--seed", "9"]).unwrap();
        let a: u64 = args.rng(0).gen_range(0..u64::MAX);
        let b: u64 = args.rng(1).gen_range(0..u64::MAX);
        assert_ne!(a, b);
        assert_eq!(a, args.rng(0).gen_range(0..u64::MAX));
    }

    #[test]
    fn test_timeout_maps_to_api_config() {
        let args = Args::try_parse_from([
            "apkguard",
            "--timeout-secs",
            "5",
            "--api-url",
            "http://backend:5000/",
        ])
        .unwrap();
        let config = args.api_config();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.base_url, "http://backend:5000");
    }

    #[test]
    fn test_api_url_falls_back_to_environment_config() {
        let args = Args::try_parse_from(["apkguard", "--health"]).unwrap();
        assert_eq!(args.api_url, None);
        assert_eq!(args.api_config().base_url, ApiConfig::from_env().base_url);
    }
}
