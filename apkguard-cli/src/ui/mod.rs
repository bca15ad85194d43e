pub mod bar_chart;
mod dashboard_view;
mod footer;
mod header;
mod help;
mod layout;
mod progress;
mod prompt;
mod result_view;
mod theme;
mod upload_list;

pub use dashboard_view::DashboardView;
pub use footer::Footer;
pub use header::Header;
pub use help::HelpView;
pub use layout::AppLayout;
pub use progress::ProgressView;
pub use prompt::AddFilePrompt;
pub use result_view::ResultView;
pub use theme::Theme;
pub use upload_list::UploadListView;
