/// Extracting `owner/repo` from user input
pub mod repo_url;
/// Text helpers
pub mod text;

pub use repo_url::{extract_repo_info, RepoRef};
pub use text::truncate_chars;
