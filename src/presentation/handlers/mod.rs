mod analyze;
mod files;
mod form;
mod health;
mod responses;
mod upload;
mod upload_and_analyze;

pub use analyze::analyze_handler;
pub use files::{
    delete_file_handler, download_file_handler, get_file_handler, list_files_handler,
};
pub use health::{health_handler, not_found_handler, root_handler};
pub use upload::upload_handler;
pub use upload_and_analyze::upload_and_analyze_handler;
