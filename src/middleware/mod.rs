pub mod guard;
pub mod response;

pub use guard::session_guard;
pub use response::{ApiResponse, ApiResult, Notice, NoticeLevel};
