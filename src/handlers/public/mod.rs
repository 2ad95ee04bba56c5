// handlers/public/mod.rs - Public handlers (no session required)
//
// Security Level: anonymous access
// Route Prefix: `/`, `/health`, and the configured auth root (`/auth/*`)

pub mod auth;
pub mod health;
pub mod root;

pub use health::health;
pub use root::root;
