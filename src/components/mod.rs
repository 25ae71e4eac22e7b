pub mod file_preview;
pub mod navbar;
pub mod require_auth;
pub mod toaster;
pub mod ui;

pub use file_preview::FilePreview;
pub use navbar::Navbar;
pub use require_auth::RequireAuth;
pub use toaster::Toaster;
