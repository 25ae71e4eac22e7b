mod admin;
mod auth;
mod browse;
mod home;
mod legal;
mod library;
mod note_detail;
mod upload;

pub use admin::AdminPage;
pub use auth::AuthPage;
pub use browse::BrowsePage;
pub use home::IndexPage;
pub use legal::{AboutPage, PrivacyPage, TermsPage};
pub use library::LibraryPage;
pub use note_detail::NoteDetailPage;
pub use upload::UploadPage;
