use crate::components::{Navbar, RequireAuth, Toaster};
use crate::pages::{
    AboutPage, AdminPage, AuthPage, BrowsePage, IndexPage, LibraryPage, NoteDetailPage, PrivacyPage, TermsPage,
    UploadPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    provide_context(AppContext(state));

    // A stored session past its expiry is refreshed once, or dropped.
    spawn_local(async move { state.client().restore_session().await });

    // Router hooks (navigate, params) need the <Router> context.
    view! {
        <Router>
            <div class="flex min-h-screen flex-col bg-background text-foreground">
                <Navbar />
                <main class="flex-1">
                    <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                        <Route path=path!("") view=IndexPage />
                        <Route path=path!("about") view=AboutPage />
                        <Route path=path!("privacy") view=PrivacyPage />
                        <Route path=path!("terms") view=TermsPage />
                        <Route path=path!("auth") view=AuthPage />
                        <Route path=path!("notes") view=BrowsePage />
                        <Route path=path!("notes/:note_id") view=NoteDetailPage />
                        <Route path=path!("upload") view=move || view! {
                            <RequireAuth>
                                <UploadPage />
                            </RequireAuth>
                        } />
                        <Route path=path!("library") view=move || view! {
                            <RequireAuth>
                                <LibraryPage />
                            </RequireAuth>
                        } />
                        <Route path=path!("admin") view=move || view! {
                            <RequireAuth>
                                <AdminPage />
                            </RequireAuth>
                        } />
                    </Routes>
                </main>
                <Toaster />
            </div>
        </Router>
    }
}
