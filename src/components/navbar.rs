use crate::auth::Session;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, ReputationBadge};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

const LINK: &str = "block rounded-md px-3 py-2 text-sm hover:bg-accent hover:text-accent-foreground";

/// Menu entries for a viewer, in display order. `None` marks a divider.
pub(crate) fn menu_links(signed_in: bool) -> Vec<Option<(&'static str, &'static str)>> {
    let legal = [
        Some(("About", "/about")),
        Some(("Privacy", "/privacy")),
        Some(("Terms", "/terms")),
    ];
    if signed_in {
        let mut v = vec![
            Some(("Dashboard", "/notes")),
            Some(("Upload", "/upload")),
            Some(("My Library", "/library")),
            Some(("Admin", "/admin")),
            None,
        ];
        v.extend(legal);
        v
    } else {
        let mut v = vec![Some(("Home", "/")), Some(("Browse Notes", "/notes")), None];
        v.extend(legal);
        v.extend([None, Some(("Login", "/auth"))]);
        v
    }
}

#[component]
pub fn Navbar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    // Held for the navbar's lifetime and released on teardown.
    let sessions = app_state.0.client().sessions;
    let viewer: RwSignal<Option<Session>> = RwSignal::new(sessions.current());
    let subscription = sessions.subscribe(move |_, s| viewer.set(s.cloned()));
    on_cleanup(move || subscription.unsubscribe());

    // Points and level follow whoever is signed in.
    Effect::new(move |_| {
        viewer.track();
        app_state.0.refresh_profile();
    });

    let menu_open = RwSignal::new(false);
    let signed_in = move || viewer.with(Option::is_some);

    let state = app_state.0;
    let sign_out = Callback::new(move |_: ()| {
        menu_open.set(false);
        spawn_local(async move {
            state.client().sign_out().await;
            state.success("Signed out successfully");
            navigate.with_value(|nav| nav("/", Default::default()));
        });
    });

    let theme = state.theme;
    let toggle_theme = Callback::new(move |_: ()| state.toggle_theme());

    view! {
        <header class="sticky top-0 z-40 border-b bg-background/95 backdrop-blur">
            <nav class="mx-auto flex h-14 max-w-6xl items-center justify-between px-4">
                <a href="/" class="text-lg font-semibold text-foreground">"Padhai"</a>

                <div class="flex items-center gap-2">
                    <a href="/notes" class="hidden rounded-md px-3 py-1.5 text-sm hover:bg-accent sm:inline-block">
                        "Browse Notes"
                    </a>
                    {move || {
                        state.profile.get().filter(|_| signed_in()).map(|p| {
                            view! {
                                <span class="hidden items-center gap-2 text-sm sm:flex">
                                    <span class="font-medium">{format!("{} GP", p.gyan_points)}</span>
                                    <ReputationBadge level=p.reputation_level />
                                </span>
                            }
                        })
                    }}
                    <Show when=move || !signed_in()>
                        <a
                            href="/auth"
                            class="inline-flex h-8 items-center rounded-md bg-primary px-3 text-sm font-medium text-primary-foreground hover:bg-primary/90"
                        >
                            "Login"
                        </a>
                    </Show>
                    <div class="relative">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            attr:aria-haspopup="menu"
                            attr:aria-expanded=move || menu_open.get().to_string()
                            on:click=move |_| menu_open.update(|o| *o = !*o)
                        >
                            {move || {
                                viewer
                                    .with(|s| s.as_ref().map(|s| s.user.display_name()))
                                    .unwrap_or_else(|| "Menu".to_string())
                            }}
                        </Button>

                        <Show when=move || menu_open.get()>
                            <div
                                role="menu"
                                class="absolute right-0 mt-2 w-52 rounded-lg border bg-popover p-1 text-popover-foreground shadow-md"
                                on:click=move |_| menu_open.set(false)
                            >
                                {move || {
                                    menu_links(signed_in())
                                        .into_iter()
                                        .map(|entry| match entry {
                                            Some((label, href)) => {
                                                view! { <a role="menuitem" class=LINK href=href>{label}</a> }.into_any()
                                            }
                                            None => view! { <div class="my-1 h-px bg-border" /> }.into_any(),
                                        })
                                        .collect_view()
                                }}
                                <button role="menuitem" class=format!("{LINK} w-full text-left") on:click=move |_| toggle_theme.run(())>
                                    {move || theme.get().menu_label()}
                                </button>
                                <Show when=signed_in>
                                    <div class="my-1 h-px bg-border" />
                                    <button
                                        role="menuitem"
                                        class=format!("{LINK} w-full text-left text-destructive")
                                        on:click=move |_| sign_out.run(())
                                    >
                                        "Sign out"
                                    </button>
                                </Show>
                            </div>
                        </Show>
                    </div>
                </div>
            </nav>
        </header>
    }
}
