use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle,
    PageSpinner, ReputationBadge,
};
use crate::flows::library::{load_library, remove_bookmark, LibraryEntry};
use crate::state::AppContext;
use crate::util::{format_date, format_score};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[component]
pub fn LibraryPage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let entries: RwSignal<Vec<LibraryEntry>> = RwSignal::new(vec![]);
    let loading = RwSignal::new(true);
    let removing: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        let viewer = state.session.with(|s| s.as_ref().map(|s| s.user.id.clone()));
        loading.set(true);
        spawn_local(async move {
            match load_library(&state.client(), viewer.as_deref()).await {
                Ok(list) => entries.set(list),
                Err(e) => {
                    state.flow_error("library", &e);
                    if e.needs_login() {
                        navigate.with_value(|nav| nav("/auth", Default::default()));
                    }
                }
            }
            loading.set(false);
        });
    });

    let on_remove = move |saved_id: String| {
        if removing.with_untracked(Option::is_some) {
            return;
        }
        removing.set(Some(saved_id.clone()));
        spawn_local(async move {
            match remove_bookmark(&state.client(), &saved_id).await {
                Ok(()) => {
                    entries.update(|list| list.retain(|e| e.id != saved_id));
                    state.success("Removed from library");
                }
                Err(e) => state.flow_error("remove bookmark", &e),
            }
            removing.set(None);
        });
    };

    view! {
        <div class="mx-auto max-w-6xl px-4 py-10">
            <div class="mb-8">
                <h1 class="text-3xl font-bold">"My Library"</h1>
                <p class="text-muted-foreground">"Notes you've saved for later."</p>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <PageSpinner /> }>
                <Show
                    when=move || entries.with(|e| !e.is_empty())
                    fallback=|| view! {
                        <div class="flex flex-col items-center gap-3 py-16 text-center">
                            <p class="text-muted-foreground">"Your library is empty."</p>
                            <a href="/notes" class="text-sm font-medium text-primary underline-offset-4 hover:underline">
                                "Browse notes"
                            </a>
                        </div>
                    }
                >
                    <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=move || entries.get()
                            key=|e| e.id.clone()
                            children=move |entry| {
                                let saved_id = entry.id.clone();
                                let busy = {
                                    let id = saved_id.clone();
                                    move || removing.with(|r| r.as_deref() == Some(id.as_str()))
                                };
                                view! {
                                    <Card class="flex h-full flex-col">
                                        {match entry.note {
                                            Some(note) => view! {
                                                <CardHeader>
                                                    <CardTitle class="text-lg">
                                                        <a href=format!("/notes/{}", entry.note_id) class="hover:underline">
                                                            {note.topic}
                                                        </a>
                                                    </CardTitle>
                                                    <CardDescription>
                                                        {format!("{} · Semester {}", note.subject, note.semester)}
                                                    </CardDescription>
                                                </CardHeader>
                                                <CardContent class="flex-1 space-y-2 text-sm">
                                                    <div class="flex items-center gap-2">
                                                        <span class="text-muted-foreground">{entry.uploader.full_name}</span>
                                                        <ReputationBadge level=entry.uploader.reputation_level />
                                                    </div>
                                                    <p class="text-xs text-muted-foreground">
                                                        {format!("Trust {} · saved {}", format_score(note.trust_score), format_date(&entry.saved_at))}
                                                    </p>
                                                </CardContent>
                                            }
                                            .into_any(),
                                            None => view! {
                                                <CardHeader>
                                                    <CardTitle class="text-lg text-muted-foreground">"Note unavailable"</CardTitle>
                                                    <CardDescription>"This note was removed or is under review."</CardDescription>
                                                </CardHeader>
                                            }
                                            .into_any(),
                                        }}
                                        <CardFooter class="mt-auto">
                                            <Button
                                                variant=ButtonVariant::Outline
                                                size=ButtonSize::Sm
                                                class="w-full"
                                                attr:disabled=busy
                                                on:click=move |_| on_remove(saved_id.clone())
                                            >
                                                "Remove"
                                            </Button>
                                        </CardFooter>
                                    </Card>
                                }
                            }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}
