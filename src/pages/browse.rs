use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label, NativeSelect,
    PageSpinner, ReputationBadge,
};
use crate::flows::notes::{browse_notes, BrowseFilter};
use crate::models::Note;
use crate::state::AppContext;
use crate::util::{format_date, format_score};
use crate::validation::{MAX_SEMESTER, MIN_SEMESTER};
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) fn semester_options(any_label: Option<&str>) -> Vec<(String, String)> {
    any_label
        .map(|l| (String::new(), l.to_string()))
        .into_iter()
        .chain((MIN_SEMESTER..=MAX_SEMESTER).map(|s| (s.to_string(), format!("Semester {s}"))))
        .collect()
}

#[component]
fn NoteCard(note: Note) -> impl IntoView {
    let href = format!("/notes/{}", note.id);
    let uploader = note.uploader();

    view! {
        <a href=href class="block transition-transform hover:-translate-y-0.5">
            <Card class="h-full">
                <CardHeader>
                    <CardTitle class="text-lg">{note.topic.clone()}</CardTitle>
                    <CardDescription>
                        {format!("{} · Semester {}", note.subject, note.semester)}
                    </CardDescription>
                </CardHeader>
                <CardContent class="space-y-3 text-sm">
                    <div class="flex items-center gap-2">
                        <span class="text-muted-foreground">{uploader.full_name}</span>
                        <ReputationBadge level=uploader.reputation_level />
                    </div>
                    <div class="flex flex-wrap gap-1">
                        {note
                            .tags
                            .iter()
                            .map(|t| view! { <span class="rounded bg-muted px-2 py-0.5 text-xs">{format!("#{t}")}</span> })
                            .collect_view()}
                    </div>
                    <div class="flex justify-between text-xs text-muted-foreground">
                        <span>{format!("Trust {}", format_score(note.trust_score))}</span>
                        <span>{format!("▲ {}  ▼ {}", note.upvotes, note.downvotes)}</span>
                        <span>{format_date(&note.created_at)}</span>
                    </div>
                </CardContent>
            </Card>
        </a>
    }
}

#[component]
pub fn BrowsePage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let semester = RwSignal::new(String::new());
    let subject = RwSignal::new(String::new());
    let applied: RwSignal<BrowseFilter> = RwSignal::new(BrowseFilter::default());

    let notes: RwSignal<Vec<Note>> = RwSignal::new(vec![]);
    let loading = RwSignal::new(true);

    // Responses for an older filter are dropped.
    let request_id = StoredValue::new(0u64);

    Effect::new(move |_| {
        let filter = applied.get();
        request_id.update_value(|n| *n += 1);
        let this_request = request_id.get_value();
        loading.set(true);

        spawn_local(async move {
            let res = browse_notes(&state.client(), &filter).await;
            if request_id.get_value() != this_request {
                return;
            }
            match res {
                Ok(list) => notes.set(list),
                Err(e) => {
                    notes.set(vec![]);
                    state.flow_error("browse", &e);
                }
            }
            loading.set(false);
        });
    });

    let on_apply = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        applied.set(
            BrowseFilter {
                subject: subject.get_untracked(),
                ..Default::default()
            }
            .with_semester(&semester.get_untracked()),
        );
    };

    view! {
        <div class="mx-auto max-w-6xl px-4 py-10">
            <div class="mb-8 flex flex-col gap-2">
                <h1 class="text-3xl font-bold">"Browse Notes"</h1>
                <p class="text-muted-foreground">"Approved notes shared by students, newest first."</p>
            </div>

            <form class="mb-8 grid gap-4 md:grid-cols-[12rem_1fr_auto] md:items-end" on:submit=on_apply>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="semester">"Semester"</Label>
                    <NativeSelect id="semester" options=semester_options(Some("All semesters")) bind_value=semester />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="subject">"Subject"</Label>
                    <Input id="subject" placeholder="e.g. Data Structures" bind_value=subject />
                </div>
                <Button size=ButtonSize::Default>"Apply"</Button>
            </form>

            <Show when=move || !loading.get() fallback=|| view! { <PageSpinner /> }>
                <Show
                    when=move || notes.with(|n| !n.is_empty())
                    fallback=|| view! {
                        <p class="py-16 text-center text-muted-foreground">"No notes match these filters yet."</p>
                    }
                >
                    <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=move || notes.get()
                            key=|n| n.id.clone()
                            children=|note| view! { <NoteCard note=note /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}
