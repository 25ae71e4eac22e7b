use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle, Label,
    PageSpinner, ReputationBadge, Spinner, StatusBadge, Textarea,
};
use crate::components::FilePreview;
use crate::flows::notes::{load_note, save_note};
use crate::flows::reports::submit_report;
use crate::flows::voting::{cast_vote, load_viewer_vote};
use crate::flows::FlowError;
use crate::models::{Note, VoteType};
use crate::state::{AppContext, ToastKind};
use crate::util::{format_date, format_score};
use crate::validation::MAX_REASON_CHARS;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params};
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NoteRouteParams {
    pub note_id: Option<String>,
}

#[component]
pub fn NoteDetailPage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let params = use_params::<NoteRouteParams>();
    let navigate = StoredValue::new(use_navigate());

    // Anonymous viewers are sent to `/auth`.
    let report_failure = move |context: &str, err: &FlowError| {
        state.flow_error(context, err);
        if err.needs_login() {
            navigate.with_value(|nav| nav("/auth", Default::default()));
        }
    };

    let note_id = move || params.get().ok().and_then(|p| p.note_id).unwrap_or_default();

    let note: RwSignal<Option<Note>> = RwSignal::new(None);
    let my_vote: RwSignal<Option<VoteType>> = RwSignal::new(None);
    let voting = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let report_open = RwSignal::new(false);
    let report_reason = RwSignal::new(String::new());
    let reporting = RwSignal::new(false);

    let reload = move |id: String, with_vote: bool| {
        let viewer = state.user_id();
        spawn_local(async move {
            let client = state.client();
            match load_note(&client, &id).await {
                Ok(n) => note.set(Some(n)),
                Err(e) => {
                    tracing::warn!(note_id = %id, error = %e, "note load failed");
                    state.notify(ToastKind::Error, "Failed to load note");
                    navigate.with_value(|nav| nav("/notes", Default::default()));
                    return;
                }
            }
            if !with_vote {
                return;
            }
            if let Some(uid) = viewer {
                match load_viewer_vote(&client, &id, &uid).await {
                    Ok(v) => my_vote.set(v),
                    Err(e) => tracing::warn!(error = %e, "vote lookup failed"),
                }
            }
        });
    };

    Effect::new(move |_| {
        let id = note_id();
        if id.is_empty() {
            return;
        }
        note.set(None);
        my_vote.set(None);
        reload(id, true);
    });

    let on_vote = move |clicked: VoteType| {
        if voting.get_untracked() {
            return;
        }
        let id = note_id();
        let viewer = state.user_id();
        let current = my_vote.get_untracked();
        voting.set(true);
        spawn_local(async move {
            match cast_vote(&state.client(), viewer.as_deref(), &id, current, clicked).await {
                Ok(action) => {
                    my_vote.set(action.next_state());
                    state.success(action.toast());
                    reload(id, false);
                }
                Err(e) => report_failure("vote", &e),
            }
            voting.set(false);
        });
    };

    let on_save = move |_| {
        if saving.get_untracked() {
            return;
        }
        let id = note_id();
        let viewer = state.user_id();
        saving.set(true);
        spawn_local(async move {
            match save_note(&state.client(), viewer.as_deref(), &id).await {
                Ok(()) => state.success("Saved to your library"),
                Err(e) => report_failure("save", &e),
            }
            saving.set(false);
        });
    };

    let on_report = move |_| {
        if reporting.get_untracked() {
            return;
        }
        let id = note_id();
        let viewer = state.user_id();
        let reason = report_reason.get_untracked();
        reporting.set(true);
        spawn_local(async move {
            match submit_report(&state.client(), viewer.as_deref(), &id, &reason).await {
                Ok(()) => {
                    state.success("Report submitted successfully");
                    report_reason.set(String::new());
                    report_open.set(false);
                }
                Err(e) => report_failure("report", &e),
            }
            reporting.set(false);
        });
    };

    let vote_variant = move |kind: VoteType| {
        if my_vote.get() != Some(kind) {
            ButtonVariant::Outline
        } else if kind == VoteType::Upvote {
            ButtonVariant::Default
        } else {
            ButtonVariant::Destructive
        }
    };

    view! {
        <div class="mx-auto max-w-6xl px-4 py-8">
            <a href="/notes" class="mb-6 inline-block text-sm text-muted-foreground hover:text-foreground">
                "← Back to Notes"
            </a>

            {move || match note.get() {
                None => view! { <PageSpinner /> }.into_any(),
                Some(n) => {
                    let uploader = n.uploader();
                    let status = n.status;
                    let level = uploader.reputation_level;
                    let uploader_name = uploader.full_name;
                    let title = n.topic.clone();
                    let preview_title = n.topic.clone();
                    let semester_label = format!("Semester {}", n.semester);
                    let subject = n.subject.clone();
                    let preview_url = n.file_url.clone();
                    let download_url = n.file_url.clone();
                    let file_type = n.file_type.clone();
                    let uploaded_on = format_date(&n.created_at);
                    let trust = format_score(n.trust_score);
                    let has_tags = !n.tags.is_empty();
                    let tag_chips = n
                        .tags
                        .iter()
                        .map(|t| view! { <span class="rounded bg-muted px-2 py-0.5 text-xs">{format!("#{t}")}</span> })
                        .collect_view();
                    view! {
                        <div class="grid gap-8 lg:grid-cols-3">
                            <div class="lg:col-span-2">
                                <Card>
                                    <CardHeader>
                                        <div class="flex items-start justify-between gap-4">
                                            <div class="space-y-2">
                                                <CardTitle class="text-2xl">{title}</CardTitle>
                                                <div class="flex flex-wrap gap-2 text-xs">
                                                    <span class="rounded-md bg-secondary px-2 py-0.5">{semester_label}</span>
                                                    <span class="rounded-md border px-2 py-0.5">{subject}</span>
                                                    <StatusBadge status=status />
                                                </div>
                                            </div>
                                            <ReputationBadge level=level />
                                        </div>
                                    </CardHeader>
                                    <CardContent class="space-y-6">
                                        <FilePreview url=preview_url file_type=file_type title=preview_title />

                                        <div class="flex flex-wrap items-center justify-between gap-3">
                                            <div class="flex gap-2">
                                                {move || view! {
                                                    <Button
                                                        variant=vote_variant(VoteType::Upvote)
                                                        size=ButtonSize::Sm
                                                        attr:disabled=move || voting.get()
                                                        on:click=move |_| on_vote(VoteType::Upvote)
                                                    >
                                                        {format!("▲ {}", note.with(|n| n.as_ref().map(|n| n.upvotes).unwrap_or_default()))}
                                                    </Button>
                                                    <Button
                                                        variant=vote_variant(VoteType::Downvote)
                                                        size=ButtonSize::Sm
                                                        attr:disabled=move || voting.get()
                                                        on:click=move |_| on_vote(VoteType::Downvote)
                                                    >
                                                        {format!("▼ {}", note.with(|n| n.as_ref().map(|n| n.downvotes).unwrap_or_default()))}
                                                    </Button>
                                                }}
                                            </div>
                                            <div class="flex gap-2">
                                                <Button
                                                    variant=ButtonVariant::Secondary
                                                    size=ButtonSize::Sm
                                                    attr:disabled=move || saving.get()
                                                    on:click=on_save
                                                >
                                                    "Save to Library"
                                                </Button>
                                                <a
                                                    href=download_url
                                                    target="_blank"
                                                    rel="noopener"
                                                    class="inline-flex h-8 items-center rounded-md border px-3 text-sm hover:bg-accent"
                                                >
                                                    "Open file"
                                                </a>
                                                <Button
                                                    variant=ButtonVariant::Outline
                                                    size=ButtonSize::Sm
                                                    on:click=move |_| report_open.update(|o| *o = !*o)
                                                >
                                                    "Report"
                                                </Button>
                                            </div>
                                        </div>

                                        <Show when=move || report_open.get()>
                                            <div class="space-y-3 rounded-lg border p-4">
                                                <Label html_for="reason">"Reason for reporting"</Label>
                                                <p class="text-xs text-muted-foreground">
                                                    "Help us maintain quality by reporting inappropriate content."
                                                </p>
                                                <Textarea
                                                    id="reason"
                                                    placeholder="Please describe why you're reporting this note..."
                                                    bind_value=report_reason
                                                    maxlength=MAX_REASON_CHARS
                                                />
                                                <Button class="w-full" attr:disabled=move || reporting.get() on:click=on_report>
                                                    <Show when=move || reporting.get()>
                                                        <Spinner />
                                                    </Show>
                                                    "Submit Report"
                                                </Button>
                                            </div>
                                        </Show>
                                    </CardContent>
                                </Card>
                            </div>

                            <div class="space-y-6">
                                <Card>
                                    <CardHeader>
                                        <CardTitle class="text-lg">"Uploaded By"</CardTitle>
                                    </CardHeader>
                                    <CardContent class="space-y-2 text-sm">
                                        <p class="font-medium">{uploader_name}</p>
                                        <p>{level.to_string()}</p>
                                        <p class="text-muted-foreground">{uploaded_on}</p>
                                    </CardContent>
                                </Card>
                                <Card>
                                    <CardHeader>
                                        <CardTitle class="text-lg">"Trust Score"</CardTitle>
                                        <CardDescription>"Community verified quality"</CardDescription>
                                    </CardHeader>
                                    <CardContent>
                                        <p class="text-center text-4xl font-bold text-success">{trust}</p>
                                    </CardContent>
                                </Card>
                                {has_tags.then(move || view! {
                                    <Card>
                                        <CardHeader>
                                            <CardTitle class="text-lg">"Tags"</CardTitle>
                                        </CardHeader>
                                        <CardContent class="flex flex-wrap gap-1">
                                            {tag_chips}
                                        </CardContent>
                                    </Card>
                                })}
                            </div>
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
