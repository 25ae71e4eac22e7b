use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle, PageSpinner,
    Spinner, StatusBadge,
};
use crate::flows::moderation::{dismiss_report, load_moderation, set_note_status, ModerationAccess, Moderator, ReportBoard};
use crate::models::{NoteStatus, Report};
use crate::state::AppContext;
use crate::util::format_date;
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gate {
    Checking,
    Denied,
    Granted,
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let gate = RwSignal::new(Gate::Checking);
    let board: RwSignal<ReportBoard> = RwSignal::new(ReportBoard::default());
    let moderator: StoredValue<Option<Moderator>> = StoredValue::new(None);

    Effect::new(move |_| {
        let viewer = state.session.with(|s| s.as_ref().map(|s| s.user.id.clone()));
        gate.set(Gate::Checking);
        spawn_local(async move {
            match load_moderation(&state.client(), viewer.as_deref()).await {
                Ok(ModerationAccess::Granted { moderator: m, reports }) => {
                    moderator.set_value(Some(m));
                    board.set(ReportBoard::new(reports));
                    gate.set(Gate::Granted);
                }
                Ok(ModerationAccess::Denied) => gate.set(Gate::Denied),
                Err(e) => {
                    state.flow_error("moderation", &e);
                    gate.set(Gate::Denied);
                }
            }
        });
    });

    let on_status = move |report_id: String, note_id: String, status: NoteStatus| {
        let Some(m) = moderator.get_value() else {
            return;
        };
        let mut started = false;
        board.update(|b| started = b.begin(&report_id));
        if !started {
            return;
        }
        spawn_local(async move {
            match set_note_status(&state.client(), &m, &note_id, status).await {
                Ok(()) => {
                    board.update(|b| b.apply_status(&note_id, status));
                    state.success(format!("Note status updated to {status}"));
                }
                Err(e) => state.flow_error("update note status", &e),
            }
            board.update(|b| b.finish(&report_id));
        });
    };

    let on_dismiss = move |report_id: String| {
        let Some(m) = moderator.get_value() else {
            return;
        };
        let mut started = false;
        board.update(|b| started = b.begin(&report_id));
        if !started {
            return;
        }
        spawn_local(async move {
            match dismiss_report(&state.client(), &m, &report_id).await {
                Ok(()) => {
                    board.update(|b| b.remove(&report_id));
                    state.success("Report dismissed");
                }
                Err(e) => {
                    state.flow_error("dismiss report", &e);
                    board.update(|b| b.finish(&report_id));
                }
            }
        });
    };

    let report_row = move |report: Report| {
        let busy = {
            let id = report.id.clone();
            move || board.with(|b| b.is_busy(&id))
        };
        let status = {
            let id = report.id.clone();
            Signal::derive(move || {
                board.with(|b| {
                    b.reports
                        .iter()
                        .find(|r| r.id == id)
                        .and_then(|r| r.notes.as_ref())
                        .map(|n| n.status)
                        .unwrap_or(NoteStatus::Pending)
                })
            })
        };
        let (topic, subject) = report
            .notes
            .as_ref()
            .map(|n| (n.topic.clone(), n.subject.clone()))
            .unwrap_or_else(|| ("Deleted note".to_string(), String::new()));
        let reporter = report
            .profiles
            .as_ref()
            .map(|p| match &p.email {
                Some(email) => format!("{} ({email})", p.full_name),
                None => p.full_name.clone(),
            })
            .unwrap_or_else(|| "Unknown".to_string());
        let report_id = report.id.clone();
        let note_id = report.note_id.clone();

        view! {
            <Card>
                <CardHeader>
                    <div class="flex items-start justify-between gap-4">
                        <div class="space-y-1">
                            <CardTitle class="text-lg">
                                <a href=format!("/notes/{}", report.note_id) class="hover:underline">{topic}</a>
                            </CardTitle>
                            <CardDescription>{subject}</CardDescription>
                        </div>
                        <StatusBadge status=status />
                    </div>
                </CardHeader>
                <CardContent class="space-y-4">
                    <div class="rounded-md bg-muted p-3 text-sm">
                        <p class="font-medium">"Reason"</p>
                        <p class="whitespace-pre-wrap text-muted-foreground">{report.reason.clone()}</p>
                    </div>
                    <p class="text-xs text-muted-foreground">
                        {format!("Reported by {reporter} on {}", format_date(&report.created_at))}
                    </p>
                    <div class="flex flex-wrap items-center gap-2">
                        {NoteStatus::iter()
                            .map(|s| {
                                let report_id = report_id.clone();
                                let note_id = note_id.clone();
                                let busy = busy.clone();
                                let variant = match s {
                                    NoteStatus::Approved => ButtonVariant::Success,
                                    NoteStatus::Pending => ButtonVariant::Secondary,
                                    NoteStatus::Quarantined => ButtonVariant::Destructive,
                                };
                                view! {
                                    <Button
                                        variant=variant
                                        size=ButtonSize::Sm
                                        attr:disabled=move || busy() || status.get() == s
                                        on:click=move |_| on_status(report_id.clone(), note_id.clone(), s)
                                    >
                                        {s.action_label()}
                                    </Button>
                                }
                            })
                            .collect_view()}
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=busy.clone()
                            on:click={
                                let report_id = report_id.clone();
                                move |_| on_dismiss(report_id.clone())
                            }
                        >
                            "Dismiss"
                        </Button>
                        <Show when=busy>
                            <Spinner />
                        </Show>
                    </div>
                </CardContent>
            </Card>
        }
    };

    view! {
        <div class="mx-auto max-w-4xl px-4 py-10">
            {move || match gate.get() {
                Gate::Checking => view! { <PageSpinner /> }.into_any(),
                Gate::Denied => view! {
                    <Card class="mx-auto max-w-md text-center">
                        <CardHeader>
                            <CardTitle class="text-2xl">"Access Denied"</CardTitle>
                            <CardDescription>"You need moderator or admin privileges to view this page."</CardDescription>
                        </CardHeader>
                        <CardContent>
                            <a href="/notes" class="text-sm font-medium text-primary hover:underline">"Back to notes"</a>
                        </CardContent>
                    </Card>
                }
                .into_any(),
                Gate::Granted => view! {
                    <div class="mb-8">
                        <h1 class="text-3xl font-bold">"Moderation Queue"</h1>
                        <p class="text-muted-foreground">
                            {move || format!("{} open reports", board.with(|b| b.reports.len()))}
                        </p>
                    </div>
                    <Show
                        when=move || board.with(|b| !b.is_empty())
                        fallback=|| view! {
                            <p class="py-16 text-center text-muted-foreground">"No reports to review. All clear!"</p>
                        }
                    >
                        <div class="space-y-4">
                            <For
                                each=move || board.with(|b| b.reports.clone())
                                key=|r| r.id.clone()
                                children=report_row
                            />
                        </div>
                    </Show>
                }
                .into_any(),
            }}
        </div>
    }
}
