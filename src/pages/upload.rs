use super::browse::semester_options;
use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label, NativeSelect,
    Spinner,
};
use crate::flows::upload::submit_upload;
use crate::state::{AppContext, ToastKind};
use crate::util::now_ms;
use crate::validation::{
    validate_file, PickedFile, UploadDraft, ALLOWED_MIME_TYPES, MAX_FILE_BYTES, MAX_SUBJECT_CHARS, MAX_TAGS_RAW_CHARS,
    MAX_TOPIC_CHARS,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

fn picked_metadata(file: &web_sys::File) -> PickedFile {
    PickedFile {
        name: file.name(),
        mime: file.type_(),
        size: file.size() as u64,
        bytes: Vec::new(),
    }
}

async fn read_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buf = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| "Could not read file".to_string()))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let semester = RwSignal::new(String::new());
    let subject = RwSignal::new(String::new());
    let topic = RwSignal::new(String::new());
    let tags = RwSignal::new(String::new());
    let file: RwSignal<Option<PickedFile>> = RwSignal::new(None);
    let reading = RwSignal::new(false);
    let submitting = RwSignal::new(false);

    // Bytes are only read for files that pass the size and type checks.
    let on_file_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(picked) = input.files().and_then(|list| list.get(0)) else {
            file.set(None);
            return;
        };

        let meta = picked_metadata(&picked);
        if let Err(e) = validate_file(&meta) {
            state.notify(ToastKind::Error, e.to_string());
            input.set_value("");
            file.set(None);
            return;
        }

        file.set(Some(meta.clone()));
        reading.set(true);
        spawn_local(async move {
            match read_bytes(&picked).await {
                Ok(bytes) => file.set(Some(PickedFile { bytes, ..meta })),
                Err(e) => {
                    tracing::warn!(error = %e, "file read failed");
                    state.notify(ToastKind::Error, e);
                    file.set(None);
                }
            }
            reading.set(false);
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() || reading.get_untracked() {
            return;
        }

        let draft = UploadDraft {
            semester: semester.get_untracked(),
            subject: subject.get_untracked(),
            topic: topic.get_untracked(),
            tags: tags.get_untracked(),
            file: file.get_untracked(),
        };
        let viewer = state.user_id();
        let bucket = state.bucket();

        submitting.set(true);
        spawn_local(async move {
            let res = submit_upload(&state.client(), &bucket, viewer.as_deref(), &draft, now_ms()).await;
            submitting.set(false);
            match res {
                Ok(receipt) => {
                    match receipt.award_error {
                        None => state.success("Note uploaded successfully! You earned 10 Gyan Points!"),
                        Some(e) => {
                            state.success("Note uploaded successfully!");
                            state.notify(ToastKind::Error, format!("Gyan Points could not be awarded: {e}"));
                        }
                    }
                    state.refresh_profile();
                    navigate.with_value(|nav| nav("/notes", Default::default()));
                }
                Err(e) if e.needs_login() => {
                    state.flow_error("upload", &e);
                    navigate.with_value(|nav| nav("/auth", Default::default()));
                }
                Err(e) => state.flow_error("upload", &e),
            }
        });
    };

    let accept = ALLOWED_MIME_TYPES.join(",");
    let busy = move || submitting.get() || reading.get();

    view! {
        <div class="mx-auto max-w-2xl px-4 py-10">
            <Card>
                <CardHeader>
                    <CardTitle class="text-2xl">"Upload Notes"</CardTitle>
                    <CardDescription>
                        "Share your notes with other students. PDFs and images up to 10 MB."
                    </CardDescription>
                </CardHeader>
                <CardContent>
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="semester">"Semester"</Label>
                            <NativeSelect id="semester" options=semester_options(Some("Select semester")) bind_value=semester />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="subject">"Subject"</Label>
                            <Input id="subject" placeholder="e.g. Data Structures" bind_value=subject maxlength=MAX_SUBJECT_CHARS />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="topic">"Topic"</Label>
                            <Input id="topic" placeholder="e.g. AVL Trees" bind_value=topic maxlength=MAX_TOPIC_CHARS />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="tags">"Tags (comma separated, up to 10)"</Label>
                            <Input id="tags" placeholder="trees, balancing, exam" bind_value=tags maxlength=MAX_TAGS_RAW_CHARS />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="file">"File"</Label>
                            <input
                                id="file"
                                type="file"
                                accept=accept
                                class="text-sm file:mr-3 file:rounded-md file:border-0 file:bg-secondary file:px-3 file:py-1.5 file:text-sm"
                                on:change=on_file_change
                            />
                            {move || {
                                file.get().map(|f| {
                                    view! {
                                        <p class="text-xs text-muted-foreground">
                                            {format!("{} ({})", f.name, human_size(f.size))}
                                        </p>
                                    }
                                })
                            }}
                        </div>

                        <Button size=ButtonSize::Lg class="w-full" attr:disabled=busy>
                            <Show when=busy>
                                <Spinner />
                            </Show>
                            {move || if submitting.get() { "Uploading..." } else { "Upload Note" }}
                        </Button>
                        <p class="text-center text-xs text-muted-foreground">
                            {format!("Max file size {}", human_size(MAX_FILE_BYTES))}
                        </p>
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_readable() {
        assert_eq!(human_size(MAX_FILE_BYTES), "10.0 MB");
        assert_eq!(human_size(1500), "2 KB");
    }
}
