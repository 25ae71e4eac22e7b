use leptos::prelude::*;

/// Inline preview: PDFs in an iframe, everything else as an image.
#[component]
pub fn FilePreview(
    #[prop(into)] url: String,
    #[prop(into)] file_type: String,
    #[prop(into)] title: String,
) -> impl IntoView {
    if file_type.contains("pdf") {
        view! {
            <iframe src=url title=title class="h-[600px] w-full rounded-lg border bg-muted" />
        }
        .into_any()
    } else {
        view! {
            <img src=url alt=title class="max-h-[600px] w-full rounded-lg border object-contain" />
        }
        .into_any()
    }
}
