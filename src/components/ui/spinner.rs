use icons::LoaderCircle;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <LoaderCircle class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Centered spinner for a page or section that is still loading.
#[component]
pub fn PageSpinner() -> impl IntoView {
    view! {
        <div class="flex min-h-[40vh] items-center justify-center">
            <Spinner class="size-8 text-primary" />
        </div>
    }
}
