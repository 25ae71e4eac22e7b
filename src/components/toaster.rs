use crate::state::AppContext;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Toaster() -> impl IntoView {
    let toasts = expect_context::<AppContext>().0.toasts;

    view! {
        <div class="pointer-events-none fixed bottom-4 right-4 z-50 flex w-80 flex-col gap-2" aria-live="polite">
            <For
                each=move || toasts.with(|q| q.items().to_vec())
                key=|t| t.id
                children=move |t| {
                    let id = t.id;
                    let class = tw_merge!(
                        "pointer-events-auto flex items-start justify-between gap-3 rounded-lg border px-4 py-3 text-sm shadow-md",
                        t.kind.class()
                    );
                    view! {
                        <div class=class role="status">
                            <span>{t.message}</span>
                            <button
                                class="text-xs text-muted-foreground hover:text-foreground"
                                aria-label="Dismiss"
                                on:click=move |_| toasts.update(|q| q.dismiss(id))
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
