use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::components::Redirect;

/// Renders `children` only with a session; otherwise sends the viewer to `/auth`.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.session.with(Option::is_some);

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=|| view! { <Redirect path="/auth" /> }>
            {move || children.with_value(|c| c())}
        </Show>
    }
}
