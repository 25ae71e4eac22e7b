use crate::models::{NoteStatus, ReputationLevel};
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

mod components {
    use super::*;
    clx! {Badge, span, "inline-flex w-fit items-center rounded-md px-2 py-0.5 text-xs font-medium whitespace-nowrap"}
}

pub use components::*;

#[component]
pub fn ReputationBadge(level: ReputationLevel, #[prop(into, optional)] class: String) -> impl IntoView {
    let class = tw_merge!(level.badge_class(), class);
    view! { <Badge class=class>{level.to_string()}</Badge> }
}

#[component]
pub fn StatusBadge(#[prop(into)] status: Signal<NoteStatus>) -> impl IntoView {
    move || {
        let s = status.get();
        view! { <Badge class=s.badge_class()>{s.to_string()}</Badge> }
    }
}
