use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const FIELD: &str = "placeholder:text-muted-foreground dark:bg-input/30 border-input w-full min-w-0 rounded-md border bg-transparent px-3 text-base shadow-xs outline-none transition-[color,box-shadow] focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50 disabled:cursor-not-allowed disabled:opacity-50 md:text-sm";

/// Value of the element that fired `ev`, for text inputs, textareas and selects.
fn event_value(ev: &web_sys::Event) -> Option<String> {
    let target = ev.target()?;
    if let Some(el) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(el.value());
    }
    if let Some(el) = target.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return Some(el.value());
    }
    target
        .dyn_ref::<web_sys::HtmlSelectElement>()
        .map(|el| el.value())
}

/// Text input bound to a signal. `bind:value` is avoided; the wiring is manual.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] required: bool,
    #[prop(into, optional)] disabled: Signal<bool>,
    #[prop(optional)] maxlength: Option<usize>,
    bind_value: RwSignal<String>,
) -> impl IntoView {
    let class = tw_merge!(FIELD, "h-9 py-1", class);

    view! {
        <input
            data-name="Input"
            type=r#type
            class=class
            placeholder=placeholder
            id=id
            required=required
            disabled=move || disabled.get()
            maxlength=maxlength.map(|n| n.to_string())
            prop:value=move || bind_value.get()
            on:input=move |ev| {
                if let Some(v) = event_value(&ev) {
                    bind_value.set(v);
                }
            }
        />
    }
}

#[component]
pub fn Textarea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(default = 4)] rows: u32,
    #[prop(optional)] maxlength: Option<usize>,
    bind_value: RwSignal<String>,
) -> impl IntoView {
    let class = tw_merge!(FIELD, "min-h-16 py-2", class);

    view! {
        <textarea
            data-name="Textarea"
            class=class
            placeholder=placeholder
            id=id
            rows=rows
            maxlength=maxlength.map(|n| n.to_string())
            prop:value=move || bind_value.get()
            on:input=move |ev| {
                if let Some(v) = event_value(&ev) {
                    bind_value.set(v);
                }
            }
        />
    }
}

/// `<select>` over `(value, label)` pairs.
#[component]
pub fn NativeSelect(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    options: Vec<(String, String)>,
    bind_value: RwSignal<String>,
) -> impl IntoView {
    let class = tw_merge!(FIELD, "h-9 py-1", class);

    view! {
        <select
            data-name="NativeSelect"
            class=class
            id=id
            prop:value=move || bind_value.get()
            on:change=move |ev| {
                if let Some(v) = event_value(&ev) {
                    bind_value.set(v);
                }
            }
        >
            {options
                .into_iter()
                .map(|(value, label)| {
                    let selected = value == bind_value.get_untracked();
                    view! { <option value=value selected=selected>{label}</option> }
                })
                .collect_view()}
        </select>
    }
}
