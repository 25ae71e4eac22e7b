use crate::components::ui::{
    Alert, AlertDescription, Button, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label,
    Spinner,
};
use crate::flows::account::{submit_auth, AuthForm, AuthMode, AuthOutcome};
use crate::state::{AppContext, ToastKind};
use crate::validation::{MAX_COURSE_CHARS, MAX_EMAIL_CHARS, MAX_FULL_NAME_CHARS, MAX_UNIVERSITY_CHARS};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;

#[component]
pub fn AuthPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let mode: RwSignal<AuthMode> = RwSignal::new(AuthMode::SignIn);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let university = RwSignal::new(String::new());
    let course = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading = RwSignal::new(false);

    let state = app_state.0;
    let signed_in = move || state.session.with(Option::is_some);
    let is_sign_up = move || mode.get() == AuthMode::SignUp;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let form = AuthForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
            full_name: full_name.get_untracked(),
            university: university.get_untracked(),
            course: course.get_untracked(),
        };
        let current = mode.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match submit_auth(&state.client(), current, &form).await {
                Ok(outcome @ AuthOutcome::SignedIn) => state.success(outcome.toast()),
                Ok(outcome @ AuthOutcome::ConfirmationSent) => {
                    state.notify(ToastKind::Info, outcome.toast());
                    password.set(String::new());
                    mode.set(AuthMode::SignIn);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "authentication failed");
                    error.set(Some(e.user_message()));
                }
            }
            loading.set(false);
        });
    };

    let tab_class = move |m: AuthMode| {
        if mode.get() == m {
            "flex-1 rounded-md bg-background px-3 py-1.5 text-sm font-medium shadow-sm"
        } else {
            "flex-1 rounded-md px-3 py-1.5 text-sm text-muted-foreground"
        }
    };
    let switch_to = move |m: AuthMode| {
        mode.set(m);
        error.set(None);
    };

    view! {
        <Show when=move || !signed_in() fallback=|| view! { <Redirect path="/notes" /> }>
            <div class="mx-auto flex min-h-[80vh] w-full max-w-md flex-col justify-center px-4 py-10">
                <Card>
                    <CardHeader>
                        <CardTitle class="text-2xl">"Welcome to Padhai Co"</CardTitle>
                        <CardDescription>"Share notes, earn Gyan Points, learn together."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <div class="mb-4 flex gap-1 rounded-lg bg-muted p-1" role="tablist">
                            <button type="button" role="tab" class=move || tab_class(AuthMode::SignIn)
                                on:click=move |_| switch_to(AuthMode::SignIn)>"Sign In"</button>
                            <button type="button" role="tab" class=move || tab_class(AuthMode::SignUp)
                                on:click=move |_| switch_to(AuthMode::SignUp)>"Sign Up"</button>
                        </div>

                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <Show when=is_sign_up>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="full_name">"Full name"</Label>
                                    <Input id="full_name" bind_value=full_name maxlength=MAX_FULL_NAME_CHARS />
                                </div>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="university">"University (optional)"</Label>
                                    <Input id="university" bind_value=university maxlength=MAX_UNIVERSITY_CHARS />
                                </div>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="course">"Course (optional)"</Label>
                                    <Input id="course" bind_value=course maxlength=MAX_COURSE_CHARS />
                                </div>
                            </Show>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@college.edu"
                                    bind_value=email
                                    required=true
                                    maxlength=MAX_EMAIL_CHARS
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password">"Password"</Label>
                                <Input id="password" r#type="password" bind_value=password required=true />
                            </div>

                            {move || {
                                error.get().map(|e| {
                                    view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}

                            <Button class="w-full" attr:disabled=move || loading.get()>
                                <Show when=move || loading.get()>
                                    <Spinner />
                                </Show>
                                {move || mode.get().submit_label()}
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </Show>
    }
}
