use super::{require_viewer, FlowError, FlowResult};
use crate::api::supabase::SignUpOutcome;
use crate::api::{fetch_optional, Backend, Query, SupabaseClient};
use crate::models::Profile;
use crate::validation::{validate_auth, AuthDraft};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// Raw auth form fields.
#[derive(Clone, Debug, Default)]
pub(crate) struct AuthForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub university: String,
    pub course: String,
}

impl AuthMode {
    /// Sign-up fields are only validated on the sign-up tab.
    pub fn draft(self, form: &AuthForm) -> AuthDraft {
        let sign_up = |v: &String| (self == AuthMode::SignUp).then(|| v.clone());
        AuthDraft {
            email: form.email.clone(),
            password: form.password.clone(),
            full_name: sign_up(&form.full_name),
            university: sign_up(&form.university),
            course: sign_up(&form.course),
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign In",
            AuthMode::SignUp => "Create Account",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AuthOutcome {
    SignedIn,
    ConfirmationSent,
}

impl AuthOutcome {
    pub fn toast(self) -> &'static str {
        match self {
            AuthOutcome::SignedIn => "Welcome back!",
            AuthOutcome::ConfirmationSent => "Check your email to confirm your account",
        }
    }
}

pub(crate) async fn submit_auth(
    client: &SupabaseClient,
    mode: AuthMode,
    form: &AuthForm,
) -> FlowResult<AuthOutcome> {
    let valid = validate_auth(&mode.draft(form))?;
    let outcome = match mode {
        AuthMode::SignIn => {
            client.sign_in_with_password(&valid.email, &valid.password).await?;
            AuthOutcome::SignedIn
        }
        AuthMode::SignUp => match client.sign_up(&valid).await? {
            SignUpOutcome::SignedIn(_) => AuthOutcome::SignedIn,
            SignUpOutcome::ConfirmationSent => AuthOutcome::ConfirmationSent,
        },
    };
    Ok(outcome)
}

/// The viewer's own profile row: display name, reputation and Gyan Points.
pub(crate) async fn load_profile<B: Backend + ?Sized>(backend: &B, viewer: Option<&str>) -> FlowResult<Profile> {
    let user_id = require_viewer(viewer)?;
    let q = Query::from("profiles")
        .select("id, full_name, email, reputation_level, gyan_points")
        .eq("id", user_id);
    fetch_optional(backend, q).await?.ok_or(FlowError::NotFound)
}
