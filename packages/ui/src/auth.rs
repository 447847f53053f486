//! Authentication context and hooks for the UI.

use api::models::User;
use dioxus::prelude::*;

use crate::client::use_api;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    /// True while the persisted token is still being validated on startup.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin())
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Common error handling for view-level API calls: an authorization failure
/// flips the auth state to signed-out (the session itself was already
/// cleared by the HTTP layer), everything else just yields its message.
pub fn handle_api_error(mut auth: Signal<AuthState>, error: &api::ApiError) -> String {
    if matches!(error, api::ApiError::Unauthorized) {
        auth.set(AuthState::signed_out());
    }
    error.user_message()
}

/// Send the browser to the login page after a sign-out.
pub fn redirect_to_login() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href("/login");
        }
    }
}

/// Provider component that restores and validates the persisted session.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let client = use_api();
    let mut auth_state = use_signal(AuthState::default);

    // Restore the persisted token on mount, then validate it against the
    // backend. Any failure lands in signed-out with the token cleared.
    let _ = use_resource(move || {
        let client = client.clone();
        async move {
            if !client.session().restore().await {
                auth_state.set(AuthState::signed_out());
                return;
            }
            if client.revalidate().await {
                if let Some(user) = client.session().user() {
                    auth_state.set(AuthState::signed_in(user));
                    return;
                }
            }
            auth_state.set(AuthState::signed_out());
        }
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let client = use_api();
    let mut auth_state = use_auth();

    let onclick = move |_| {
        let client = client.clone();
        async move {
            client.logout().await;
            auth_state.set(AuthState::signed_out());
            redirect_to_login();
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
