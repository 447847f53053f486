//! Login page with the username/password form.

use dioxus::prelude::*;
use ui::{use_api, use_auth, AuthState};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let client = use_api();
    let mut auth = use_auth();
    let nav = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    // Already signed in (or the restored token just validated): go home.
    use_effect(move || {
        let state = auth();
        if !state.loading && state.user.is_some() {
            nav.replace(Route::Dashboard {});
        }
    });

    let submit = move |evt: Event<FormData>| {
        evt.prevent_default();
        let client = client.clone();
        async move {
            let name = username().trim().to_string();
            let pass = password();
            if name.is_empty() || pass.is_empty() {
                error.set(Some("Enter a username and password".to_string()));
                return;
            }
            busy.set(true);
            error.set(None);
            match client.login(&name, &pass).await {
                Ok(user) => {
                    auth.set(AuthState::signed_in(user));
                    nav.replace(Route::Dashboard {});
                }
                Err(e) => {
                    // The session holds no token after a failed attempt; the
                    // form just surfaces the backend's message.
                    error.set(Some(e.user_message()));
                }
            }
            busy.set(false);
        }
    };

    rsx! {
        div {
            class: "login-page",
            form {
                class: "login-card",
                onsubmit: submit,

                h1 { "Fieldlog" }
                p { class: "login-subtitle", "Sign in to your fieldwork journal" }

                if let Some(message) = error() {
                    div { class: "form-error", "{message}" }
                }

                label {
                    "Username"
                    input {
                        r#type: "text",
                        value: "{username}",
                        autocomplete: "username",
                        oninput: move |evt| username.set(evt.value()),
                    }
                }
                label {
                    "Password"
                    input {
                        r#type: "password",
                        value: "{password}",
                        autocomplete: "current-password",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
