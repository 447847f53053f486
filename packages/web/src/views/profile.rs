//! Profile dialog: any signed-in user edits their own contact details and
//! changes their password. Two independent forms behind one overlay, each
//! with its own save path.

use api::models::{PasswordChange, ProfilePayload, User};
use dioxus::prelude::*;
use ui::{handle_api_error, use_api, use_auth, use_snackbar, AuthState, ModalOverlay, Snackbar};

#[component]
pub fn ProfileDialog(user: User, on_close: EventHandler<()>) -> Element {
    let client = use_api();
    let mut auth = use_auth();
    let mut snackbar = use_snackbar();

    let user_id = user.id;
    let mut email = use_signal(|| user.email.clone());
    let mut full_name = use_signal(|| user.full_name.clone().unwrap_or_default());

    let mut old_password = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);

    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let profile_client = client.clone();
    let save_profile = move |_| {
        let client = profile_client.clone();
        async move {
            let mail = email().trim().to_string();
            if mail.is_empty() {
                error.set(Some("An email address is required".to_string()));
                return;
            }
            let payload = ProfilePayload {
                email: mail,
                full_name: Some(full_name()).filter(|s| !s.is_empty()),
            };

            busy.set(true);
            error.set(None);
            match client.update_profile(user_id, &payload).await {
                Ok(saved) => {
                    snackbar.set(Some(Snackbar::success("Profile updated")));
                    // The nav footer shows the profile, so refresh it here.
                    auth.set(AuthState::signed_in(saved));
                }
                Err(e) => error.set(Some(handle_api_error(auth, &e))),
            }
            busy.set(false);
        }
    };

    let password_client = client.clone();
    let save_password = move |_| {
        let client = password_client.clone();
        async move {
            let change = match PasswordChange::validate(
                &old_password(),
                &new_password(),
                &confirm_password(),
            ) {
                Ok(change) => change,
                Err(message) => {
                    error.set(Some(message));
                    return;
                }
            };

            busy.set(true);
            error.set(None);
            match client.change_password(user_id, &change).await {
                Ok(()) => {
                    snackbar.set(Some(Snackbar::success("Password changed")));
                    old_password.set(String::new());
                    new_password.set(String::new());
                    confirm_password.set(String::new());
                }
                Err(e) => error.set(Some(handle_api_error(auth, &e))),
            }
            busy.set(false);
        }
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| on_close.call(()),
            div {
                class: "form-dialog",
                h3 { "Your profile" }
                p { class: "muted", "{user.username} \u{00b7} {user.role.label()}" }

                if let Some(message) = error() {
                    div { class: "form-error", "{message}" }
                }

                label {
                    "Email"
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label {
                    "Full name"
                    input {
                        r#type: "text",
                        value: "{full_name}",
                        oninput: move |evt| full_name.set(evt.value()),
                    }
                }
                div {
                    class: "dialog-actions",
                    button {
                        class: "btn btn-primary",
                        disabled: busy(),
                        onclick: save_profile,
                        if busy() { "Saving..." } else { "Save profile" }
                    }
                }

                h4 { "Change password" }
                label {
                    "Current password"
                    input {
                        r#type: "password",
                        value: "{old_password}",
                        autocomplete: "current-password",
                        oninput: move |evt| old_password.set(evt.value()),
                    }
                }
                div {
                    class: "form-row",
                    label {
                        "New password"
                        input {
                            r#type: "password",
                            value: "{new_password}",
                            autocomplete: "new-password",
                            oninput: move |evt| new_password.set(evt.value()),
                        }
                    }
                    label {
                        "Confirm new password"
                        input {
                            r#type: "password",
                            value: "{confirm_password}",
                            autocomplete: "new-password",
                            oninput: move |evt| confirm_password.set(evt.value()),
                        }
                    }
                }
                div {
                    class: "dialog-actions",
                    button {
                        class: "btn btn-secondary",
                        disabled: busy(),
                        onclick: move |_| on_close.call(()),
                        "Close"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: busy(),
                        onclick: save_password,
                        if busy() { "Saving..." } else { "Change password" }
                    }
                }
            }
        }
    }
}
