//! Users view, visible to administrators only.

use api::models::{User, UserPayload, UserRole};
use api::ListParams;
use dioxus::prelude::*;
use ui::{
    handle_api_error, use_api, use_auth, use_snackbar, ConfirmDialog, ModalOverlay, Pagination,
    Snackbar,
};

const PAGE_SIZE: u32 = 10;

#[component]
pub fn Users() -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let mut page = use_signal(|| 0u32);
    let mut reload = use_signal(|| 0u32);
    let mut editing = use_signal(|| Option::<Option<User>>::None);
    let mut deleting = use_signal(|| Option::<User>::None);

    let current_user_id = auth().user.as_ref().map(|u| u.id);

    let list_client = client.clone();
    let list = use_resource(move || {
        let client = list_client.clone();
        let params = ListParams::page(page(), PAGE_SIZE);
        reload();
        async move {
            client
                .list_users(&params)
                .await
                .map_err(|e| handle_api_error(auth, &e))
        }
    });

    let delete_client = client.clone();
    let confirm_delete = move |user: User| {
        let client = delete_client.clone();
        async move {
            match client.delete_user(user.id).await {
                Ok(()) => {
                    snackbar.set(Some(Snackbar::success(format!("Deleted {}", user.username))));
                    reload += 1;
                }
                Err(e) => snackbar.set(Some(Snackbar::error(handle_api_error(auth, &e)))),
            }
            deleting.set(None);
        }
    };

    // The route is hidden from non-admins; this covers a direct URL visit.
    if !auth().loading && !auth().is_admin() {
        return rsx! {
            div { class: "view",
                h2 { "Users" }
                p { class: "error-text", "Administrator access required" }
            }
        };
    }

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h2 { "Users" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| editing.set(Some(None)),
                    "New user"
                }
            }

            match &*list.read() {
                Some(Ok(result)) => rsx! {
                    table {
                        class: "data-table",
                        thead {
                            tr {
                                th { "Username" }
                                th { "Name" }
                                th { "Email" }
                                th { "Role" }
                                th { "Active" }
                                th {}
                            }
                        }
                        tbody {
                            for user in result.items.clone() {
                                tr {
                                    td { class: "cell-title", "{user.username}" }
                                    td { {user.full_name.clone().unwrap_or_else(|| "-".into())} }
                                    td { "{user.email}" }
                                    td { "{user.role.label()}" }
                                    td { if user.is_active { "Yes" } else { "No" } }
                                    td {
                                        class: "cell-actions",
                                        button {
                                            class: "btn btn-link",
                                            onclick: {
                                                let user = user.clone();
                                                move |_| editing.set(Some(Some(user.clone())))
                                            },
                                            "Edit"
                                        }
                                        if Some(user.id) != current_user_id {
                                            button {
                                                class: "btn btn-link danger",
                                                onclick: {
                                                    let user = user.clone();
                                                    move |_| deleting.set(Some(user.clone()))
                                                },
                                                "Delete"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    Pagination {
                        page: page(),
                        page_size: PAGE_SIZE,
                        total: result.total,
                        on_change: move |p| page.set(p),
                    }
                },
                Some(Err(message)) => rsx! { p { class: "error-text", "{message}" } },
                None => rsx! { p { class: "muted", "Loading users..." } },
            }

            if let Some(target) = editing() {
                UserDialog {
                    existing: target,
                    on_saved: move |_| {
                        editing.set(None);
                        reload += 1;
                    },
                    on_close: move |_| editing.set(None),
                }
            }

            if let Some(user) = deleting() {
                ConfirmDialog {
                    title: "Delete user".to_string(),
                    message: format!("{} will lose access permanently.", user.username),
                    on_confirm: {
                        let confirm_delete = confirm_delete.clone();
                        move |_| confirm_delete(user.clone())
                    },
                    on_cancel: move |_| deleting.set(None),
                }
            }
        }
    }
}

#[component]
fn UserDialog(
    existing: Option<User>,
    on_saved: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let user_id = existing.as_ref().map(|u| u.id);
    let heading = if user_id.is_some() { "Edit user" } else { "New user" };

    let mut username =
        use_signal(|| existing.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let mut email = use_signal(|| existing.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let mut full_name =
        use_signal(|| existing.as_ref().and_then(|u| u.full_name.clone()).unwrap_or_default());
    let mut role =
        use_signal(|| existing.as_ref().map(|u| u.role).unwrap_or(UserRole::Researcher));
    let mut is_active = use_signal(|| existing.as_ref().map(|u| u.is_active).unwrap_or(true));
    let mut password = use_signal(String::new);

    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let save = move |_| {
        let client = client.clone();
        async move {
            let name = username().trim().to_string();
            let mail = email().trim().to_string();
            if name.is_empty() || mail.is_empty() {
                error.set(Some("Username and email are required".to_string()));
                return;
            }
            // Creation requires a password; on edit an empty one means
            // keep the current password.
            let secret = password();
            if user_id.is_none() && secret.is_empty() {
                error.set(Some("A password is required for a new user".to_string()));
                return;
            }
            let payload = UserPayload {
                username: name,
                email: mail,
                full_name: Some(full_name()).filter(|s| !s.is_empty()),
                role: role(),
                is_active: is_active(),
                password: Some(secret).filter(|s| !s.is_empty()),
            };

            busy.set(true);
            error.set(None);
            let outcome = match user_id {
                Some(id) => client.update_user(id, &payload).await,
                None => client.create_user(&payload).await,
            };
            match outcome {
                Ok(saved) => {
                    snackbar.set(Some(Snackbar::success(format!("Saved {}", saved.username))));
                    on_saved.call(());
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
                h3 { "{heading}" }

                if let Some(message) = error() {
                    div { class: "form-error", "{message}" }
                }

                div {
                    class: "form-row",
                    label {
                        "Username"
                        input {
                            r#type: "text",
                            value: "{username}",
                            oninput: move |evt| username.set(evt.value()),
                        }
                    }
                    label {
                        "Email"
                        input {
                            r#type: "email",
                            value: "{email}",
                            oninput: move |evt| email.set(evt.value()),
                        }
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
                    class: "form-row",
                    label {
                        "Role"
                        select {
                            value: "{role().as_str()}",
                            onchange: move |evt| {
                                role.set(if evt.value() == "admin" {
                                    UserRole::Admin
                                } else {
                                    UserRole::Researcher
                                });
                            },
                            option { value: "researcher", "Researcher" }
                            option { value: "admin", "Administrator" }
                        }
                    }
                    label {
                        if user_id.is_some() { "New password (optional)" } else { "Password" }
                        input {
                            r#type: "password",
                            value: "{password}",
                            autocomplete: "new-password",
                            oninput: move |evt| password.set(evt.value()),
                        }
                    }
                }
                label {
                    class: "filter-chip",
                    input {
                        r#type: "checkbox",
                        checked: is_active(),
                        onchange: move |_| is_active.toggle(),
                    }
                    "Account active"
                }

                div {
                    class: "dialog-actions",
                    button {
                        class: "btn btn-secondary",
                        disabled: busy(),
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: busy(),
                        onclick: save,
                        if busy() { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}
