//! Participants view: searchable list with create, edit and delete.

use api::models::{Participant, ParticipantPayload};
use api::ListParams;
use dioxus::prelude::*;
use ui::{
    handle_api_error, use_api, use_auth, use_snackbar, ConfirmDialog, ModalOverlay, Pagination,
    Snackbar,
};

const PAGE_SIZE: u32 = 10;

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|s| !s.is_empty())
}

#[component]
pub fn Participants() -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let mut search = use_signal(String::new);
    let mut page = use_signal(|| 0u32);
    let mut reload = use_signal(|| 0u32);
    let mut editing = use_signal(|| Option::<Option<Participant>>::None);
    let mut deleting = use_signal(|| Option::<Participant>::None);

    let list_client = client.clone();
    let list = use_resource(move || {
        let client = list_client.clone();
        let params = ListParams::page(page(), PAGE_SIZE).with_search(&search());
        reload();
        async move {
            client
                .list_participants(&params)
                .await
                .map_err(|e| handle_api_error(auth, &e))
        }
    });

    let delete_client = client.clone();
    let confirm_delete = move |participant: Participant| {
        let client = delete_client.clone();
        async move {
            match client.delete_participant(participant.id).await {
                Ok(()) => {
                    snackbar.set(Some(Snackbar::success(format!(
                        "Deleted {}",
                        participant.name_or_code
                    ))));
                    reload += 1;
                }
                Err(e) => snackbar.set(Some(Snackbar::error(handle_api_error(auth, &e)))),
            }
            deleting.set(None);
        }
    };

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h2 { "Participants" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| editing.set(Some(None)),
                    "New participant"
                }
            }

            input {
                class: "search-input",
                r#type: "search",
                placeholder: "Search participants...",
                value: "{search}",
                oninput: move |evt| {
                    search.set(evt.value());
                    page.set(0);
                },
            }

            match &*list.read() {
                Some(Ok(result)) => rsx! {
                    if result.items.is_empty() {
                        p { class: "muted", "No participants" }
                    } else {
                        table {
                            class: "data-table",
                            thead {
                                tr {
                                    th { "Name / code" }
                                    th { "Gender" }
                                    th { "Age range" }
                                    th { "Occupation" }
                                    th { "Anonymous" }
                                    th {}
                                }
                            }
                            tbody {
                                for participant in result.items.clone() {
                                    tr {
                                        td { class: "cell-title", "{participant.name_or_code}" }
                                        td { {participant.gender.clone().unwrap_or_else(|| "-".into())} }
                                        td { {participant.age_range.clone().unwrap_or_else(|| "-".into())} }
                                        td { {participant.occupation.clone().unwrap_or_else(|| "-".into())} }
                                        td { if participant.is_anonymous { "Yes" } else { "No" } }
                                        td {
                                            class: "cell-actions",
                                            button {
                                                class: "btn btn-link",
                                                onclick: {
                                                    let participant = participant.clone();
                                                    move |_| editing.set(Some(Some(participant.clone())))
                                                },
                                                "Edit"
                                            }
                                            button {
                                                class: "btn btn-link danger",
                                                onclick: {
                                                    let participant = participant.clone();
                                                    move |_| deleting.set(Some(participant.clone()))
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
                None => rsx! { p { class: "muted", "Loading participants..." } },
            }

            if let Some(target) = editing() {
                ParticipantDialog {
                    existing: target,
                    on_saved: move |_| {
                        editing.set(None);
                        reload += 1;
                    },
                    on_close: move |_| editing.set(None),
                }
            }

            if let Some(participant) = deleting() {
                ConfirmDialog {
                    title: "Delete participant".to_string(),
                    message: format!("{} will be permanently removed.", participant.name_or_code),
                    on_confirm: {
                        let confirm_delete = confirm_delete.clone();
                        move |_| confirm_delete(participant.clone())
                    },
                    on_cancel: move |_| deleting.set(None),
                }
            }
        }
    }
}

#[component]
fn ParticipantDialog(
    existing: Option<Participant>,
    on_saved: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let participant_id = existing.as_ref().map(|p| p.id);
    let heading = if participant_id.is_some() { "Edit participant" } else { "New participant" };

    let mut name = use_signal(|| {
        existing.as_ref().map(|p| p.name_or_code.clone()).unwrap_or_default()
    });
    let mut gender =
        use_signal(|| existing.as_ref().and_then(|p| p.gender.clone()).unwrap_or_default());
    let mut age_range =
        use_signal(|| existing.as_ref().and_then(|p| p.age_range.clone()).unwrap_or_default());
    let mut occupation =
        use_signal(|| existing.as_ref().and_then(|p| p.occupation.clone()).unwrap_or_default());
    let mut education =
        use_signal(|| existing.as_ref().and_then(|p| p.education.clone()).unwrap_or_default());
    let mut notes =
        use_signal(|| existing.as_ref().and_then(|p| p.notes.clone()).unwrap_or_default());
    let mut is_anonymous =
        use_signal(|| existing.as_ref().map(|p| p.is_anonymous).unwrap_or(false));

    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let save = move |_| {
        let client = client.clone();
        async move {
            let code = name().trim().to_string();
            if code.is_empty() {
                error.set(Some("A name or code is required".to_string()));
                return;
            }
            let payload = ParticipantPayload {
                name_or_code: code,
                gender: non_empty(gender()),
                age_range: non_empty(age_range()),
                occupation: non_empty(occupation()),
                education: non_empty(education()),
                is_anonymous: is_anonymous(),
                notes: non_empty(notes()),
            };

            busy.set(true);
            error.set(None);
            let outcome = match participant_id {
                Some(id) => client.update_participant(id, &payload).await,
                None => client.create_participant(&payload).await,
            };
            match outcome {
                Ok(saved) => {
                    snackbar.set(Some(Snackbar::success(format!("Saved {}", saved.name_or_code))));
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

                label {
                    "Name or code"
                    input {
                        r#type: "text",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                div {
                    class: "form-row",
                    label {
                        "Gender"
                        input {
                            r#type: "text",
                            value: "{gender}",
                            oninput: move |evt| gender.set(evt.value()),
                        }
                    }
                    label {
                        "Age range"
                        input {
                            r#type: "text",
                            placeholder: "30-40",
                            value: "{age_range}",
                            oninput: move |evt| age_range.set(evt.value()),
                        }
                    }
                }
                div {
                    class: "form-row",
                    label {
                        "Occupation"
                        input {
                            r#type: "text",
                            value: "{occupation}",
                            oninput: move |evt| occupation.set(evt.value()),
                        }
                    }
                    label {
                        "Education"
                        input {
                            r#type: "text",
                            value: "{education}",
                            oninput: move |evt| education.set(evt.value()),
                        }
                    }
                }
                label {
                    "Notes"
                    textarea {
                        value: "{notes}",
                        oninput: move |evt| notes.set(evt.value()),
                    }
                }
                label {
                    class: "filter-chip",
                    input {
                        r#type: "checkbox",
                        checked: is_anonymous(),
                        onchange: move |_| is_anonymous.toggle(),
                    }
                    "Anonymous participant"
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
