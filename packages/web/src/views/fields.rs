//! Fields view: the research sites records are attached to.

use api::models::{Field, FieldPayload};
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
pub fn Fields() -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let mut search = use_signal(String::new);
    let mut page = use_signal(|| 0u32);
    let mut reload = use_signal(|| 0u32);
    let mut editing = use_signal(|| Option::<Option<Field>>::None);
    let mut deleting = use_signal(|| Option::<Field>::None);

    let list_client = client.clone();
    let list = use_resource(move || {
        let client = list_client.clone();
        let params = ListParams::page(page(), PAGE_SIZE).with_search(&search());
        reload();
        async move {
            client
                .list_fields(&params)
                .await
                .map_err(|e| handle_api_error(auth, &e))
        }
    });

    let delete_client = client.clone();
    let confirm_delete = move |field: Field| {
        let client = delete_client.clone();
        async move {
            match client.delete_field(field.id).await {
                Ok(()) => {
                    snackbar.set(Some(Snackbar::success(format!("Deleted {}", field.display()))));
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
                h2 { "Fields" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| editing.set(Some(None)),
                    "New field"
                }
            }

            input {
                class: "search-input",
                r#type: "search",
                placeholder: "Search fields...",
                value: "{search}",
                oninput: move |evt| {
                    search.set(evt.value());
                    page.set(0);
                },
            }

            match &*list.read() {
                Some(Ok(result)) => rsx! {
                    if result.items.is_empty() {
                        p { class: "muted", "No fields" }
                    } else {
                        table {
                            class: "data-table",
                            thead {
                                tr {
                                    th { "Region" }
                                    th { "Location" }
                                    th { "Sub-field" }
                                    th { "Address" }
                                    th {}
                                }
                            }
                            tbody {
                                for field in result.items.clone() {
                                    tr {
                                        td { "{field.region}" }
                                        td { class: "cell-title", "{field.location}" }
                                        td { {field.sub_field.clone().unwrap_or_else(|| "-".into())} }
                                        td { {field.address.clone().unwrap_or_else(|| "-".into())} }
                                        td {
                                            class: "cell-actions",
                                            button {
                                                class: "btn btn-link",
                                                onclick: {
                                                    let field = field.clone();
                                                    move |_| editing.set(Some(Some(field.clone())))
                                                },
                                                "Edit"
                                            }
                                            button {
                                                class: "btn btn-link danger",
                                                onclick: {
                                                    let field = field.clone();
                                                    move |_| deleting.set(Some(field.clone()))
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
                None => rsx! { p { class: "muted", "Loading fields..." } },
            }

            if let Some(target) = editing() {
                FieldDialog {
                    existing: target,
                    on_saved: move |_| {
                        editing.set(None);
                        reload += 1;
                    },
                    on_close: move |_| editing.set(None),
                }
            }

            if let Some(field) = deleting() {
                ConfirmDialog {
                    title: "Delete field".to_string(),
                    message: format!("{} will be permanently removed.", field.display()),
                    on_confirm: {
                        let confirm_delete = confirm_delete.clone();
                        move |_| confirm_delete(field.clone())
                    },
                    on_cancel: move |_| deleting.set(None),
                }
            }
        }
    }
}

#[component]
fn FieldDialog(
    existing: Option<Field>,
    on_saved: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let field_id = existing.as_ref().map(|f| f.id);
    let heading = if field_id.is_some() { "Edit field" } else { "New field" };

    let mut region =
        use_signal(|| existing.as_ref().map(|f| f.region.clone()).unwrap_or_default());
    let mut location =
        use_signal(|| existing.as_ref().map(|f| f.location.clone()).unwrap_or_default());
    let mut sub_field =
        use_signal(|| existing.as_ref().and_then(|f| f.sub_field.clone()).unwrap_or_default());
    let mut address =
        use_signal(|| existing.as_ref().and_then(|f| f.address.clone()).unwrap_or_default());

    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let save = move |_| {
        let client = client.clone();
        async move {
            let region_value = region().trim().to_string();
            let location_value = location().trim().to_string();
            if region_value.is_empty() || location_value.is_empty() {
                error.set(Some("Region and location are required".to_string()));
                return;
            }
            let payload = FieldPayload {
                region: region_value,
                location: location_value,
                sub_field: non_empty(sub_field()),
                address: non_empty(address()),
            };

            busy.set(true);
            error.set(None);
            let outcome = match field_id {
                Some(id) => client.update_field(id, &payload).await,
                None => client.create_field(&payload).await,
            };
            match outcome {
                Ok(saved) => {
                    snackbar.set(Some(Snackbar::success(format!("Saved {}", saved.display()))));
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
                        "Region"
                        input {
                            r#type: "text",
                            value: "{region}",
                            oninput: move |evt| region.set(evt.value()),
                        }
                    }
                    label {
                        "Location"
                        input {
                            r#type: "text",
                            value: "{location}",
                            oninput: move |evt| location.set(evt.value()),
                        }
                    }
                }
                div {
                    class: "form-row",
                    label {
                        "Sub-field"
                        input {
                            r#type: "text",
                            value: "{sub_field}",
                            oninput: move |evt| sub_field.set(evt.value()),
                        }
                    }
                    label {
                        "Address"
                        input {
                            r#type: "text",
                            value: "{address}",
                            oninput: move |evt| address.set(evt.value()),
                        }
                    }
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
