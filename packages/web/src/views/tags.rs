//! Tags view: tags grouped under their categories, with usage counts.

use api::models::{Tag, TagCategory, TagPayload};
use api::ListParams;
use dioxus::prelude::*;
use ui::{
    handle_api_error, use_api, use_auth, use_snackbar, ConfirmDialog, ModalOverlay, Pagination,
    Snackbar,
};

const PAGE_SIZE: u32 = 25;

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|s| !s.is_empty())
}

#[component]
pub fn Tags() -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let mut search = use_signal(String::new);
    let mut page = use_signal(|| 0u32);
    let mut reload = use_signal(|| 0u32);
    let mut editing = use_signal(|| Option::<Option<Tag>>::None);
    let mut deleting = use_signal(|| Option::<Tag>::None);

    let list_client = client.clone();
    let list = use_resource(move || {
        let client = list_client.clone();
        let params = ListParams::page(page(), PAGE_SIZE).with_search(&search());
        reload();
        async move {
            client
                .list_tags(&params)
                .await
                .map_err(|e| handle_api_error(auth, &e))
        }
    });

    let categories_client = client.clone();
    let categories = use_resource(move || {
        let client = categories_client.clone();
        async move { client.list_tag_categories().await.unwrap_or_default() }
    });

    let delete_client = client.clone();
    let confirm_delete = move |tag: Tag| {
        let client = delete_client.clone();
        async move {
            match client.delete_tag(tag.id).await {
                Ok(()) => {
                    snackbar.set(Some(Snackbar::success(format!("Deleted {}", tag.name))));
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
                h2 { "Tags" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| editing.set(Some(None)),
                    "New tag"
                }
            }

            input {
                class: "search-input",
                r#type: "search",
                placeholder: "Search tags...",
                value: "{search}",
                oninput: move |evt| {
                    search.set(evt.value());
                    page.set(0);
                },
            }

            match &*list.read() {
                Some(Ok(result)) => rsx! {
                    if result.items.is_empty() {
                        p { class: "muted", "No tags" }
                    } else {
                        table {
                            class: "data-table",
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "Category" }
                                    th { "Description" }
                                    th { "Used" }
                                    th {}
                                }
                            }
                            tbody {
                                for tag in result.items.clone() {
                                    tr {
                                        td { class: "cell-title", "{tag.name}" }
                                        td {
                                            {tag.category.as_ref().map(|c| c.name.clone()).unwrap_or_else(|| "-".into())}
                                        }
                                        td { {tag.description.clone().unwrap_or_else(|| "-".into())} }
                                        td { "{tag.usage_count}" }
                                        td {
                                            class: "cell-actions",
                                            button {
                                                class: "btn btn-link",
                                                onclick: {
                                                    let tag = tag.clone();
                                                    move |_| editing.set(Some(Some(tag.clone())))
                                                },
                                                "Edit"
                                            }
                                            button {
                                                class: "btn btn-link danger",
                                                onclick: {
                                                    let tag = tag.clone();
                                                    move |_| deleting.set(Some(tag.clone()))
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
                None => rsx! { p { class: "muted", "Loading tags..." } },
            }

            if let Some(target) = editing() {
                TagDialog {
                    existing: target,
                    categories: categories().unwrap_or_default(),
                    on_saved: move |_| {
                        editing.set(None);
                        reload += 1;
                    },
                    on_close: move |_| editing.set(None),
                }
            }

            if let Some(tag) = deleting() {
                ConfirmDialog {
                    title: "Delete tag".to_string(),
                    message: format!(
                        "{} is attached to {} record(s) and will be removed from them.",
                        tag.name, tag.usage_count
                    ),
                    on_confirm: {
                        let confirm_delete = confirm_delete.clone();
                        move |_| confirm_delete(tag.clone())
                    },
                    on_cancel: move |_| deleting.set(None),
                }
            }
        }
    }
}

#[component]
fn TagDialog(
    existing: Option<Tag>,
    categories: Vec<TagCategory>,
    on_saved: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let tag_id = existing.as_ref().map(|t| t.id);
    let heading = if tag_id.is_some() { "Edit tag" } else { "New tag" };
    let first_category = categories.first().map(|c| c.id);

    let mut name = use_signal(|| existing.as_ref().map(|t| t.name.clone()).unwrap_or_default());
    let mut description =
        use_signal(|| existing.as_ref().and_then(|t| t.description.clone()).unwrap_or_default());
    let mut category_id =
        use_signal(|| existing.as_ref().map(|t| t.category_id).or(first_category));

    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let save = move |_| {
        let client = client.clone();
        async move {
            let tag_name = name().trim().to_string();
            if tag_name.is_empty() {
                error.set(Some("A name is required".to_string()));
                return;
            }
            let Some(category) = category_id() else {
                error.set(Some("Pick a category".to_string()));
                return;
            };
            let payload = TagPayload {
                name: tag_name,
                description: non_empty(description()),
                category_id: category,
            };

            busy.set(true);
            error.set(None);
            let outcome = match tag_id {
                Some(id) => client.update_tag(id, &payload).await,
                None => client.create_tag(&payload).await,
            };
            match outcome {
                Ok(saved) => {
                    snackbar.set(Some(Snackbar::success(format!("Saved {}", saved.name))));
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
                    "Name"
                    input {
                        r#type: "text",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                label {
                    "Category"
                    select {
                        value: category_id().map(|id| id.to_string()).unwrap_or_default(),
                        onchange: move |evt| category_id.set(evt.value().parse().ok()),
                        for category in categories.clone() {
                            option { value: "{category.id}", "{category.name}" }
                        }
                    }
                }
                label {
                    "Description"
                    textarea {
                        value: "{description}",
                        oninput: move |evt| description.set(evt.value()),
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
