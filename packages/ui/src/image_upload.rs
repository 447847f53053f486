//! Image attachment control for a record: lists existing images, uploads
//! new ones after local validation, and deletes on request.

use api::models::RecordImage;
use api::upload::validate_image;
use dioxus::prelude::*;

use crate::client::use_api;
use crate::snackbar::{use_snackbar, Snackbar};

/// Guess the MIME type from the file name; uploads are validated against the
/// accepted image types either way.
fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

#[component]
pub fn ImageUploader(record_id: i64) -> Element {
    let client = use_api();
    let mut snackbar = use_snackbar();
    let mut busy = use_signal(|| false);
    let mut reload = use_signal(|| 0u32);

    let list_client = client.clone();
    let images = use_resource(move || {
        let client = list_client.clone();
        reload();
        async move { client.record_images(record_id).await }
    });

    let upload_client = client.clone();
    let onchange = move |evt: Event<FormData>| {
        let client = upload_client.clone();
        async move {
            let Some(engine) = evt.files() else { return };
            busy.set(true);
            for name in engine.files() {
                let Some(bytes) = engine.read_file(&name).await else {
                    snackbar.set(Some(Snackbar::error(format!("Could not read {name}"))));
                    continue;
                };
                let content_type = content_type_for(&name);
                if let Err(e) = validate_image(&name, content_type, bytes.len()) {
                    snackbar.set(Some(Snackbar::error(e.user_message())));
                    continue;
                }
                match client
                    .upload_record_image(record_id, &name, content_type, bytes)
                    .await
                {
                    Ok(_) => {
                        snackbar.set(Some(Snackbar::success(format!("Uploaded {name}"))));
                        reload += 1;
                    }
                    Err(e) => {
                        snackbar.set(Some(Snackbar::error(e.user_message())));
                    }
                }
            }
            busy.set(false);
        }
    };

    let delete_client = client.clone();
    let delete = move |image: RecordImage| {
        let client = delete_client.clone();
        async move {
            match client.delete_record_image(record_id, image.id).await {
                Ok(()) => reload += 1,
                Err(e) => snackbar.set(Some(Snackbar::error(e.user_message()))),
            }
        }
    };

    rsx! {
        div {
            class: "image-uploader",
            match &*images.read() {
                Some(Ok(list)) if !list.is_empty() => rsx! {
                    ul {
                        class: "image-list",
                        for image in list.clone() {
                            li {
                                span { "{image.filename}" }
                                button {
                                    class: "btn btn-link",
                                    onclick: {
                                        let delete = delete.clone();
                                        let image = image.clone();
                                        move |_| delete(image.clone())
                                    },
                                    "Remove"
                                }
                            }
                        }
                    }
                },
                Some(Ok(_)) => rsx! { p { class: "muted", "No images attached" } },
                Some(Err(e)) => rsx! { p { class: "error-text", "{e.user_message()}" } },
                None => rsx! { p { class: "muted", "Loading images..." } },
            }
            label {
                class: "btn btn-secondary upload-button",
                input {
                    r#type: "file",
                    accept: ".jpg,.jpeg,.png,.webp",
                    multiple: true,
                    disabled: busy(),
                    onchange: onchange,
                }
                if busy() { "Uploading..." } else { "Add images" }
            }
        }
    }
}
