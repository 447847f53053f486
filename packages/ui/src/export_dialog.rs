//! Export dialog: pick a format, download the file, and name it after the
//! server's `Content-Disposition` header.

use api::{ExportFormat, ExportPayload};
use dioxus::prelude::*;

use crate::client::use_api;
use crate::modal::ModalOverlay;
use crate::snackbar::{use_snackbar, Snackbar};

/// Hand a finished export to the platform's download path.
#[cfg(target_arch = "wasm32")]
fn save_export(payload: &ExportPayload) -> Result<(), String> {
    use wasm_bindgen::JsCast;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(payload.bytes.as_slice()).buffer());

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&payload.content_type);
    let blob = web_sys::Blob::new_with_buffer_source_sequence_and_options(&parts, &options)
        .map_err(|e| format!("{e:?}"))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| format!("{e:?}"))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document".to_string())?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("{e:?}"))?
        .dyn_into()
        .map_err(|e| format!("{e:?}"))?;
    anchor.set_href(&url);
    anchor.set_download(&payload.filename);
    anchor.click();

    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn save_export(payload: &ExportPayload) -> Result<(), String> {
    let dir = dirs::download_dir().unwrap_or_else(std::env::temp_dir);
    let path = dir.join(&payload.filename);
    std::fs::write(&path, &payload.bytes).map_err(|e| e.to_string())?;
    tracing::info!("export written to {}", path.display());
    Ok(())
}

/// Dialog for exporting the given records. An empty id list exports the
/// whole collection.
#[component]
pub fn ExportDialog(record_ids: Vec<i64>, on_close: EventHandler<()>) -> Element {
    let client = use_api();
    let mut snackbar = use_snackbar();
    let mut format = use_signal(|| ExportFormat::Json);
    let mut busy = use_signal(|| false);

    let count = record_ids.len();
    let scope = if count == 0 {
        "All records".to_string()
    } else {
        format!("{count} selected record(s)")
    };

    let export = move |_| {
        let client = client.clone();
        let ids = record_ids.clone();
        async move {
            busy.set(true);
            match client.export_records(format(), &ids).await {
                Ok(payload) => match save_export(&payload) {
                    Ok(()) => {
                        snackbar.set(Some(Snackbar::success(format!(
                            "Exported {}",
                            payload.filename
                        ))));
                        on_close.call(());
                    }
                    Err(e) => {
                        tracing::error!("saving export failed: {e}");
                        snackbar.set(Some(Snackbar::error("Could not save the export file")));
                    }
                },
                Err(e) => {
                    snackbar.set(Some(Snackbar::error(e.user_message())));
                }
            }
            busy.set(false);
        }
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| on_close.call(()),
            div {
                class: "export-dialog",
                h3 { "Export records" }
                p { class: "export-scope", "{scope}" }

                div {
                    class: "export-formats",
                    for option in ExportFormat::ALL {
                        label {
                            class: if format() == option { "export-format selected" } else { "export-format" },
                            input {
                                r#type: "radio",
                                name: "export-format",
                                checked: format() == option,
                                onchange: move |_| format.set(option),
                            }
                            div {
                                span { class: "export-format-label", "{option.label()}" }
                                span { class: "export-format-desc", "{option.description()}" }
                            }
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
                        onclick: export,
                        if busy() { "Exporting..." } else { "Export" }
                    }
                }
            }
        }
    }
}
