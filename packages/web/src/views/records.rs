//! Records view: filterable, paginated list with create/edit, delete,
//! export and image attachment.
//!
//! All filter state lives in one [`RecordListState`] signal; every
//! mutation goes through its setters so the page index resets whenever
//! result membership can shift. The loader re-fetches on any state change
//! and carries a sequence number so a slow response for an old filter
//! state can never overwrite a newer page.

use api::models::{Field, Participant, Record, RecordPayload, RecordStatus, RecordType, Tag};
use api::{ListParams, RecordListState, RecordPage};
use chrono::NaiveDate;
use dioxus::prelude::*;
use ui::{
    handle_api_error, use_api, use_auth, use_snackbar, ConfirmDialog, ExportDialog,
    ImageUploader, ModalOverlay, Pagination, Snackbar,
};

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[component]
pub fn Records() -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let mut state = use_signal(RecordListState::default);
    let mut reload = use_signal(|| 0u32);
    let mut result = use_signal(|| Option::<Result<RecordPage, String>>::None);
    let mut fetch_seq = use_signal(|| 0u64);

    let mut selected = use_signal(Vec::<i64>::new);
    let mut show_filters = use_signal(|| false);
    let mut show_export = use_signal(|| false);
    let mut editing = use_signal(|| Option::<Option<Record>>::None);
    let mut deleting = use_signal(|| Option::<Record>::None);

    // Loader. Reads `state` and `reload` so either retriggers it; the
    // sequence number discards responses that arrive out of order.
    let list_client = client.clone();
    use_effect(move || {
        let snapshot = state();
        let _ = reload();
        let client = list_client.clone();
        let seq = fetch_seq.peek().wrapping_add(1);
        fetch_seq.set(seq);
        spawn(async move {
            let outcome = client
                .list_records(&snapshot.filters, snapshot.page, snapshot.page_size)
                .await;
            if *fetch_seq.peek() != seq {
                return;
            }
            match outcome {
                Ok(page) => result.set(Some(Ok(page))),
                Err(e) => result.set(Some(Err(handle_api_error(auth, &e)))),
            }
        });
    });

    // Picker data, fetched once and shared with the filter panel and the
    // record dialog.
    let fields_client = client.clone();
    let fields = use_resource(move || {
        let client = fields_client.clone();
        async move {
            client
                .list_fields(&ListParams::all())
                .await
                .map(|p| p.items)
                .unwrap_or_default()
        }
    });
    let participants_client = client.clone();
    let participants = use_resource(move || {
        let client = participants_client.clone();
        async move {
            client
                .list_participants(&ListParams::all())
                .await
                .map(|p| p.items)
                .unwrap_or_default()
        }
    });
    let tags_client = client.clone();
    let tags = use_resource(move || {
        let client = tags_client.clone();
        async move {
            client
                .list_tags(&ListParams::all())
                .await
                .map(|p| p.items)
                .unwrap_or_default()
        }
    });

    let delete_client = client.clone();
    let confirm_delete = move |record: Record| {
        let client = delete_client.clone();
        async move {
            match client.delete_record(record.id).await {
                Ok(()) => {
                    snackbar.set(Some(Snackbar::success(format!("Deleted \"{}\"", record.title))));
                    selected.with_mut(|s| s.retain(|id| *id != record.id));
                    reload += 1;
                }
                Err(e) => {
                    snackbar.set(Some(Snackbar::error(handle_api_error(auth, &e))));
                }
            }
            deleting.set(None);
        }
    };

    let demoted = state().query().demoted();

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h2 { "Records" }
                div {
                    class: "view-actions",
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| show_filters.toggle(),
                        if show_filters() { "Hide filters" } else { "Filters" }
                    }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| show_export.set(true),
                        "Export"
                    }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| editing.set(Some(None)),
                        "New record"
                    }
                }
            }

            input {
                class: "search-input",
                r#type: "search",
                placeholder: "Search records...",
                value: "{state().filters.search}",
                oninput: move |evt| state.with_mut(|s| s.set_search(evt.value())),
            }

            if show_filters() {
                FilterPanel {
                    state: state,
                    fields: fields().unwrap_or_default(),
                    participants: participants().unwrap_or_default(),
                    tags: tags().unwrap_or_default(),
                }
            }

            match &*result.read() {
                Some(Ok(page)) => rsx! {
                    if demoted {
                        p { class: "muted filter-note",
                            "Type and status combinations are narrowed on the current page"
                        }
                    }
                    if page.items.is_empty() {
                        p { class: "muted", "No records match" }
                    } else {
                        table {
                            class: "data-table",
                            thead {
                                tr {
                                    th {}
                                    th { "Title" }
                                    th { "Type" }
                                    th { "Date" }
                                    th { "Location" }
                                    th { "Status" }
                                    th {}
                                }
                            }
                            tbody {
                                for record in page.items.clone() {
                                    RecordRow {
                                        record: record.clone(),
                                        checked: selected().contains(&record.id),
                                        on_toggle: move |id: i64| {
                                            selected.with_mut(|s| {
                                                if let Some(pos) = s.iter().position(|x| *x == id) {
                                                    s.remove(pos);
                                                } else {
                                                    s.push(id);
                                                }
                                            });
                                        },
                                        on_edit: move |record: Record| editing.set(Some(Some(record))),
                                        on_delete: move |record: Record| deleting.set(Some(record)),
                                    }
                                }
                            }
                        }
                    }
                    Pagination {
                        page: state().page,
                        page_size: state().page_size,
                        total: page.total,
                        on_change: move |page| state.with_mut(|s| s.set_page(page)),
                    }
                },
                Some(Err(message)) => rsx! { p { class: "error-text", "{message}" } },
                None => rsx! { p { class: "muted", "Loading records..." } },
            }

            if show_export() {
                ExportDialog {
                    record_ids: selected(),
                    on_close: move |_| show_export.set(false),
                }
            }

            if let Some(target) = editing() {
                RecordDialog {
                    existing: target,
                    fields: fields().unwrap_or_default(),
                    participants: participants().unwrap_or_default(),
                    tags: tags().unwrap_or_default(),
                    on_saved: move |_| {
                        editing.set(None);
                        reload += 1;
                    },
                    on_close: move |_| editing.set(None),
                }
            }

            if let Some(record) = deleting() {
                ConfirmDialog {
                    title: "Delete record".to_string(),
                    message: format!("\"{}\" will be permanently removed.", record.title),
                    on_confirm: {
                        let confirm_delete = confirm_delete.clone();
                        move |_| confirm_delete(record.clone())
                    },
                    on_cancel: move |_| deleting.set(None),
                }
            }
        }
    }
}

#[component]
fn RecordRow(
    record: Record,
    checked: bool,
    on_toggle: EventHandler<i64>,
    on_edit: EventHandler<Record>,
    on_delete: EventHandler<Record>,
) -> Element {
    let id = record.id;
    let edit_record = record.clone();
    let delete_record = record.clone();
    let date = record.record_date.split('T').next().unwrap_or("").to_string();

    rsx! {
        tr {
            td {
                input {
                    r#type: "checkbox",
                    checked: checked,
                    onchange: move |_| on_toggle.call(id),
                }
            }
            td { class: "cell-title", "{record.title}" }
            td { "{record.record_type.label()}" }
            td { "{date}" }
            td { "{record.location_display()}" }
            td {
                span { class: "status status-{record.status.as_str()}", "{record.status.label()}" }
            }
            td {
                class: "cell-actions",
                button {
                    class: "btn btn-link",
                    onclick: move |_| on_edit.call(edit_record.clone()),
                    "Edit"
                }
                button {
                    class: "btn btn-link danger",
                    onclick: move |_| on_delete.call(delete_record.clone()),
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn FilterPanel(
    state: Signal<RecordListState>,
    fields: Vec<Field>,
    participants: Vec<Participant>,
    tags: Vec<Tag>,
) -> Element {
    let mut state = state;
    let filters = state().filters;

    rsx! {
        div {
            class: "filter-panel",

            div {
                class: "filter-group",
                span { class: "filter-label", "Type" }
                for option in RecordType::ALL {
                    label {
                        class: "filter-chip",
                        input {
                            r#type: "checkbox",
                            checked: filters.types.contains(&option),
                            onchange: move |_| state.with_mut(|s| {
                                let mut types = s.filters.types.clone();
                                if let Some(pos) = types.iter().position(|t| *t == option) {
                                    types.remove(pos);
                                } else {
                                    types.push(option);
                                }
                                s.set_types(types);
                            }),
                        }
                        "{option.label()}"
                    }
                }
            }

            div {
                class: "filter-group",
                span { class: "filter-label", "Status" }
                for option in RecordStatus::ALL {
                    label {
                        class: "filter-chip",
                        input {
                            r#type: "checkbox",
                            checked: filters.statuses.contains(&option),
                            onchange: move |_| state.with_mut(|s| {
                                let mut statuses = s.filters.statuses.clone();
                                if let Some(pos) = statuses.iter().position(|t| *t == option) {
                                    statuses.remove(pos);
                                } else {
                                    statuses.push(option);
                                }
                                s.set_statuses(statuses);
                            }),
                        }
                        "{option.label()}"
                    }
                }
            }

            div {
                class: "filter-group",
                span { class: "filter-label", "Date" }
                input {
                    r#type: "date",
                    value: filters.start_date.map(|d| d.to_string()).unwrap_or_default(),
                    onchange: move |evt| state.with_mut(|s| s.set_start_date(parse_date(&evt.value()))),
                }
                span { "to" }
                input {
                    r#type: "date",
                    value: filters.end_date.map(|d| d.to_string()).unwrap_or_default(),
                    onchange: move |evt| state.with_mut(|s| s.set_end_date(parse_date(&evt.value()))),
                }
            }

            div {
                class: "filter-group",
                span { class: "filter-label", "Field" }
                select {
                    value: filters.field_id.map(|id| id.to_string()).unwrap_or_default(),
                    onchange: move |evt| state.with_mut(|s| s.set_field(evt.value().parse().ok())),
                    option { value: "", "Any field" }
                    for field in fields.clone() {
                        option { value: "{field.id}", "{field.display()}" }
                    }
                }
            }

            div {
                class: "filter-group",
                span { class: "filter-label", "Participants" }
                for participant in participants.clone() {
                    label {
                        class: "filter-chip",
                        input {
                            r#type: "checkbox",
                            checked: filters.participant_ids.contains(&participant.id),
                            onchange: {
                                let id = participant.id;
                                move |_| state.with_mut(|s| {
                                    let mut ids = s.filters.participant_ids.clone();
                                    if let Some(pos) = ids.iter().position(|x| *x == id) {
                                        ids.remove(pos);
                                    } else {
                                        ids.push(id);
                                    }
                                    s.set_participants(ids);
                                })
                            },
                        }
                        "{participant.name_or_code}"
                    }
                }
            }

            div {
                class: "filter-group",
                span { class: "filter-label", "Tags" }
                for tag in tags.clone() {
                    label {
                        class: "filter-chip",
                        input {
                            r#type: "checkbox",
                            checked: filters.tag_ids.contains(&tag.id),
                            onchange: {
                                let id = tag.id;
                                move |_| state.with_mut(|s| {
                                    let mut ids = s.filters.tag_ids.clone();
                                    if let Some(pos) = ids.iter().position(|x| *x == id) {
                                        ids.remove(pos);
                                    } else {
                                        ids.push(id);
                                    }
                                    s.set_tags(ids);
                                })
                            },
                        }
                        "{tag.name}"
                    }
                }
            }

            div {
                class: "filter-group",
                span { class: "filter-label", "Page size" }
                select {
                    value: "{state().page_size}",
                    onchange: move |evt| {
                        if let Ok(size) = evt.value().parse() {
                            state.with_mut(|s| s.set_page_size(size));
                        }
                    },
                    option { value: "10", "10" }
                    option { value: "25", "25" }
                    option { value: "50", "50" }
                }
                if filters.is_active() {
                    button {
                        class: "btn btn-link",
                        onclick: move |_| state.with_mut(|s| s.clear_filters()),
                        "Clear filters"
                    }
                }
            }
        }
    }
}

#[component]
fn RecordDialog(
    existing: Option<Record>,
    fields: Vec<Field>,
    participants: Vec<Participant>,
    tags: Vec<Tag>,
    on_saved: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    let client = use_api();
    let auth = use_auth();
    let mut snackbar = use_snackbar();

    let record_id = existing.as_ref().map(|r| r.id);
    let heading = if record_id.is_some() { "Edit record" } else { "New record" };

    let mut title = use_signal(|| existing.as_ref().map(|r| r.title.clone()).unwrap_or_default());
    let mut record_type =
        use_signal(|| existing.as_ref().map(|r| r.record_type).unwrap_or(RecordType::FieldNote));
    let mut status =
        use_signal(|| existing.as_ref().map(|r| r.status).unwrap_or(RecordStatus::Draft));
    let mut record_date = use_signal(|| {
        existing
            .as_ref()
            .and_then(|r| r.record_date.split('T').next().map(str::to_string))
            .unwrap_or_default()
    });
    let mut time_range =
        use_signal(|| existing.as_ref().and_then(|r| r.time_range.clone()).unwrap_or_default());
    let mut duration = use_signal(|| {
        existing
            .as_ref()
            .and_then(|r| r.duration)
            .map(|d| d.to_string())
            .unwrap_or_default()
    });
    let mut field_id = use_signal(|| existing.as_ref().and_then(|r| r.field_id));
    let mut specific_location = use_signal(|| {
        existing
            .as_ref()
            .and_then(|r| r.specific_location.clone())
            .unwrap_or_default()
    });
    let mut content =
        use_signal(|| existing.as_ref().map(|r| r.content.clone()).unwrap_or_default());
    let mut participant_ids = use_signal(|| {
        existing
            .as_ref()
            .map(|r| r.participants.iter().map(|p| p.id).collect::<Vec<_>>())
            .unwrap_or_default()
    });
    let mut tag_ids = use_signal(|| {
        existing
            .as_ref()
            .map(|r| r.tags.iter().map(|t| t.id).collect::<Vec<_>>())
            .unwrap_or_default()
    });

    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let save = move |_| {
        let client = client.clone();
        async move {
            let name = title().trim().to_string();
            if name.is_empty() {
                error.set(Some("A title is required".to_string()));
                return;
            }
            let date = record_date();
            if parse_date(&date).is_none() {
                error.set(Some("Pick a record date".to_string()));
                return;
            }

            let payload = RecordPayload {
                title: name,
                record_type: record_type(),
                record_date: format!("{date}T00:00:00"),
                time_range: Some(time_range()).filter(|s| !s.is_empty()),
                duration: duration().parse().ok(),
                specific_location: Some(specific_location()).filter(|s| !s.is_empty()),
                content: content(),
                status: status(),
                field_id: field_id(),
                participant_ids: participant_ids(),
                tag_ids: tag_ids(),
            };

            busy.set(true);
            error.set(None);
            let outcome = match record_id {
                Some(id) => client.update_record(id, &payload).await,
                None => client.create_record(&payload).await,
            };
            match outcome {
                Ok(saved) => {
                    snackbar.set(Some(Snackbar::success(format!("Saved \"{}\"", saved.title))));
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
                class: "record-dialog",
                h3 { "{heading}" }

                if let Some(message) = error() {
                    div { class: "form-error", "{message}" }
                }

                label {
                    "Title"
                    input {
                        r#type: "text",
                        value: "{title}",
                        oninput: move |evt| title.set(evt.value()),
                    }
                }

                div {
                    class: "form-row",
                    label {
                        "Type"
                        select {
                            value: "{record_type().as_str()}",
                            onchange: move |evt| {
                                if let Some(t) = RecordType::parse(&evt.value()) {
                                    record_type.set(t);
                                }
                            },
                            for option in RecordType::ALL {
                                option { value: "{option.as_str()}", "{option.label()}" }
                            }
                        }
                    }
                    label {
                        "Status"
                        select {
                            value: "{status().as_str()}",
                            onchange: move |evt| {
                                if let Some(s) = RecordStatus::parse(&evt.value()) {
                                    status.set(s);
                                }
                            },
                            for option in RecordStatus::ALL {
                                option { value: "{option.as_str()}", "{option.label()}" }
                            }
                        }
                    }
                }

                div {
                    class: "form-row",
                    label {
                        "Date"
                        input {
                            r#type: "date",
                            value: "{record_date}",
                            onchange: move |evt| record_date.set(evt.value()),
                        }
                    }
                    label {
                        "Time range"
                        input {
                            r#type: "text",
                            placeholder: "09:00-11:00",
                            value: "{time_range}",
                            oninput: move |evt| time_range.set(evt.value()),
                        }
                    }
                    label {
                        "Duration (min)"
                        input {
                            r#type: "number",
                            value: "{duration}",
                            oninput: move |evt| duration.set(evt.value()),
                        }
                    }
                }

                div {
                    class: "form-row",
                    label {
                        "Field"
                        select {
                            value: field_id().map(|id| id.to_string()).unwrap_or_default(),
                            onchange: move |evt| field_id.set(evt.value().parse().ok()),
                            option { value: "", "None" }
                            for field in fields.clone() {
                                option { value: "{field.id}", "{field.display()}" }
                            }
                        }
                    }
                    label {
                        "Specific location"
                        input {
                            r#type: "text",
                            value: "{specific_location}",
                            oninput: move |evt| specific_location.set(evt.value()),
                        }
                    }
                }

                label {
                    "Description"
                    textarea {
                        value: "{content().description}",
                        oninput: move |evt| content.with_mut(|c| c.description = evt.value()),
                    }
                }
                label {
                    "Reflection"
                    textarea {
                        value: "{content().reflection}",
                        oninput: move |evt| content.with_mut(|c| c.reflection = evt.value()),
                    }
                }
                label {
                    "Notes"
                    textarea {
                        value: "{content().notes}",
                        oninput: move |evt| content.with_mut(|c| c.notes = evt.value()),
                    }
                }

                div {
                    class: "form-group",
                    span { class: "filter-label", "Participants" }
                    for participant in participants.clone() {
                        label {
                            class: "filter-chip",
                            input {
                                r#type: "checkbox",
                                checked: participant_ids().contains(&participant.id),
                                onchange: {
                                    let id = participant.id;
                                    move |_| participant_ids.with_mut(|ids| {
                                        if let Some(pos) = ids.iter().position(|x| *x == id) {
                                            ids.remove(pos);
                                        } else {
                                            ids.push(id);
                                        }
                                    })
                                },
                            }
                            "{participant.name_or_code}"
                        }
                    }
                }

                div {
                    class: "form-group",
                    span { class: "filter-label", "Tags" }
                    for tag in tags.clone() {
                        label {
                            class: "filter-chip",
                            input {
                                r#type: "checkbox",
                                checked: tag_ids().contains(&tag.id),
                                onchange: {
                                    let id = tag.id;
                                    move |_| tag_ids.with_mut(|ids| {
                                        if let Some(pos) = ids.iter().position(|x| *x == id) {
                                            ids.remove(pos);
                                        } else {
                                            ids.push(id);
                                        }
                                    })
                                },
                            }
                            "{tag.name}"
                        }
                    }
                }

                if let Some(id) = record_id {
                    div {
                        class: "form-group",
                        span { class: "filter-label", "Images" }
                        ImageUploader { record_id: id }
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
