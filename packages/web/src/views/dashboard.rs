//! Dashboard: collection counts and the recent activity feed.

use dioxus::prelude::*;
use ui::{handle_api_error, use_api, use_auth};

#[component]
pub fn Dashboard() -> Element {
    let client = use_api();
    let auth = use_auth();

    let stats_client = client.clone();
    let stats = use_resource(move || {
        let client = stats_client.clone();
        async move {
            client
                .stats_overview()
                .await
                .map_err(|e| handle_api_error(auth, &e))
        }
    });

    let activity_client = client.clone();
    let activities = use_resource(move || {
        let client = activity_client.clone();
        async move {
            client
                .recent_activities()
                .await
                .map_err(|e| handle_api_error(auth, &e))
        }
    });

    rsx! {
        div {
            class: "view",
            h2 { "Dashboard" }

            match &*stats.read() {
                Some(Ok(overview)) => rsx! {
                    div {
                        class: "stat-cards",
                        StatCard { label: "Records", value: overview.records_count }
                        StatCard { label: "Participants", value: overview.participants_count }
                        StatCard { label: "Fields", value: overview.fields_count }
                        StatCard { label: "Tags", value: overview.tags_count }
                    }
                },
                Some(Err(message)) => rsx! { p { class: "error-text", "{message}" } },
                None => rsx! { p { class: "muted", "Loading overview..." } },
            }

            h3 { "Recent activity" }
            match &*activities.read() {
                Some(Ok(entries)) if entries.is_empty() => rsx! {
                    p { class: "muted", "Nothing recorded yet" }
                },
                Some(Ok(entries)) => rsx! {
                    ul {
                        class: "activity-feed",
                        for entry in entries.clone() {
                            li {
                                span { class: "activity-action", "{entry.action} {entry.entity}" }
                                span { class: "activity-title", "{entry.title}" }
                                span { class: "activity-meta",
                                    if let Some(name) = &entry.creator_name {
                                        "{name} \u{00b7} {entry.created_at}"
                                    } else {
                                        "{entry.created_at}"
                                    }
                                }
                            }
                        }
                    }
                },
                Some(Err(message)) => rsx! { p { class: "error-text", "{message}" } },
                None => rsx! { p { class: "muted", "Loading activity..." } },
            }
        }
    }
}

#[component]
fn StatCard(label: String, value: u64) -> Element {
    rsx! {
        div {
            class: "stat-card",
            span { class: "stat-value", "{value}" }
            span { class: "stat-label", "{label}" }
        }
    }
}
