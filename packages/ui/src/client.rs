//! API client context for the UI.

use api::AppClient;
use dioxus::prelude::*;

/// Get the shared API client. One client (and one session) serves the whole
/// component tree.
pub fn use_api() -> AppClient {
    use_context::<AppClient>()
}

/// Provider component that constructs the API client against the configured
/// base URL. Wrap the app with this before [`AuthProvider`](crate::AuthProvider).
#[component]
pub fn ApiProvider(children: Element) -> Element {
    use_context_provider(api::app_client);

    rsx! {
        {children}
    }
}
