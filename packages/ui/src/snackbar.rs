//! Transient notification banner shared by all views.
//!
//! Views push a message through the signal returned by [`use_snackbar`];
//! [`SnackbarHost`] renders the most recent one and dismisses it after a
//! few seconds.

use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnackbarLevel {
    Info,
    Success,
    Error,
}

impl SnackbarLevel {
    fn class(&self) -> &'static str {
        match self {
            SnackbarLevel::Info => "snackbar snackbar-info",
            SnackbarLevel::Success => "snackbar snackbar-success",
            SnackbarLevel::Error => "snackbar snackbar-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snackbar {
    pub text: String,
    pub level: SnackbarLevel,
    /// Distinguishes consecutive identical messages so each restarts the
    /// dismissal timer.
    seq: u64,
}

impl Snackbar {
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, SnackbarLevel::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, SnackbarLevel::Error)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, SnackbarLevel::Info)
    }

    fn new(text: impl Into<String>, level: SnackbarLevel) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static SEQ: AtomicU64 = AtomicU64::new(0);
        Self {
            text: text.into(),
            level,
            seq: SEQ.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// Get the snackbar signal. Setting it to `Some(..)` shows the message.
pub fn use_snackbar() -> Signal<Option<Snackbar>> {
    use_context::<Signal<Option<Snackbar>>>()
}

/// Hosts the snackbar banner and provides the signal to descendants.
#[component]
pub fn SnackbarHost(children: Element) -> Element {
    let mut current = use_signal(|| Option::<Snackbar>::None);
    use_context_provider(|| current);

    // Auto-dismiss a few seconds after the latest message arrived. A newer
    // message restarts the clock; the stale timer finds a different seq and
    // leaves it alone.
    use_effect(move || {
        let Some(shown) = current() else { return };
        spawn(async move {
            #[cfg(target_arch = "wasm32")]
            {
                gloo_timers::future::sleep(std::time::Duration::from_secs(4)).await;
                if current.peek().as_ref().map(|m| m.seq) == Some(shown.seq) {
                    current.set(None);
                }
            }
            #[cfg(not(target_arch = "wasm32"))]
            let _ = shown;
        });
    });

    rsx! {
        {children}
        if let Some(message) = current() {
            div {
                class: "{message.level.class()}",
                span { "{message.text}" }
                button {
                    class: "snackbar-dismiss",
                    onclick: move |_| current.set(None),
                    "\u{2715}"
                }
            }
        }
    }
}
