//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod client;
pub use client::{use_api, ApiProvider};

mod auth;
pub use auth::{handle_api_error, redirect_to_login, use_auth, AuthProvider, AuthState, LogoutButton};

mod modal;
pub use modal::ModalOverlay;

mod snackbar;
pub use snackbar::{use_snackbar, Snackbar, SnackbarHost, SnackbarLevel};

mod confirm;
pub use confirm::ConfirmDialog;

mod pagination;
pub use pagination::Pagination;

mod export_dialog;
pub use export_dialog::ExportDialog;

mod image_upload;
pub use image_upload::ImageUploader;
