//! Authenticated layout: sidebar navigation around the routed view.
//!
//! Also the route guard. While the persisted token is being validated a
//! placeholder is shown; once validation settles without a user, the
//! router is sent to the login page.

use dioxus::prelude::*;
use ui::{icons, use_auth, Icon, LogoutButton};

use super::ProfileDialog;
use crate::Route;

#[component]
pub fn AppShell() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let route = use_route::<Route>();
    let mut show_profile = use_signal(|| false);

    use_effect(move || {
        let state = auth();
        if !state.loading && state.user.is_none() {
            nav.replace(Route::Login {});
        }
    });

    let state = auth();
    if state.loading {
        return rsx! {
            div { class: "app-loading", "Checking session..." }
        };
    }
    let Some(user) = state.user.clone() else {
        // Redirect is on its way.
        return rsx! {};
    };

    let nav_class = |target: &Route| {
        if &route == target {
            "nav-link active"
        } else {
            "nav-link"
        }
    };

    rsx! {
        div {
            class: "app-shell",
            nav {
                class: "app-nav",
                h1 { class: "app-title", "Fieldlog" }
                Link { class: nav_class(&Route::Dashboard {}), to: Route::Dashboard {},
                    Icon { width: 14, height: 14, icon: icons::FaHouse }
                    "Dashboard"
                }
                Link { class: nav_class(&Route::Records {}), to: Route::Records {},
                    Icon { width: 14, height: 14, icon: icons::FaBook }
                    "Records"
                }
                Link { class: nav_class(&Route::Participants {}), to: Route::Participants {},
                    Icon { width: 14, height: 14, icon: icons::FaUsers }
                    "Participants"
                }
                Link { class: nav_class(&Route::Fields {}), to: Route::Fields {},
                    Icon { width: 14, height: 14, icon: icons::FaLocationDot }
                    "Fields"
                }
                Link { class: nav_class(&Route::Tags {}), to: Route::Tags {},
                    Icon { width: 14, height: 14, icon: icons::FaTags }
                    "Tags"
                }
                if user.is_admin() {
                    Link { class: nav_class(&Route::Users {}), to: Route::Users {},
                        Icon { width: 14, height: 14, icon: icons::FaUserGear }
                        "Users"
                    }
                }
                div {
                    class: "nav-footer",
                    span { class: "nav-user", "{user.display_name()}" }
                    span { class: "nav-role", "{user.role.label()}" }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| show_profile.set(true),
                        "Profile"
                    }
                    LogoutButton { class: "btn btn-secondary" }
                }
            }
            main {
                class: "app-main",
                Outlet::<Route> {}
            }
            if show_profile() {
                ProfileDialog {
                    user: user.clone(),
                    on_close: move |_| show_profile.set(false),
                }
            }
        }
    }
}
