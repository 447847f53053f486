use dioxus::prelude::*;

use ui::{ApiProvider, AuthProvider, SnackbarHost};
use views::{AppShell, Dashboard, Fields, Login, Participants, Records, Tags, Users};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/login")]
    Login {},
    #[layout(AppShell)]
        #[route("/")]
        Dashboard {},
        #[route("/records")]
        Records {},
        #[route("/participants")]
        Participants {},
        #[route("/fields")]
        Fields {},
        #[route("/tags")]
        Tags {},
        #[route("/users")]
        Users {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ApiProvider {
            AuthProvider {
                SnackbarHost {
                    Router::<Route> {}
                }
            }
        }
    }
}
