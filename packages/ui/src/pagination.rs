use dioxus::prelude::*;

/// Page navigation for list views. `page` is zero-based.
#[component]
pub fn Pagination(page: u32, page_size: u32, total: u64, on_change: EventHandler<u32>) -> Element {
    let pages = if total == 0 {
        1
    } else {
        total.div_ceil(page_size as u64) as u32
    };
    let first = page as u64 * page_size as u64 + 1;
    let last = (first + page_size as u64 - 1).min(total);

    rsx! {
        div {
            class: "pagination",
            span {
                class: "pagination-summary",
                if total == 0 {
                    "No entries"
                } else {
                    "{first}\u{2013}{last} of {total}"
                }
            }
            button {
                class: "btn btn-secondary",
                disabled: page == 0,
                onclick: move |_| on_change.call(page.saturating_sub(1)),
                "Previous"
            }
            span { class: "pagination-page", "{page + 1} / {pages}" }
            button {
                class: "btn btn-secondary",
                disabled: page + 1 >= pages,
                onclick: move |_| on_change.call(page + 1),
                "Next"
            }
        }
    }
}
