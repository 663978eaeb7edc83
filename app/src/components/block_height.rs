use dioxus::prelude::*;

use crate::hooks::use_block_height;

/// Shows the current Stacks chain tip, refreshed in the background.
#[component]
pub fn CurrentBlockHeight() -> Element {
    let height = use_block_height();

    let (tip_display, tip_class) = match *height.read() {
        Some(tip) => (tip.to_string(), "font-mono text-gray-200"),
        None => ("...".to_string(), "font-mono text-gray-500"),
    };

    rsx! {
        p { class: "text-sm text-gray-400",
            "Current Block Height: "
            span { class: "{tip_class}", "{tip_display}" }
        }
    }
}
