use dioxus::prelude::*;

use crate::hooks::{fetch_tx_status, TxState};
use crate::{EXPLORER_URL, NETWORK};

/// Poll interval for a pending transaction, in milliseconds.
const TX_POLL_MS: u32 = 5_000;

#[derive(Props, Clone, PartialEq)]
pub struct TxStatusProps {
    pub tx_id: String,
}

/// Tracks a broadcast transaction until it reaches a terminal state.
#[component]
pub fn TxStatus(props: TxStatusProps) -> Element {
    let mut status = use_signal(|| TxState::Pending);

    let tx_id = props.tx_id.clone();
    use_future(move || {
        let tx_id = tx_id.clone();
        async move {
            loop {
                match fetch_tx_status(&tx_id).await {
                    Ok(TxState::Pending) => {}
                    Ok(terminal) => {
                        status.set(terminal);
                        break;
                    }
                    Err(e) => tracing::error!("tx status fetch failed: {e}"),
                }
                gloo_timers::future::TimeoutFuture::new(TX_POLL_MS).await;
            }
        }
    });

    let explorer_link = format!("{EXPLORER_URL}/txid/{}?chain={NETWORK}", props.tx_id);

    let (status_text, status_class, pending) = match &*status.read() {
        TxState::Pending => ("Transaction pending...".to_string(), "text-gray-400", true),
        TxState::Success => (
            "Transaction confirmed!".to_string(),
            "text-green-400",
            false,
        ),
        TxState::Failed(reason) => (
            format!("Transaction failed: {reason}"),
            "text-red-400",
            false,
        ),
    };
    let spinner_class = if pending { "" } else { "d-none" };

    rsx! {
        div { class: "mt-3 text-sm",
            span { class: "{status_class}",
                div {
                    role: "status",
                    class: "{spinner_class} spinner-border spinner-border-sm text-info align-text-top me-2",
                }
                "{status_text}"
            }
            " "
            a {
                class: "text-blue-400 underline font-mono",
                href: "{explorer_link}",
                target: "_blank",
                "{props.tx_id}"
            }
        }
    }
}
