use dioxus::prelude::*;

use citycoin_api::consts::MAX_MEMO_LEN;
use citycoin_api::contract;

use crate::components::{CurrentBlockHeight, TxStatus};
use crate::hooks::{submit_contract_call, use_registration, SubmitOutcome};
use crate::WalletState;

#[component]
pub fn Register() -> Element {
    let wallet = use_context::<Signal<WalletState>>();
    let registration = use_registration();

    let mut memo_input = use_signal(String::new);
    let mut submitting = use_signal(|| false);
    let mut tx_id = use_signal(|| None::<String>);
    let mut submit_error = use_signal(|| None::<String>);

    let register_action = move |_| {
        let Some(sender) = wallet.read().address.clone() else {
            submit_error.set(Some("Connect your wallet first".to_string()));
            return;
        };
        let memo = memo_input.read().clone();
        spawn(async move {
            submitting.set(true);
            submit_error.set(None);
            let call = contract::register_user(Some(&memo));
            match submit_contract_call(&sender, &call).await {
                Ok(SubmitOutcome::Finished { tx_id: id }) => {
                    submitting.set(false);
                    tx_id.set(Some(id));
                }
                Ok(SubmitOutcome::Cancelled) => {
                    submitting.set(false);
                }
                Err(e) => {
                    submitting.set(false);
                    submit_error.set(Some(e));
                }
            }
        });
    };

    let state = registration.read();
    let activated = state.activated();
    let threshold = state.threshold;
    let miner_count = state.miner_count;
    let registered = state.registered();
    let miner_id_display = state.miner_id.unwrap_or_default();
    let progress = state.progress_percent();
    let activation_height_display = state
        .activation_block_height
        .map(|height| height.to_string())
        .unwrap_or_else(|| "...".to_string());
    drop(state);

    let heading = if activated {
        "Contract Activated!"
    } else {
        "Activate CityCoin Mining"
    };

    let has_tx = tx_id.read().is_some();
    let is_submitting = *submitting.read();
    let spinner_class = if is_submitting { "" } else { "d-none" };
    let error_display = submit_error.read().clone().unwrap_or_default();
    let has_error = !error_display.is_empty();
    let tx_display = tx_id.read().clone().unwrap_or_default();

    rsx! {
        div { class: "card max-w-2xl mx-auto",
            h3 { class: "text-lg font-semibold text-city-400 mb-2", "{heading}" }
            CurrentBlockHeight {}

            if activated {
                p { class: "text-gray-300 mt-3",
                    "{threshold} users have registered and mining will begin at block #{activation_height_display}."
                }
            } else {
                p { class: "text-gray-300 mt-3",
                    "Before mining can begin, at least {threshold} users must register "
                    "with the contract to signal activation."
                }
                ul { class: "text-gray-400 my-3 space-y-1",
                    li { "Miners Registered: {miner_count}" }
                    li { "Threshold: {threshold} Users" }
                }
                div { class: "progress mb-3",
                    div {
                        class: "progress-bar",
                        role: "progressbar",
                        style: "width: {progress}%",
                        aria_valuenow: "{progress:.2}",
                        aria_valuemin: "0",
                        aria_valuemax: "100",
                        "{progress:.2}%"
                    }
                }

                if registered {
                    p { class: "text-green-400",
                        "Registration Complete! User ID: {miner_id_display}"
                    }
                } else {
                    hr {}
                    form {
                        input {
                            r#type: "text",
                            class: "form-control",
                            aria_label: "Registration Message",
                            placeholder: "Registration Message (optional)",
                            maxlength: "{MAX_MEMO_LEN}",
                            value: "{memo_input}",
                            oninput: move |event| memo_input.set(event.value()),
                        }
                        br {}
                        button {
                            class: "btn btn-block btn-primary",
                            r#type: "button",
                            disabled: has_tx || is_submitting,
                            onclick: register_action,
                            div {
                                role: "status",
                                class: "{spinner_class} spinner-border spinner-border-sm text-info align-text-top mr-2",
                            }
                            "Register"
                        }
                    }
                }
            }

            if has_error {
                p { class: "text-red-400 mt-3", "{error_display}" }
            }

            if has_tx {
                TxStatus { tx_id: tx_display }
            }
        }
    }
}
