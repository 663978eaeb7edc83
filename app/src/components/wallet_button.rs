use dioxus::prelude::*;
use futures::StreamExt;

use crate::WalletState;

#[derive(Clone)]
enum WalletAction {
    Connect,
}

#[component]
pub fn WalletButton() -> Element {
    let mut wallet = use_context::<Signal<WalletState>>();

    // Use coroutine for lifecycle-safe async operations
    let wallet_coro = use_coroutine(move |mut rx: UnboundedReceiver<WalletAction>| async move {
        while let Some(action) = rx.next().await {
            match action {
                WalletAction::Connect => {
                    #[cfg(feature = "web")]
                    {
                        match connect_stacks_wallet().await {
                            Ok(address) => {
                                wallet.write().connected = true;
                                wallet.write().address = Some(address);
                            }
                            Err(e) => {
                                tracing::error!("Wallet connection failed: {}", e);
                            }
                        }
                    }
                }
            }
        }
    });

    let connect_wallet = move |_| {
        wallet_coro.send(WalletAction::Connect);
    };

    let disconnect_wallet = move |_| {
        wallet.write().connected = false;
        wallet.write().address = None;
    };

    let wallet_read = wallet.read();

    if wallet_read.connected {
        let address = wallet_read.address.clone().unwrap_or_default();
        let short_address = if address.len() > 9 {
            format!("{}...{}", &address[..5], &address[address.len() - 4..])
        } else {
            address.clone()
        };

        rsx! {
            div { class: "flex items-center space-x-2",
                span { class: "text-sm text-gray-400 font-mono", "{short_address}" }
                button {
                    class: "btn btn-secondary text-sm",
                    onclick: disconnect_wallet,
                    "Disconnect"
                }
            }
        }
    } else {
        rsx! {
            button {
                class: "btn btn-primary",
                onclick: connect_wallet,
                "Connect Wallet"
            }
        }
    }
}

#[cfg(feature = "web")]
async fn connect_stacks_wallet() -> Result<String, String> {
    use js_sys::{Array, Promise, Reflect};
    use wasm_bindgen::prelude::*;

    let window = web_sys::window().ok_or("No window")?;

    // Leather (and the legacy Hiro wallet) inject StacksProvider.
    let provider = Reflect::get(&window, &JsValue::from_str("StacksProvider"))
        .map_err(|_| "Stacks wallet not found")?;

    if provider.is_undefined() {
        // Open the wallet install page
        let _ = window.open_with_url("https://leather.io/");
        return Err("Stacks wallet not installed. Please install it and refresh.".to_string());
    }

    let request_fn =
        Reflect::get(&provider, &JsValue::from_str("request")).map_err(|_| "No request method")?;

    let request_fn: js_sys::Function = request_fn
        .dyn_into()
        .map_err(|_| "request is not a function")?;

    let promise = request_fn
        .call1(&provider, &JsValue::from_str("getAddresses"))
        .map_err(|e| format!("getAddresses call failed: {e:?}"))?;

    let promise: Promise = promise.dyn_into().map_err(|_| "Not a promise")?;

    let response = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| format!("Connection rejected: {e:?}"))?;

    // Response shape: { result: { addresses: [{ address, ... }, ...] } }
    let result = Reflect::get(&response, &JsValue::from_str("result"))
        .map_err(|_| "No result in response")?;

    let addresses = Reflect::get(&result, &JsValue::from_str("addresses"))
        .map_err(|_| "No addresses in response")?;

    let addresses: Array = addresses
        .dyn_into()
        .map_err(|_| "addresses is not an array")?;

    // Pick the STX account entry.
    for entry in addresses.iter() {
        let address = Reflect::get(&entry, &JsValue::from_str("address"))
            .ok()
            .and_then(|v| v.as_string());
        if let Some(address) = address {
            if address.starts_with("SP") || address.starts_with("ST") {
                return Ok(address);
            }
        }
    }

    Err("No Stacks address in wallet response".to_string())
}

#[cfg(not(feature = "web"))]
async fn connect_stacks_wallet() -> Result<String, String> {
    Err("Stacks wallet only available in web mode".to_string())
}
