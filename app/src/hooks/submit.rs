use citycoin_api::contract::ContractCall;

/// Terminal outcome of a wallet submission. Exactly one of these is produced
/// per call: either the wallet broadcast the transaction and returned its id,
/// or the user dismissed the signing prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Finished { tx_id: String },
    Cancelled,
}

/// Signs and broadcasts a CityCoin contract call through the injected Stacks
/// wallet provider. Provider failures other than user rejection surface as
/// errors.
#[cfg(feature = "web")]
pub async fn submit_contract_call(
    sender: &str,
    call: &ContractCall,
) -> Result<SubmitOutcome, String> {
    use js_sys::{Array, Object, Promise, Reflect};
    use wasm_bindgen::prelude::*;

    use citycoin_api::consts::{CITYCOIN_CORE, CONTRACT_DEPLOYER};

    let window = web_sys::window().ok_or("No window")?;

    // Leather and the legacy Hiro wallet both inject StacksProvider.
    let provider = Reflect::get(&window, &JsValue::from_str("StacksProvider"))
        .map_err(|_| "Stacks wallet not found")?;

    if provider.is_undefined() {
        let _ = window.open_with_url("https://leather.io/");
        return Err("Stacks wallet not installed. Please install it and refresh.".to_string());
    }

    // Contract-call payload in the shape transactionRequest expects.
    let payload = Object::new();
    let entries: &[(&str, JsValue)] = &[
        ("contractAddress", JsValue::from_str(CONTRACT_DEPLOYER)),
        ("contractName", JsValue::from_str(CITYCOIN_CORE)),
        ("functionName", JsValue::from_str(call.function)),
        ("network", JsValue::from_str(crate::NETWORK)),
        ("stxAddress", JsValue::from_str(sender)),
        ("postConditionMode", JsValue::from_f64(1.0)),
    ];
    for (key, value) in entries {
        Reflect::set(&payload, &JsValue::from_str(key), value)
            .map_err(|_| format!("Failed to set {key}"))?;
    }

    let args = Array::new();
    for hex in call.hex_args() {
        args.push(&JsValue::from_str(&hex));
    }
    Reflect::set(&payload, &JsValue::from_str("functionArgs"), &args.into())
        .map_err(|_| "Failed to set functionArgs")?;

    let request_fn = Reflect::get(&provider, &JsValue::from_str("transactionRequest"))
        .map_err(|_| "No transactionRequest method")?;

    let request_fn: js_sys::Function = request_fn
        .dyn_into()
        .map_err(|_| "transactionRequest is not a function")?;

    let promise = request_fn
        .call1(&provider, &payload.into())
        .map_err(|e| format!("Transaction request failed: {e:?}"))?;

    let promise: Promise = promise.dyn_into().map_err(|_| "Not a promise")?;

    match wasm_bindgen_futures::JsFuture::from(promise).await {
        Ok(result) => {
            // The provider answers with { txId } on broadcast.
            let tx_id = Reflect::get(&result, &JsValue::from_str("txId"))
                .ok()
                .and_then(|v| v.as_string())
                .or_else(|| result.as_string())
                .ok_or("No txId in response")?;
            Ok(SubmitOutcome::Finished { tx_id })
        }
        Err(rejection) => {
            let code = Reflect::get(&rejection, &JsValue::from_str("code"))
                .ok()
                .and_then(|v| v.as_f64());
            let message = Reflect::get(&rejection, &JsValue::from_str("message"))
                .ok()
                .and_then(|v| v.as_string())
                .or_else(|| rejection.as_string())
                .unwrap_or_default();

            if rejection_is_cancel(code, &message) {
                Ok(SubmitOutcome::Cancelled)
            } else {
                Err(format!("Transaction submission failed: {message}"))
            }
        }
    }
}

/// EIP-1193-style user-rejection code, or the reject/cancel wording wallets
/// put in the rejection message.
fn rejection_is_cancel(code: Option<f64>, message: &str) -> bool {
    if code == Some(4001.0) {
        return true;
    }
    let message = message.to_ascii_lowercase();
    message.contains("reject") || message.contains("cancel") || message.contains("denied")
}

#[cfg(not(feature = "web"))]
pub async fn submit_contract_call(
    _sender: &str,
    _call: &ContractCall,
) -> Result<SubmitOutcome, String> {
    Err("Transaction signing only available in web mode".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_user_rejection() {
        assert!(rejection_is_cancel(Some(4001.0), ""));
        assert!(rejection_is_cancel(None, "User rejected the request"));
        assert!(rejection_is_cancel(None, "Request cancelled by user"));
        assert!(!rejection_is_cancel(None, "network timeout"));
        assert!(!rejection_is_cancel(Some(500.0), "internal wallet error"));
    }
}
