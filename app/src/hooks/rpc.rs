use citycoin_api::address::StacksAddress;
use citycoin_api::clarity::Value;
use citycoin_api::consts::{CITYCOIN_CORE, CONTRACT_DEPLOYER};
use citycoin_api::contract::{
    self, decode_bool, decode_miner_id, decode_uint, MiningStats, ReadOnlyCall,
};
use serde::{Deserialize, Serialize};

use crate::STACKS_API_URL;

#[derive(Serialize)]
pub struct ReadOnlyRequest {
    pub sender: String,
    pub arguments: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct ReadOnlyResponse {
    pub okay: bool,
    pub result: Option<String>,
    pub cause: Option<String>,
}

/// Executes a read-only function against the CityCoin core contract and
/// decodes the Clarity result.
pub async fn call_read_only(call: &ReadOnlyCall) -> Result<Value, String> {
    let client = reqwest::Client::new();
    let url = format!(
        "{STACKS_API_URL}/v2/contracts/call-read/{CONTRACT_DEPLOYER}/{CITYCOIN_CORE}/{}",
        call.function
    );

    let request = ReadOnlyRequest {
        sender: CONTRACT_DEPLOYER.to_string(),
        arguments: call.hex_args(),
    };

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let body: ReadOnlyResponse = response.json().await.map_err(|e| e.to_string())?;

    let result = read_only_result(body)?;
    Value::from_hex(&result).map_err(|e| e.to_string())
}

fn read_only_result(body: ReadOnlyResponse) -> Result<String, String> {
    if !body.okay {
        return Err(body
            .cause
            .unwrap_or_else(|| "read-only call failed".to_string()));
    }
    body.result
        .ok_or_else(|| "no result in response".to_string())
}

// ============ Typed contract queries ============

pub async fn get_registered_miner_count() -> Result<u64, String> {
    let value = call_read_only(&contract::get_registered_miner_count()).await?;
    decode_uint(value).map_err(|e| e.to_string())
}

pub async fn get_registered_miners_threshold() -> Result<u64, String> {
    let value = call_read_only(&contract::get_registered_miners_threshold()).await?;
    decode_uint(value).map_err(|e| e.to_string())
}

pub async fn get_mining_activation_status() -> Result<bool, String> {
    let value = call_read_only(&contract::get_mining_activation_status()).await?;
    decode_bool(value).map_err(|e| e.to_string())
}

pub async fn get_mining_activation_block_height() -> Result<u64, String> {
    let value = call_read_only(&contract::get_mining_activation_block_height()).await?;
    decode_uint(value).map_err(|e| e.to_string())
}

pub async fn get_registered_miner_id(address: &str) -> Result<Option<u64>, String> {
    let principal = parse_principal(address)?;
    let value = call_read_only(&contract::get_registered_miner_id(principal)).await?;
    decode_miner_id(value).map_err(|e| e.to_string())
}

pub async fn get_mining_stats_at_block(block_height: u64) -> Result<MiningStats, String> {
    let value = call_read_only(&contract::get_mining_stats_at_block(block_height)).await?;
    MiningStats::decode(value).map_err(|e| e.to_string())
}

pub async fn is_block_winner(address: &str, block_height: u64) -> Result<bool, String> {
    let principal = parse_principal(address)?;
    let value = call_read_only(&contract::is_block_winner(principal, block_height)).await?;
    decode_bool(value).map_err(|e| e.to_string())
}

pub async fn can_claim_mining_reward(address: &str, block_height: u64) -> Result<bool, String> {
    let principal = parse_principal(address)?;
    let value = call_read_only(&contract::can_claim_mining_reward(principal, block_height)).await?;
    decode_bool(value).map_err(|e| e.to_string())
}

fn parse_principal(address: &str) -> Result<StacksAddress, String> {
    address
        .parse()
        .map_err(|e| format!("invalid stacks address `{address}`: {e}"))
}

// ============ Node info ============

#[derive(Deserialize, Debug)]
struct CoreInfo {
    stacks_tip_height: u64,
}

/// Fetch the current Stacks chain tip height.
pub async fn fetch_block_height() -> Result<u64, String> {
    let client = reqwest::Client::new();
    let url = format!("{STACKS_API_URL}/v2/info");

    let response = client.get(&url).send().await.map_err(|e| e.to_string())?;
    let info: CoreInfo = response.json().await.map_err(|e| e.to_string())?;

    Ok(info.stacks_tip_height)
}

// ============ Transaction status ============

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxState {
    Pending,
    Success,
    Failed(String),
}

#[derive(Deserialize, Debug)]
struct TxResponse {
    tx_status: String,
}

/// Fetch the confirmation status of a broadcast transaction.
pub async fn fetch_tx_status(tx_id: &str) -> Result<TxState, String> {
    let client = reqwest::Client::new();
    let url = format!("{STACKS_API_URL}/extended/v1/tx/{tx_id}");

    let response = client.get(&url).send().await.map_err(|e| e.to_string())?;
    let tx: TxResponse = response.json().await.map_err(|e| e.to_string())?;

    Ok(map_tx_status(&tx.tx_status))
}

fn map_tx_status(status: &str) -> TxState {
    match status {
        "pending" => TxState::Pending,
        "success" => TxState::Success,
        other => TxState::Failed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_read_only_envelope() {
        let ok: ReadOnlyResponse =
            serde_json::from_str(r#"{"okay":true,"result":"0x03"}"#).unwrap();
        assert_eq!(read_only_result(ok).unwrap(), "0x03");

        let err: ReadOnlyResponse =
            serde_json::from_str(r#"{"okay":false,"cause":"Unchecked(NoSuchContract)"}"#).unwrap();
        assert_eq!(
            read_only_result(err).unwrap_err(),
            "Unchecked(NoSuchContract)"
        );
    }

    #[test]
    fn maps_tx_status_strings() {
        assert_eq!(map_tx_status("pending"), TxState::Pending);
        assert_eq!(map_tx_status("success"), TxState::Success);
        assert_eq!(
            map_tx_status("abort_by_response"),
            TxState::Failed("abort_by_response".to_string())
        );
    }
}
