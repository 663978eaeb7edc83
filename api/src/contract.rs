use serde::{Deserialize, Serialize};

use crate::address::StacksAddress;
use crate::clarity::Value;
use crate::consts::*;
use crate::error::Result;

/// A read-only function invocation against the CityCoin core contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadOnlyCall {
    pub function: &'static str,
    pub args: Vec<Value>,
}

/// A public function invocation, signed and broadcast through the wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    pub function: &'static str,
    pub args: Vec<Value>,
}

impl ReadOnlyCall {
    /// Hex-encoded arguments in the form the node's call-read endpoint takes.
    pub fn hex_args(&self) -> Vec<String> {
        self.args.iter().map(Value::to_hex).collect()
    }
}

impl ContractCall {
    pub fn hex_args(&self) -> Vec<String> {
        self.args.iter().map(Value::to_hex).collect()
    }
}

// ============ Read-only call descriptors ============

pub fn get_mining_stats_at_block(block_height: u64) -> ReadOnlyCall {
    ReadOnlyCall {
        function: FN_GET_MINING_STATS_AT_BLOCK,
        args: vec![Value::uint(block_height)],
    }
}

pub fn is_block_winner(address: StacksAddress, block_height: u64) -> ReadOnlyCall {
    ReadOnlyCall {
        function: FN_IS_BLOCK_WINNER,
        args: vec![Value::principal(address), Value::uint(block_height)],
    }
}

pub fn can_claim_mining_reward(address: StacksAddress, block_height: u64) -> ReadOnlyCall {
    ReadOnlyCall {
        function: FN_CAN_CLAIM_MINING_REWARD,
        args: vec![Value::principal(address), Value::uint(block_height)],
    }
}

pub fn get_registered_miner_id(address: StacksAddress) -> ReadOnlyCall {
    ReadOnlyCall {
        function: FN_GET_REGISTERED_MINER_ID,
        args: vec![Value::principal(address)],
    }
}

pub fn get_registered_miner_count() -> ReadOnlyCall {
    ReadOnlyCall {
        function: FN_GET_REGISTERED_MINER_COUNT,
        args: vec![],
    }
}

pub fn get_registered_miners_threshold() -> ReadOnlyCall {
    ReadOnlyCall {
        function: FN_GET_REGISTERED_MINERS_THRESHOLD,
        args: vec![],
    }
}

pub fn get_mining_activation_status() -> ReadOnlyCall {
    ReadOnlyCall {
        function: FN_GET_MINING_ACTIVATION_STATUS,
        args: vec![],
    }
}

pub fn get_mining_activation_block_height() -> ReadOnlyCall {
    ReadOnlyCall {
        function: FN_GET_MINING_ACTIVATION_BLOCK_HEIGHT,
        args: vec![],
    }
}

// ============ Transaction builders ============

/// Builds the register-user call. An empty or whitespace-only memo submits
/// `none`; anything else is trimmed, capped at [`MAX_MEMO_LEN`] characters and
/// wrapped as `(some u"...")`.
pub fn register_user(memo: Option<&str>) -> ContractCall {
    let memo = memo.map(str::trim).filter(|m| !m.is_empty());
    let memo_arg = match memo {
        Some(text) => Value::some(Value::string_utf8(
            text.chars().take(MAX_MEMO_LEN).collect::<String>(),
        )),
        None => Value::none(),
    };
    ContractCall {
        function: FN_REGISTER_USER,
        args: vec![memo_arg],
    }
}

pub fn claim_mining_reward(block_height: u64) -> ContractCall {
    ContractCall {
        function: FN_CLAIM_MINING_REWARD,
        args: vec![Value::uint(block_height)],
    }
}

// ============ Typed response views ============

/// Mining statistics for a single block, decoded from
/// `get-mining-stats-at-block`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningStats {
    /// Total committed to the block, in micro-STX.
    pub amount: u128,

    /// Portion routed to the city treasury, in micro-STX.
    pub amount_to_city: u128,

    /// Portion routed to stackers, in micro-STX.
    pub amount_to_stackers: u128,

    /// Number of miners that competed for the block.
    pub miners_count: u64,

    /// Whether the block reward was already claimed.
    pub reward_claimed: bool,
}

impl MiningStats {
    pub fn decode(value: Value) -> Result<Self> {
        let tuple = value.into_response()?;
        Ok(MiningStats {
            amount: tuple.tuple_get("amount")?.as_u128()?,
            amount_to_city: tuple.tuple_get("amountToCity")?.as_u128()?,
            amount_to_stackers: tuple.tuple_get("amountToStackers")?.as_u128()?,
            miners_count: tuple.tuple_get("minersCount")?.as_u64()?,
            reward_claimed: tuple.tuple_get("rewardClaimed")?.as_bool()?,
        })
    }
}

/// Decodes the boolean result of `is-block-winner` and
/// `can-claim-mining-reward`.
pub fn decode_bool(value: Value) -> Result<bool> {
    value.as_bool()
}

/// Decodes `get-registered-miner-id`: `none` means the address never
/// registered.
pub fn decode_miner_id(value: Value) -> Result<Option<u64>> {
    match value.as_optional()? {
        Some(inner) => Ok(Some(inner.as_u64()?)),
        None => Ok(None),
    }
}

/// Decodes the plain uint results (miner count, threshold, activation block
/// height).
pub fn decode_uint(value: Value) -> Result<u64> {
    value.as_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_memo_argument() {
        // Empty memo submits `none`.
        assert_eq!(register_user(None).args, vec![Value::none()]);
        assert_eq!(register_user(Some("")).args, vec![Value::none()]);
        assert_eq!(register_user(Some("   ")).args, vec![Value::none()]);

        // Non-empty memo is trimmed and wrapped as `some`.
        assert_eq!(
            register_user(Some("hello")).args,
            vec![Value::some(Value::string_utf8("hello"))]
        );
        assert_eq!(
            register_user(Some("  gm miners  ")).args,
            vec![Value::some(Value::string_utf8("gm miners"))]
        );
    }

    #[test]
    fn register_memo_is_capped() {
        let long = "x".repeat(MAX_MEMO_LEN + 10);
        let call = register_user(Some(&long));
        assert_eq!(
            call.args,
            vec![Value::some(Value::string_utf8("x".repeat(MAX_MEMO_LEN)))]
        );
    }

    #[test]
    fn claim_takes_the_block_height_as_sole_argument() {
        let call = claim_mining_reward(12345);
        assert_eq!(call.function, FN_CLAIM_MINING_REWARD);
        assert_eq!(call.args, vec![Value::uint(12345u64)]);
    }

    #[test]
    fn winner_queries_take_principal_and_height() {
        let address = StacksAddress::new(StacksAddress::VERSION_TESTNET_SINGLESIG, [1; 20]);
        let call = is_block_winner(address, 7);
        assert_eq!(
            call.args,
            vec![Value::principal(address), Value::uint(7u64)]
        );
        let call = can_claim_mining_reward(address, 7);
        assert_eq!(call.function, FN_CAN_CLAIM_MINING_REWARD);
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn decodes_mining_stats() {
        let wire = Value::ResponseOk(Box::new(Value::Tuple(vec![
            ("amount".into(), Value::uint(5_000_000u64)),
            ("amountToCity".into(), Value::uint(1_500_000u64)),
            ("amountToStackers".into(), Value::uint(3_500_000u64)),
            ("minersCount".into(), Value::uint(12u64)),
            ("rewardClaimed".into(), Value::Bool(true)),
        ])));
        let stats = MiningStats::decode(wire).unwrap();
        assert_eq!(stats.amount, 5_000_000);
        assert_eq!(stats.amount_to_city, 1_500_000);
        assert_eq!(stats.amount_to_stackers, 3_500_000);
        assert_eq!(stats.miners_count, 12);
        assert!(stats.reward_claimed);
    }

    #[test]
    fn decodes_miner_id_presence() {
        assert_eq!(
            decode_miner_id(Value::some(Value::uint(3u64))).unwrap(),
            Some(3)
        );
        assert_eq!(decode_miner_id(Value::none()).unwrap(), None);
        assert!(decode_miner_id(Value::Bool(true)).is_err());
    }
}
