/// The principal that deployed the CityCoin core contract.
pub const CONTRACT_DEPLOYER: &str = "ST1HTBVD3JG9C05J7HBJTHGR0GGW7KXW28M5JS8QE";

/// The name of the CityCoin core contract.
pub const CITYCOIN_CORE: &str = "citycoin-core";

/// One STX in micro-STX.
pub const MICRO_STX_PER_STX: u64 = 1_000_000;

/// Maximum length of the optional registration memo.
pub const MAX_MEMO_LEN: usize = 50;

// Read-only functions.
pub const FN_GET_MINING_STATS_AT_BLOCK: &str = "get-mining-stats-at-block";
pub const FN_IS_BLOCK_WINNER: &str = "is-block-winner";
pub const FN_CAN_CLAIM_MINING_REWARD: &str = "can-claim-mining-reward";
pub const FN_GET_REGISTERED_MINER_ID: &str = "get-registered-miner-id";
pub const FN_GET_REGISTERED_MINER_COUNT: &str = "get-registered-miner-count";
pub const FN_GET_REGISTERED_MINERS_THRESHOLD: &str = "get-registered-miners-threshold";
pub const FN_GET_MINING_ACTIVATION_STATUS: &str = "get-mining-activation-status";
pub const FN_GET_MINING_ACTIVATION_BLOCK_HEIGHT: &str = "get-mining-activation-block-height";

// Public (transaction) functions.
pub const FN_REGISTER_USER: &str = "register-user";
pub const FN_CLAIM_MINING_REWARD: &str = "claim-mining-reward";
