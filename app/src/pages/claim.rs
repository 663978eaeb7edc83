use dioxus::prelude::*;

use citycoin_api::consts::MICRO_STX_PER_STX;
use citycoin_api::contract::{self, MiningStats};

use crate::components::{CurrentBlockHeight, TxStatus};
use crate::hooks::{self, submit_contract_call, SubmitOutcome};
use crate::WalletState;

/// One read-only query slot in the claim panel.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryState<T> {
    Idle,
    /// Input validation failed; no query was issued.
    Invalid(&'static str),
    Loading,
    Ready(T),
    /// The query itself failed; the user can retry.
    Failed(String),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Idle
    }
}

/// Result of the two-step winner check for one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinnerCheck {
    pub is_winner: bool,
    pub can_claim: bool,
}

impl WinnerCheck {
    /// The "Claimed?" line: an eligible winner has not claimed yet; a winner
    /// who can no longer claim already did.
    pub fn claimed_display(&self) -> Option<&'static str> {
        if self.can_claim {
            Some("No")
        } else if self.is_winner {
            Some("Already claimed!")
        } else {
            None
        }
    }
}

/// View state for the mining-claim workflow, owned by the Claim page.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ClaimState {
    pub stats: QueryState<MiningStats>,
    /// The block height the last stats query ran against.
    pub stats_height: Option<u64>,
    pub winner: QueryState<WinnerCheck>,
    /// Set only when a completed winner check said the reward is claimable.
    pub can_claim: bool,
    /// The block height the last winner check ran against; the claim
    /// transaction uses this, not whatever is in the input box now.
    pub checked_height: Option<u64>,
    pub submitting: bool,
    pub tx_id: Option<String>,
    pub submit_error: Option<String>,
}

impl ClaimState {
    pub fn start_stats(&mut self, input: &str) -> Option<u64> {
        match parse_block_height(input) {
            Ok(height) => {
                self.stats = QueryState::Loading;
                self.stats_height = Some(height);
                Some(height)
            }
            Err(message) => {
                self.stats = QueryState::Invalid(message);
                None
            }
        }
    }

    pub fn finish_stats(&mut self, result: Result<MiningStats, String>) {
        self.stats = match result {
            Ok(stats) => QueryState::Ready(stats),
            Err(e) => QueryState::Failed(e),
        };
    }

    pub fn start_winner(&mut self, input: &str) -> Option<u64> {
        match parse_block_height(input) {
            Ok(height) => {
                self.winner = QueryState::Loading;
                self.checked_height = Some(height);
                Some(height)
            }
            Err(message) => {
                self.winner = QueryState::Invalid(message);
                None
            }
        }
    }

    /// Completes the winner check. This is the only place the claim-enabled
    /// flag is ever set.
    pub fn finish_winner(&mut self, result: Result<WinnerCheck, String>) {
        match result {
            Ok(check) => {
                self.winner = QueryState::Ready(check);
                self.can_claim = check.can_claim;
            }
            Err(e) => {
                self.winner = QueryState::Failed(e);
                self.can_claim = false;
            }
        }
    }

    pub fn start_submit(&mut self) {
        self.submitting = true;
        self.submit_error = None;
    }

    pub fn finish_submit(&mut self, outcome: Result<SubmitOutcome, String>) {
        self.submitting = false;
        match outcome {
            Ok(SubmitOutcome::Finished { tx_id }) => self.tx_id = Some(tx_id),
            // Cancellation is a normal terminal path: eligibility stands and
            // the user may retry.
            Ok(SubmitOutcome::Cancelled) => {}
            Err(e) => self.submit_error = Some(e),
        }
    }

    pub fn claim_enabled(&self) -> bool {
        self.can_claim && !self.submitting && self.tx_id.is_none()
    }
}

fn parse_block_height(input: &str) -> Result<u64, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Block Height Required!");
    }
    trimmed
        .parse()
        .map_err(|_| "Block height must be a number!")
}

/// Renders a micro-STX amount in STX, exact, with trailing zeros trimmed.
fn stx_display(ustx: u128) -> String {
    let micro = MICRO_STX_PER_STX as u128;
    let whole = ustx / micro;
    let frac = ustx % micro;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac = format!("{frac:06}");
        format!("{whole}.{}", frac.trim_end_matches('0'))
    }
}

#[component]
pub fn Claim() -> Element {
    let wallet = use_context::<Signal<WalletState>>();

    let mut block_height_input = use_signal(String::new);
    let mut state = use_signal(ClaimState::default);

    let check_stats = move |_| {
        let height = state.write().start_stats(&block_height_input.read());
        if let Some(height) = height {
            spawn(async move {
                let result = hooks::get_mining_stats_at_block(height).await;
                state.write().finish_stats(result);
            });
        }
    };

    let check_winner = move |_| {
        let Some(address) = wallet.read().address.clone() else {
            state.write().winner = QueryState::Failed("Connect your wallet first".to_string());
            return;
        };
        let height = state.write().start_winner(&block_height_input.read());
        if let Some(height) = height {
            spawn(async move {
                // Sequential: eligibility runs only after the winner query
                // completes, and the panel updates once with both results.
                let result = async {
                    let is_winner = hooks::is_block_winner(&address, height).await?;
                    let can_claim = hooks::can_claim_mining_reward(&address, height).await?;
                    Ok(WinnerCheck {
                        is_winner,
                        can_claim,
                    })
                }
                .await;
                state.write().finish_winner(result);
            });
        }
    };

    let claim_action = move |_| {
        if !state.read().claim_enabled() {
            return;
        }
        let Some(sender) = wallet.read().address.clone() else {
            return;
        };
        let Some(height) = state.read().checked_height else {
            return;
        };
        spawn(async move {
            state.write().start_submit();
            let call = contract::claim_mining_reward(height);
            let outcome = submit_contract_call(&sender, &call).await;
            state.write().finish_submit(outcome);
        });
    };

    let state_read = state.read();
    let claim_enabled = state_read.claim_enabled();
    let is_submitting = state_read.submitting;
    let checked_height = state_read.checked_height;
    let stats_height = state_read.stats_height;
    let stats = state_read.stats.clone();
    let winner = state_read.winner.clone();
    let submit_error = state_read.submit_error.clone();
    let tx_id = state_read.tx_id.clone();
    drop(state_read);

    let spinner_class = if is_submitting { "" } else { "d-none" };
    let error_display = submit_error.unwrap_or_default();
    let has_error = !error_display.is_empty();
    let has_tx = tx_id.is_some();
    let tx_display = tx_id.unwrap_or_default();

    rsx! {
        div { class: "card max-w-2xl mx-auto",
            h3 { class: "text-lg font-semibold text-city-400 mb-2", "Claim Mining Rewards" }
            CurrentBlockHeight {}

            div { class: "mb-3 mt-3",
                div { class: "form-floating",
                    input {
                        class: "form-control",
                        placeholder: "Block Height?",
                        id: "blockHeightToCheck",
                        value: "{block_height_input}",
                        oninput: move |event| block_height_input.set(event.value()),
                    }
                    label { r#for: "blockHeightToCheck", "Block Height?" }
                }
                button {
                    class: "btn btn-block btn-primary my-3 me-3",
                    r#type: "button",
                    onclick: check_stats,
                    "Get Mining Stats"
                }
                button {
                    class: "btn btn-block btn-primary my-3 me-3",
                    r#type: "button",
                    onclick: check_winner,
                    "Check if Winner"
                }
                button {
                    class: "btn btn-block btn-primary my-3",
                    r#type: "button",
                    disabled: !claim_enabled,
                    onclick: claim_action,
                    div {
                        role: "status",
                        class: "{spinner_class} spinner-border spinner-border-sm text-info align-text-top ms-1 me-2",
                    }
                    "Claim Rewards"
                }

                StatsPanel { stats: stats, block_height: stats_height }
                WinnerPanel { winner: winner, block_height: checked_height }

                if has_error {
                    p { class: "text-red-400 mt-3", "{error_display}" }
                }

                br {}
                if has_tx {
                    TxStatus { tx_id: tx_display }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct StatsPanelProps {
    stats: QueryState<MiningStats>,
    block_height: Option<u64>,
}

#[component]
fn StatsPanel(props: StatsPanelProps) -> Element {
    match &props.stats {
        QueryState::Idle => rsx! {},
        QueryState::Invalid(message) => rsx! {
            p { class: "text-yellow-400", "{message}" }
        },
        QueryState::Loading => rsx! {
            p { class: "text-gray-400", "Loading..." }
        },
        QueryState::Failed(reason) => rsx! {
            p { class: "text-red-400", "Stats query failed: {reason}. Please retry." }
        },
        QueryState::Ready(stats) => {
            let heading = match props.block_height {
                Some(height) => format!("Mining Stats At Block {height}"),
                None => "Mining Stats".to_string(),
            };
            let total_stx = stx_display(stats.amount);
            let city_stx = stx_display(stats.amount_to_city);
            let stackers_stx = stx_display(stats.amount_to_stackers);
            rsx! {
                div { class: "mt-3 space-y-1",
                    div { class: "fs-6 fw-bold", "{heading}" }
                    StatRow { label: "Total uSTX:", value: "{stats.amount}" }
                    StatRow { label: "Total STX:", value: "{total_stx}" }
                    StatRow { label: "Amount to City:", value: "{city_stx}" }
                    StatRow { label: "Amount to Stackers:", value: "{stackers_stx}" }
                    StatRow { label: "Total Miners:", value: "{stats.miners_count}" }
                    StatRow { label: "Reward Claimed:", value: "{stats.reward_claimed}" }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct WinnerPanelProps {
    winner: QueryState<WinnerCheck>,
    block_height: Option<u64>,
}

#[component]
fn WinnerPanel(props: WinnerPanelProps) -> Element {
    match &props.winner {
        QueryState::Idle => rsx! {},
        QueryState::Invalid(message) => rsx! {
            p { class: "text-yellow-400", "{message}" }
        },
        QueryState::Loading => rsx! {
            p { class: "text-gray-400", "Loading..." }
        },
        QueryState::Failed(reason) => rsx! {
            p { class: "text-red-400", "Winner check failed: {reason}. Please retry." }
        },
        QueryState::Ready(check) => {
            let heading = match props.block_height {
                Some(height) => format!("Winner at Block {height}"),
                None => "Winner".to_string(),
            };
            let claimed = check.claimed_display();
            let has_claimed_row = claimed.is_some();
            let claimed_value = claimed.unwrap_or_default().to_string();
            rsx! {
                div { class: "mt-3 space-y-1",
                    div { class: "fs-6 fw-bold", "{heading}" }
                    StatRow { label: "Winner?", value: "{check.is_winner}" }
                    if has_claimed_row {
                        StatRow { label: "Claimed?", value: claimed_value }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct StatRowProps {
    label: &'static str,
    value: String,
}

#[component]
fn StatRow(props: StatRowProps) -> Element {
    rsx! {
        div { class: "flex gap-4",
            span { class: "text-gray-500 w-40", "{props.label}" }
            span { class: "text-gray-200 font-mono", "{props.value}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eligible_check() -> WinnerCheck {
        WinnerCheck {
            is_winner: true,
            can_claim: true,
        }
    }

    #[test]
    fn empty_block_height_short_circuits_without_querying() {
        let mut state = ClaimState::default();

        assert_eq!(state.start_stats(""), None);
        assert_eq!(state.stats, QueryState::Invalid("Block Height Required!"));

        assert_eq!(state.start_winner("   "), None);
        assert_eq!(state.winner, QueryState::Invalid("Block Height Required!"));
        assert_eq!(state.checked_height, None);
    }

    #[test]
    fn non_numeric_block_height_is_rejected() {
        let mut state = ClaimState::default();
        assert_eq!(state.start_stats("twelve"), None);
        assert_eq!(
            state.stats,
            QueryState::Invalid("Block height must be a number!")
        );
    }

    #[test]
    fn valid_block_height_starts_the_queries() {
        let mut state = ClaimState::default();
        assert_eq!(state.start_stats(" 12345 "), Some(12345));
        assert_eq!(state.stats, QueryState::Loading);

        assert_eq!(state.start_winner("12345"), Some(12345));
        assert_eq!(state.checked_height, Some(12345));
    }

    #[test]
    fn stx_display_is_exact() {
        assert_eq!(stx_display(5_000_000), "5");
        assert_eq!(stx_display(2_500_000), "2.5");
        assert_eq!(stx_display(1), "0.000001");
        assert_eq!(stx_display(0), "0");
        assert_eq!(stx_display(1_000_001), "1.000001");
    }

    #[test]
    fn claim_enabled_follows_the_latest_winner_check() {
        let mut state = ClaimState::default();
        assert!(!state.claim_enabled());

        state.start_winner("100");
        state.finish_winner(Ok(eligible_check()));
        assert!(state.claim_enabled());

        state.start_winner("101");
        state.finish_winner(Ok(WinnerCheck {
            is_winner: false,
            can_claim: false,
        }));
        assert!(!state.claim_enabled());
    }

    #[test]
    fn failed_winner_check_disables_the_claim() {
        let mut state = ClaimState::default();
        state.start_winner("100");
        state.finish_winner(Ok(eligible_check()));
        assert!(state.claim_enabled());

        state.start_winner("100");
        state.finish_winner(Err("timeout".to_string()));
        assert!(!state.claim_enabled());
        assert!(matches!(state.winner, QueryState::Failed(_)));
    }

    #[test]
    fn cancellation_clears_loading_and_leaves_eligibility_untouched() {
        let mut state = ClaimState::default();
        state.start_winner("100");
        state.finish_winner(Ok(eligible_check()));

        state.start_submit();
        assert!(state.submitting);
        assert!(!state.claim_enabled());

        state.finish_submit(Ok(SubmitOutcome::Cancelled));
        assert!(!state.submitting);
        assert!(state.can_claim);
        assert_eq!(state.tx_id, None);
        // The workflow is resumable: the user may retry.
        assert!(state.claim_enabled());
    }

    #[test]
    fn finished_submission_records_the_tx_and_disables_the_claim() {
        let mut state = ClaimState::default();
        state.start_winner("100");
        state.finish_winner(Ok(eligible_check()));

        state.start_submit();
        state.finish_submit(Ok(SubmitOutcome::Finished {
            tx_id: "0xabc".to_string(),
        }));
        assert!(!state.submitting);
        assert_eq!(state.tx_id.as_deref(), Some("0xabc"));
        assert!(!state.claim_enabled());
    }

    #[test]
    fn submit_error_is_surfaced() {
        let mut state = ClaimState::default();
        state.start_winner("100");
        state.finish_winner(Ok(eligible_check()));

        state.start_submit();
        state.finish_submit(Err("wallet exploded".to_string()));
        assert!(!state.submitting);
        assert_eq!(state.submit_error.as_deref(), Some("wallet exploded"));
        // Eligibility still stands; the user may retry the submission.
        assert!(state.claim_enabled());
    }

    #[test]
    fn claimed_indicator_derivation() {
        assert_eq!(eligible_check().claimed_display(), Some("No"));
        assert_eq!(
            WinnerCheck {
                is_winner: true,
                can_claim: false
            }
            .claimed_display(),
            Some("Already claimed!")
        );
        assert_eq!(
            WinnerCheck {
                is_winner: false,
                can_claim: false
            }
            .claimed_display(),
            None
        );
    }

    #[test]
    fn stats_failure_is_an_explicit_retryable_state() {
        let mut state = ClaimState::default();
        state.start_stats("100");
        state.finish_stats(Err("timeout".to_string()));
        assert_eq!(state.stats, QueryState::Failed("timeout".to_string()));

        // Retry succeeds.
        state.start_stats("100");
        state.finish_stats(Ok(MiningStats {
            amount: 5_000_000,
            ..Default::default()
        }));
        assert!(matches!(state.stats, QueryState::Ready(_)));
    }
}
