use dioxus::prelude::*;

use crate::WalletState;

use super::rpc;

/// View state for the registration workflow. Owned by the Register page; the
/// mount-time fetches write to disjoint fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistrationState {
    /// How many miners have registered so far.
    pub miner_count: u64,

    /// Registrations required to activate mining. Starts at 1 so the
    /// progress bar always has a denominator, falls back to 5 if the
    /// threshold query fails.
    pub threshold: u64,

    /// Whether the contract has activated. `None` until the status query
    /// resolves.
    pub activation: Option<bool>,

    /// Block at which mining begins. Only fetched once activation is known
    /// to be true.
    pub activation_block_height: Option<u64>,

    /// The caller's miner id. A non-null id is what "registered" means.
    pub miner_id: Option<u64>,

    pub loading: bool,
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self {
            miner_count: 0,
            threshold: 1,
            activation: None,
            activation_block_height: None,
            miner_id: None,
            loading: true,
        }
    }
}

impl RegistrationState {
    pub const THRESHOLD_FALLBACK: u64 = 5;

    pub fn apply_count(&mut self, result: Result<u64, String>) {
        self.miner_count = match result {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("miner count query failed: {e}");
                0
            }
        };
    }

    pub fn apply_threshold(&mut self, result: Result<u64, String>) {
        self.threshold = match result {
            Ok(threshold) => threshold,
            Err(e) => {
                tracing::error!("threshold query failed: {e}");
                Self::THRESHOLD_FALLBACK
            }
        };
    }

    /// Records the activation status. Returns whether the activation block
    /// height should be fetched.
    pub fn apply_activation(&mut self, result: Result<bool, String>) -> bool {
        match result {
            Ok(status) => {
                self.activation = Some(status);
                status
            }
            Err(e) => {
                tracing::error!("activation status query failed: {e}");
                false
            }
        }
    }

    pub fn apply_activation_height(&mut self, result: Result<u64, String>) {
        match result {
            Ok(height) => self.activation_block_height = Some(height),
            Err(e) => tracing::error!("activation height query failed: {e}"),
        }
    }

    /// Records the caller's miner id if one came back.
    pub fn apply_miner_id(&mut self, id: Option<u64>) {
        if id.is_some() {
            self.miner_id = id;
        }
    }

    pub fn registered(&self) -> bool {
        self.miner_id.is_some()
    }

    pub fn activated(&self) -> bool {
        self.activation == Some(true)
    }

    /// Progress toward activation. Deliberately unclamped: counts past the
    /// threshold render as more than 100%.
    pub fn progress_percent(&self) -> f64 {
        self.miner_count as f64 / self.threshold as f64 * 100.0
    }
}

pub fn use_registration() -> Signal<RegistrationState> {
    let mut state = use_signal(RegistrationState::default);
    let wallet = use_context::<Signal<WalletState>>();

    // Extract the wallet address as a memo; it may arrive after mount.
    let wallet_address = use_memo(move || wallet.read().address.clone());

    // Global contract parameters, fetched once on mount. The three queries
    // run concurrently and each applies its own fallback, so one failure
    // never blocks the others.
    use_future(move || async move {
        let mut count_state = state;
        let mut threshold_state = state;
        let mut activation_state = state;
        futures::join!(
            async move {
                let result = rpc::get_registered_miner_count().await;
                count_state.write().apply_count(result);
            },
            async move {
                let result = rpc::get_registered_miners_threshold().await;
                threshold_state.write().apply_threshold(result);
            },
            async move {
                let result = rpc::get_mining_activation_status().await;
                let fetch_height = activation_state.write().apply_activation(result);
                if fetch_height {
                    let height = rpc::get_mining_activation_block_height().await;
                    activation_state.write().apply_activation_height(height);
                }
            },
        );
        state.write().loading = false;
    });

    // The caller's registration id, once an address is available.
    use_effect(move || {
        if let Some(address) = wallet_address() {
            spawn(async move {
                match rpc::get_registered_miner_id(&address).await {
                    Ok(id) => state.write().apply_miner_id(id),
                    Err(e) => tracing::error!("miner id query failed: {e}"),
                }
            });
        }
    });

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_defaults_to_one_before_first_fetch() {
        let state = RegistrationState::default();
        assert_eq!(state.threshold, 1);
        assert!(state.loading);
    }

    #[test]
    fn count_falls_back_to_zero_on_failure() {
        let mut state = RegistrationState::default();
        state.apply_count(Err("timeout".to_string()));
        assert_eq!(state.miner_count, 0);

        state.apply_count(Ok(7));
        assert_eq!(state.miner_count, 7);
    }

    #[test]
    fn threshold_falls_back_to_five_on_failure() {
        let mut state = RegistrationState::default();
        state.apply_threshold(Err("timeout".to_string()));
        assert_eq!(state.threshold, RegistrationState::THRESHOLD_FALLBACK);
    }

    #[test]
    fn activation_height_is_gated_on_activation_status() {
        let mut state = RegistrationState::default();

        assert!(!state.apply_activation(Ok(false)));
        assert_eq!(state.activation, Some(false));
        assert!(!state.activated());

        assert!(!state.apply_activation(Err("timeout".to_string())));

        assert!(state.apply_activation(Ok(true)));
        state.apply_activation_height(Ok(12345));
        assert!(state.activated());
        assert_eq!(state.activation_block_height, Some(12345));
    }

    #[test]
    fn progress_can_exceed_one_hundred_percent() {
        let mut state = RegistrationState::default();
        state.apply_count(Ok(3));
        state.apply_threshold(Ok(5));
        assert_eq!(state.progress_percent(), 60.0);

        state.apply_count(Ok(10));
        assert_eq!(state.progress_percent(), 200.0);
    }

    #[test]
    fn registered_means_a_miner_id_came_back() {
        let mut state = RegistrationState::default();
        assert!(!state.registered());

        state.apply_miner_id(None);
        assert!(!state.registered());

        state.apply_miner_id(Some(42));
        assert!(state.registered());

        // A later empty result does not clear an id already seen.
        state.apply_miner_id(None);
        assert_eq!(state.miner_id, Some(42));
    }
}
