#![allow(non_snake_case)]

mod components;
mod hooks;
mod pages;
mod route;

use dioxus::prelude::*;
use route::Route;

// Configuration
pub const STACKS_API_URL: &str = "https://stacks-node-api.testnet.stacks.co";
pub const EXPLORER_URL: &str = "https://explorer.stacks.co";
pub const NETWORK: &str = "testnet";

pub use citycoin_api::consts::{CITYCOIN_CORE, CONTRACT_DEPLOYER};

fn main() {
    #[cfg(feature = "web")]
    {
        tracing_wasm::set_as_global_default();
        dioxus::launch(App);
    }

    #[cfg(feature = "desktop")]
    {
        dioxus::launch(App);
    }
}

#[component]
fn App() -> Element {
    // Global state providers
    use_context_provider(|| Signal::new(WalletState::default()));

    rsx! {
        Router::<Route> {}
    }
}

// Global state types
#[derive(Clone, Default, Debug, PartialEq)]
pub struct WalletState {
    pub connected: bool,
    pub address: Option<String>,
}
