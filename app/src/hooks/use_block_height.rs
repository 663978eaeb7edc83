use dioxus::prelude::*;

use super::rpc;

/// Poll interval for the chain tip, in milliseconds.
const BLOCK_HEIGHT_POLL_MS: u32 = 30_000;

/// Polls the node for the current block height. `None` until the first
/// successful fetch; a failed poll keeps the last known height.
pub fn use_block_height() -> Signal<Option<u64>> {
    let mut height = use_signal(|| None::<u64>);

    use_future(move || async move {
        loop {
            match rpc::fetch_block_height().await {
                Ok(tip) => height.set(Some(tip)),
                Err(e) => tracing::error!("block height fetch failed: {e}"),
            }
            gloo_timers::future::TimeoutFuture::new(BLOCK_HEIGHT_POLL_MS).await;
        }
    });

    height
}
