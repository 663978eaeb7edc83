mod block_height;
mod layout;
mod tx_status;
mod wallet_button;

pub use block_height::CurrentBlockHeight;
pub use layout::Layout;
pub use tx_status::TxStatus;
pub use wallet_button::WalletButton;
