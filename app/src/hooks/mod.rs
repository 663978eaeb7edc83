mod rpc;
mod submit;
mod use_block_height;
mod use_registration;

pub use rpc::*;
pub use submit::{submit_contract_call, SubmitOutcome};
pub use use_block_height::use_block_height;
pub use use_registration::{use_registration, RegistrationState};
