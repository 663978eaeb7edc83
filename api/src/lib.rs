pub mod address;
pub mod clarity;
pub mod consts;
pub mod contract;
pub mod error;

pub mod prelude {
    pub use crate::address::*;
    pub use crate::clarity::*;
    pub use crate::consts::*;
    pub use crate::contract::*;
    pub use crate::error::*;
}
