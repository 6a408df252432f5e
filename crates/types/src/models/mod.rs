//! Shared primitive models

pub mod amount;
pub mod chain;
pub mod secret_string;

pub use amount::{Amount, AmountError};
pub use chain::{is_native_evm_token, ChainId, VmFamily};
pub use secret_string::SecretString;
