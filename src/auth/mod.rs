//! The authentication gate and its credential-verification strategies.

pub mod gate;
pub mod local;
pub mod verifier;

pub use gate::{AuthOutcome, CredentialAttempt, Gate, GateConfig, Strategy, StrategyConfig};
pub use gate::INVALID_CREDENTIALS;
pub use verifier::{CredentialVerifier, Verdict};
