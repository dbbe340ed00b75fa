//! Oracle infrastructure: the Ollama-backed implementation of the oracle
//! port, plus a scripted mock for tests.

pub mod client;
pub mod error;
pub mod mock;
pub mod retry;
pub mod types;

pub use client::OllamaClient;
pub use error::OracleApiError;
pub use mock::MockOracle;
pub use retry::RetryPolicy;
