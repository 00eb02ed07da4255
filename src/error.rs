//! Error taxonomy for router operations
//!
//! Every operation returns `Result<_, PilotError>` so the driver can tell an
//! unreachable node from a contract revert from a bad amount string.

use alloy_primitives::{Address, TxHash};
use alloy_transport::TransportError;
use serde::Serialize;
use thiserror::Error;

/// Coarse classification used for reporting and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Provider unreachable, timeout, malformed JSON-RPC exchange
    Rpc,
    /// Revert at estimation time, failed receipt, or an unusable contract response
    Contract,
    /// Bad amount string, unknown token, missing configuration
    Input,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Rpc => write!(f, "rpc"),
            ErrorKind::Contract => write!(f, "contract"),
            ErrorKind::Input => write!(f, "input"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PilotError {
    #[error("RPC error during {context}: {message}")]
    Rpc { context: &'static str, message: String },

    #[error("{context} reverted: {message}")]
    Reverted { context: &'static str, message: String },

    #[error("transaction {hash} ({method}) was mined but failed")]
    FailedReceipt { method: &'static str, hash: TxHash },

    #[error("cannot decode {method} response: {reason}")]
    Decode { method: &'static str, reason: String },

    #[error("invalid amount {amount:?} for {decimals} decimals: {reason}")]
    InvalidAmount {
        amount: String,
        decimals: u8,
        reason: String,
    },

    #[error("{0} is not in the address book")]
    UnknownContract(Address),

    #[error("no pool-share token configured for {0} / {1}")]
    UnknownPool(Address, Address),

    #[error("unusable router quote: {0}")]
    MalformedQuote(String),
}

impl PilotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PilotError::Rpc { .. } => ErrorKind::Rpc,
            PilotError::Reverted { .. }
            | PilotError::FailedReceipt { .. }
            | PilotError::Decode { .. }
            | PilotError::MalformedQuote(_) => ErrorKind::Contract,
            PilotError::InvalidAmount { .. }
            | PilotError::UnknownContract(_)
            | PilotError::UnknownPool(..) => ErrorKind::Input,
        }
    }

    /// Split a transport failure into "the node said revert" and everything else
    pub fn from_transport(context: &'static str, err: TransportError) -> Self {
        let message = err.to_string();
        if is_revert_message(&message) {
            PilotError::Reverted { context, message }
        } else {
            PilotError::Rpc { context, message }
        }
    }
}

fn is_revert_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("revert") || lower.contains("execution failed")
}

pub type Result<T> = std::result::Result<T, PilotError>;
