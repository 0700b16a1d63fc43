use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Execution status of a transaction as reported by an access node.
///
/// Moves monotonically towards [`Sealed`](ExecutionStatus::Sealed) or
/// [`Expired`](ExecutionStatus::Expired).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ExecutionStatus {
    #[default]
    Unknown = 0,
    Pending = 1,
    Finalized = 2,
    Executed = 3,
    Sealed = 4,
    Expired = 5,
}

impl ExecutionStatus {
    /// Whether the status can no longer change.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Sealed | Self::Expired)
    }
}

impl FromStr for ExecutionStatus {
    type Err = core::convert::Infallible;

    /// Parses the access API status names. Anything unrecognized is `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "finalized" => Self::Finalized,
            "executed" => Self::Executed,
            "sealed" => Self::Sealed,
            "expired" => Self::Expired,
            _ => Self::Unknown,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum GrpcStatus {
    Ok = 0,
    Cancelled = 1,
    Failed = 2,
}

impl GrpcStatus {
    /// Remaps a raw status code: `0` and `1` keep their meaning, every other code collapses to
    /// [`GrpcStatus::Failed`].
    pub fn from_raw(code: i64) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Cancelled,
            _ => Self::Failed,
        }
    }
}

/// Status embedded into an indexed transaction. The only transaction field that changes
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    pub execution_status: ExecutionStatus,
    pub grpc_status: GrpcStatus,
    pub error_message: String,
}

impl TransactionStatus {
    pub fn new(execution_status: ExecutionStatus, raw_code: i64, error_message: String) -> Self {
        Self {
            execution_status,
            grpc_status: GrpcStatus::from_raw(raw_code),
            error_message,
        }
    }
}
