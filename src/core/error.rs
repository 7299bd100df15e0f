use thiserror::Error;

use crate::core::types::MarshalId;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("side cannot pay {required} action points ({available} available)")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("no route exists to the ordered destination")]
    NoPathAvailable,

    #[error("order target no longer exists: {0:?}")]
    TargetVanished(MarshalId),

    #[error("order references an unknown unit: {0:?}")]
    StaleOrderReference(MarshalId),

    #[error("unknown marshal: {0:?}")]
    UnknownMarshal(MarshalId),

    #[error("marshal {0:?} has no active order")]
    NoActiveOrder(MarshalId),

    #[error("marshal {0:?} is not awaiting a decision")]
    NotAwaitingInput(MarshalId),

    #[error("chosen option was not among those offered")]
    InvalidChoice,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("profile error: {0}")]
    ProfileError(String),
}

pub type Result<T> = std::result::Result<T, OrderError>;
