//! Traits describing the collaborators the viewer talks to.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ang::AngNumber, lines::LineRecord};

/// Storage key under which the last viewed ang is kept.
pub const LAST_ANG_KEY: &str = "lastAng";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected status {status} from verse provider")]
    Status { status: u16 },
    #[error("response body could not be decoded: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Source of raw ang payloads. The payload shape is not guaranteed.
#[async_trait]
pub trait AngProvider: Send + Sync {
    async fn fetch_ang(&self, ang: AngNumber) -> Result<Value, ProviderError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage contents are corrupt: {0}")]
    Corrupt(String),
}

/// Durable key/value storage. Callers treat every failure as non-fatal.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Optional per-line enrichment layered on top of a successful render.
pub trait LineEnrichment: Send + Sync {
    fn enrich(&self, ang: AngNumber, lines: &[LineRecord]);
}

/// Replaceable display surface for rendered markup.
pub trait Container: Send + Sync {
    fn replace(&self, markup: String);
    fn current(&self) -> Option<String>;
}
