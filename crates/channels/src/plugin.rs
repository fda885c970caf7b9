use async_trait::async_trait;

use crate::{
    error::Result,
    event::{FileRef, OutboundAction},
};

/// Deliver outbound actions to a chat.
#[async_trait]
pub trait ChatOutbound: Send + Sync {
    async fn send(&self, action: &OutboundAction) -> Result<()>;
}

/// Resolve a platform file reference into its bytes.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, file: &FileRef) -> Result<Vec<u8>>;
}
