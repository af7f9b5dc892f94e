use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::app_error::AppResult;

const FLASH_KEY: &str = "flashes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FlashLevel {
    Message,
    Success,
    Error,
}

/// A one-shot notice carried in the session until the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Flash {
    pub(crate) message: String,
    pub(crate) level: FlashLevel,
}

pub(crate) async fn push_flash(session: &Session, message: impl Into<String>) -> AppResult<()> {
    push_flash_with_level(session, message, FlashLevel::Message).await
}

pub(crate) async fn push_flash_with_level(
    session: &Session,
    message: impl Into<String>,
    level: FlashLevel,
) -> AppResult<()> {
    let mut flashes: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    flashes.push(Flash {
        message: message.into(),
        level,
    });
    session.insert(FLASH_KEY, flashes).await?;
    Ok(())
}

/// Drains the queued notices; each is delivered exactly once.
pub(crate) async fn take_flashes(session: &Session) -> AppResult<Vec<Flash>> {
    Ok(session.remove(FLASH_KEY).await?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, Session};

    use super::{FlashLevel, push_flash, push_flash_with_level, take_flashes};

    #[tokio::test]
    async fn flashes_are_delivered_once_in_order() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push_flash(&session, "hello").await.expect("push");
        push_flash_with_level(&session, "sent", FlashLevel::Success)
            .await
            .expect("push");

        let flashes = take_flashes(&session).await.expect("take");
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].message, "hello");
        assert_eq!(flashes[0].level, FlashLevel::Message);
        assert_eq!(flashes[1].message, "sent");
        assert_eq!(flashes[1].level, FlashLevel::Success);

        assert!(take_flashes(&session).await.expect("take").is_empty());
    }
}
