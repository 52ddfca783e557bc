//! User-visible confirmation notices.
//!
//! HTMX requests get the notice inline in the response fragment. Plain form
//! posts stash it in the session as a one-shot flash that the next full page
//! render takes and displays.

use std::fmt;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// A short confirmation message shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notice(String);

impl Notice {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Confirmation after adding a product.
    #[must_use]
    pub fn added(product_name: &str) -> Self {
        Self(format!("{product_name} has been added to your cart!"))
    }

    /// Confirmation after checkout.
    #[must_use]
    pub fn purchased() -> Self {
        Self::new("Thank you for your purchase!")
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store a notice for the next page render.
pub async fn set_flash(session: &Session, notice: &Notice) {
    if let Err(e) = session.insert(session_keys::FLASH_NOTICE, notice).await {
        tracing::error!("Failed to store flash notice in session: {e}");
    }
}

/// Take (and clear) the pending flash notice, if any.
pub async fn take_flash(session: &Session) -> Option<Notice> {
    match session.remove::<Notice>(session_keys::FLASH_NOTICE).await {
        Ok(notice) => notice,
        Err(e) => {
            tracing::warn!("Discarding unreadable flash notice: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[test]
    fn test_added_names_product() {
        assert_eq!(
            Notice::added("Smart Watch").message(),
            "Smart Watch has been added to your cart!"
        );
    }

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_flash(&session, &Notice::purchased()).await;

        assert_eq!(take_flash(&session).await, Some(Notice::purchased()));
        assert_eq!(take_flash(&session).await, None);
    }
}
