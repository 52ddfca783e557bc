//! Session-stored data.
//!
//! The visitor's session is the storefront's durable client storage: it
//! survives reloads, is scoped to one browser through the session cookie, and
//! holds whole-value snapshots under fixed keys.

/// Session keys.
pub mod session_keys {
    /// Key holding the serialized cart (a JSON array of cart lines, as a string).
    pub const CART: &str = "cart";

    /// Key for a one-shot confirmation notice shown on the next page render.
    pub const FLASH_NOTICE: &str = "flash_notice";
}
