//! Delivery of the rendered message to a chat platform.
//!
//! Only Telegram's Bot API (`sendMessage`) is implemented. A delivery
//! failure is the one error that makes a run unsuccessful.

pub mod telegram;

use thiserror::Error;

pub use telegram::TelegramNotifier;

/// Why a message could not be delivered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never produced a response (connect, DNS, TLS, timeout).
    #[error("delivery request failed: {0}")]
    Transport(String),

    /// Non-2xx answer from the platform.
    #[error("delivery failed with HTTP {status}: {description}")]
    HttpStatus { status: u16, description: String },

    /// 2xx answer whose body reports `ok: false`.
    #[error("delivery rejected: {0}")]
    Rejected(String),

    /// 2xx answer that is not the platform's JSON envelope.
    #[error("unexpected delivery response: {0}")]
    InvalidResponse(String),
}
