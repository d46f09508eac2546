//! Domain failure taxonomy.
//!
//! Every variant is recoverable: callers branch on it and report to the
//! user. Fallible seams return `anyhow::Result`; these variants travel
//! inside it and are recovered by downcast where the caller needs to
//! distinguish the cause.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Registration with an email that already has an account.
    #[error("email is already registered")]
    DuplicateEmail,

    /// An operation named a user id with no matching record.
    #[error("user {0} does not exist")]
    UserNotFound(i64),

    /// The uploaded bytes could not be decoded as an image.
    #[error("unsupported or unreadable image: {0}")]
    UnsupportedImage(String),
}
