//! TokenVerifier trait 定義
//!
//! 接続時に提示される署名付きクレデンシャルの検証インターフェース。
//! 具体的な実装（JWT）は Infrastructure 層が提供します（依存性の逆転）。

use thiserror::Error;

use super::value_object::UserId;

/// Errors surfaced while verifying a signed credential
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be verified (bad signature, expired, malformed)
    #[error("token verification failed: {0}")]
    VerificationFailed(String),
}

/// TokenVerifier trait
///
/// Verifies a bearer token and yields the authenticated subject id.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    /// Verify the token and return the subject's user id
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
