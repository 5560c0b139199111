//! JWT を使った TokenVerifier 実装
//!
//! 外部の認証サービスが発行する HS256 署名付きトークンを検証します。
//! トークンの発行はこのサーバーの責務ではありません（名目上の有効期限
//! 1 時間は発行側の設定で、ここでは `exp` の検証のみ行う）。

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::{TokenError, TokenVerifier, UserId};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject (user id)
    sub: String,
    /// Expiration time (Unix timestamp, seconds)
    exp: u64,
    /// Issued at time (Unix timestamp, seconds)
    iat: u64,
}

/// JWT を使った TokenVerifier 実装
pub struct JwtTokenVerifier {
    /// HS256 の共有シークレット（発行側と同じ値を環境設定で受け取る）
    secret: String,
}

impl JwtTokenVerifier {
    /// 新しい JwtTokenVerifier を作成
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let key = DecodingKey::from_secret(self.secret.as_ref());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &key, &validation)
            .map_err(|e| TokenError::VerificationFailed(e.to_string()))?;

        UserId::new(token_data.claims.sub)
            .map_err(|e| TokenError::VerificationFailed(e.to_string()))
    }
}
