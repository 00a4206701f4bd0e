//! Token payload. Both halves of a token pair name the session they were
//! issued for, so revoking the session row invalidates them together.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub sid: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

impl Claims {
    pub fn issue(
        user_id: Uuid,
        session_id: Uuid,
        kind: TokenKind,
        now: OffsetDateTime,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: user_id,
            sid: session_id,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            kind,
        }
    }

    /// Refresh tokens are not accepted where access tokens are, and vice versa.
    pub fn expect_kind(self, kind: TokenKind) -> anyhow::Result<Self> {
        anyhow::ensure!(self.kind == kind, "expected {kind:?} token, got {:?}", self.kind);
        Ok(self)
    }
}
