use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of roles. Any other value in a token is rejected at the
/// deserialization boundary as `MalformedClaims`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Authenticated identity derived from a verified token.
///
/// Lives only for the duration of one request; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub role: Role,
}

/// Token verification failures. All are terminal for the current request
/// and map to an unauthenticated (401) response at the route layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token claims are missing or malformed")]
    MalformedClaims,
}

/// JWT claims carried by access tokens.
///
/// `sub` holds the user id rendered as a decimal string, which keeps the
/// token consumable by any standard JWT library.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Stateless verifier for bearer tokens, built once at startup from the
/// process-wide signing secret. Verification is a pure function of the
/// token, the clock, and the secret - no I/O, no shared mutable state.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl TokenVerifier {
    pub fn new(secret: &str, expiry_minutes: i64) -> Self {
        let mut validation = Validation::default();
        // Expiry is the only termination mechanism for tokens; no leeway.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry: Duration::minutes(expiry_minutes),
        }
    }

    /// Decode and validate a raw bearer token, producing the caller's
    /// identity or a terminal rejection.
    ///
    /// Malformed input, tampering, and wrong-secret tokens all surface
    /// uniformly as `InvalidSignature`; a verified signature whose expiry
    /// instant is at or before the current time is `Expired`; verified
    /// tokens whose claims are missing or ill-typed (unknown role,
    /// non-numeric or non-positive user id) are `MalformedClaims`.
    pub fn verify(&self, raw: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(raw, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::Json(_) => AuthError::MalformedClaims,
                ErrorKind::MissingRequiredClaim(_) => AuthError::MalformedClaims,
                _ => AuthError::InvalidSignature,
            }
        })?;

        // jsonwebtoken only rejects exp strictly in the past; a token
        // evaluated at exactly its expiry instant is already dead.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        let user_id: i32 = data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::MalformedClaims)?;

        if user_id <= 0 {
            return Err(AuthError::MalformedClaims);
        }

        Ok(Identity {
            user_id,
            role: data.claims.role,
        })
    }

    /// Mint a signed access token for a freshly authenticated user.
    pub fn issue(&self, user_id: i32, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    #[cfg(test)]
    fn issue_with_expiry(
        &self,
        user_id: i32,
        role: Role,
        exp: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp,
            iat: Utc::now().timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }
}
