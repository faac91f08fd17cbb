//! Bearer token claim decoding.
//!
//! The backend issues JWTs. The client never verifies the signature; it only
//! reads the payload segment to learn who logged in before the profile fetch
//! completes. Claim names differ between issuers, so each value is looked up
//! through an ordered list of accepted keys.

use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::Role;

/// Accepted claim keys for the user identifier, in lookup order.
pub const USER_ID_CLAIMS: &[&str] = &["sub", "nameid", "userId", "nic"];

/// Accepted claim keys for the email address, in lookup order.
pub const EMAIL_CLAIMS: &[&str] = &["email", "unique_name"];

/// Accepted claim keys for the role, in lookup order.
pub const ROLE_CLAIMS: &[&str] = &[
    "role",
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
];

/// Accepted claim keys for the display name, in lookup order.
pub const NAME_CLAIMS: &[&str] = &["name", "fullName", "given_name"];

/// Identity carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub full_name: Option<String>,
    /// Expiry (seconds since epoch). Informational only.
    pub expires_at: Option<i64>,
}

impl TokenClaims {
    /// Read the claims of a JWT without checking its signature or expiry.
    pub fn decode(token: &str) -> Result<Self> {
        let header =
            jsonwebtoken::decode_header(token).map_err(|e| Error::Token(e.to_string()))?;
        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .map_err(|e| Error::Token(e.to_string()))?;

        Self::from_map(&data.claims)
    }

    /// Build claims from an already-decoded payload object.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let user_id = first_string(map, USER_ID_CLAIMS)
            .ok_or_else(|| Error::Token("no user id claim".into()))?;

        let role = match first_string(map, ROLE_CLAIMS) {
            Some(raw) => Some(raw.parse::<Role>()?),
            None => None,
        };

        Ok(Self {
            user_id,
            email: first_string(map, EMAIL_CLAIMS),
            role,
            full_name: first_string(map, NAME_CLAIMS),
            expires_at: map.get("exp").and_then(Value::as_i64),
        })
    }
}

/// First non-empty string found under any of `keys`.
///
/// Array-valued claims (multiple roles) yield their first element.
fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.first()?.as_str().map(str::to_owned),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
