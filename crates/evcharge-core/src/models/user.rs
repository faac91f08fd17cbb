//! Logged-in user and station operator records.

use serde::{Deserialize, Serialize};

use crate::token::TokenClaims;

/// The two end-user roles plus back-office staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    EvOwner,
    StationOperator,
    Backoffice,
}

super::text_enum!(Role, "role" {
    EvOwner => "EVOwner" | "owner",
    StationOperator => "StationOperator" | "operator",
    Backoffice => "Backoffice" | "admin",
});

/// Profile as returned by `GET /auth/profile`.
///
/// Every field is optional so that a partial profile can still be merged
/// with the token claims.
///
/// Aliases: `userId` | `nic` | `id`, `fullName` | `name`, `isActive` | `active`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "nic", alias = "id")]
    pub user_id: Option<String>,
    #[serde(default, alias = "name")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub station_location: Option<String>,
    #[serde(default, alias = "active")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// The current user as held in the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub station_id: Option<String>,
    pub station_name: Option<String>,
    pub station_location: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl User {
    /// Combine decoded token claims with an optional profile fetch.
    ///
    /// Profile values win over claims. `fallback_email` is the address the
    /// user typed at login and is used when neither source carries one.
    /// Without a role anywhere the user is treated as an EV owner.
    pub fn from_login(
        claims: &TokenClaims,
        profile: Option<UserProfile>,
        fallback_email: &str,
    ) -> Self {
        let profile = profile.unwrap_or_default();
        Self {
            user_id: profile.user_id.unwrap_or_else(|| claims.user_id.clone()),
            full_name: profile
                .full_name
                .or_else(|| claims.full_name.clone())
                .unwrap_or_default(),
            email: profile
                .email
                .or_else(|| claims.email.clone())
                .unwrap_or_else(|| fallback_email.to_owned()),
            role: profile.role.or(claims.role).unwrap_or(Role::EvOwner),
            station_id: profile.station_id,
            station_name: profile.station_name,
            station_location: profile.station_location,
            is_active: profile.is_active.unwrap_or(true),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.role == Role::StationOperator
    }
}

/// Station assignment of a logged-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub operator_id: String,
    pub full_name: String,
    pub email: String,
    pub station_id: String,
    pub station_name: Option<String>,
    pub station_location: Option<String>,
}

impl Operator {
    /// The operator record for `user`, if it is an operator with a station.
    pub fn from_user(user: &User) -> Option<Self> {
        if !user.is_operator() {
            return None;
        }
        Some(Self {
            operator_id: user.user_id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            station_id: user.station_id.clone()?,
            station_name: user.station_name.clone(),
            station_location: user.station_location.clone(),
        })
    }
}
