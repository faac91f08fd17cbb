//! Domain models shared by the client and CLI.
//!
//! Every server payload is decoded through exactly one serde schema per
//! type. Field aliases are listed on each type; a payload that carries two
//! aliases of the same field is rejected as malformed. Closed-set enums are
//! matched case-insensitively with `_`, `-` and spaces ignored, and also
//! accept their declaration-order ordinal.

/// Lowercase and drop separators so `Out_Of-Order` matches `outoforder`.
pub(crate) fn fold_enum_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Implements `as_str`, `Display`, `FromStr` and tolerant serde for a
/// closed-set enum.
///
/// `canonical` is the wire spelling used when serializing; `aliases` are the
/// extra folded spellings accepted when parsing.
macro_rules! text_enum {
    (
        $name:ident, $what:literal {
            $($variant:ident => $canonical:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(raw: &str) -> ::std::result::Result<Self, Self::Err> {
                let folded = $crate::models::fold_enum_text(raw);
                $(
                    if folded == $crate::models::fold_enum_text($canonical)
                        $(|| folded == $alias)*
                    {
                        return Ok(Self::$variant);
                    }
                )+
                Err($crate::error::Error::Payload(format!(
                    concat!("unknown ", $what, " '{}'"),
                    raw
                )))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                use ::serde::de::Error as _;
                match ::serde_json::Value::deserialize(deserializer)? {
                    ::serde_json::Value::String(s) => s.parse().map_err(D::Error::custom),
                    ::serde_json::Value::Number(n) => n
                        .as_u64()
                        .and_then(|i| usize::try_from(i).ok())
                        .and_then(|i| Self::ALL.get(i).copied())
                        .ok_or_else(|| {
                            D::Error::custom(format!(concat!("unknown ", $what, " ordinal {}"), n))
                        }),
                    other => Err(D::Error::custom(format!(
                        concat!("expected ", $what, " string, got {}"),
                        other
                    ))),
                }
            }
        }
    };
}

pub(crate) use text_enum;

mod auth;
mod booking;
mod notification;
mod slot;
mod station;
mod user;

pub use auth::{LoginPayload, LoginRequest, RegisterRequest};
pub use booking::{BookingItem, BookingRequest, BookingStatus, QrPayload};
pub use notification::Notification;
pub use slot::{Slot, SlotStatus, SlotStatusUpdate};
pub use station::{Station, StationLocation};
pub use user::{Operator, Role, User, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_separators_and_case() {
        assert_eq!(fold_enum_text("Out_Of-Order"), "outoforder");
        assert_eq!(fold_enum_text("EV Owner"), "evowner");
    }
}
