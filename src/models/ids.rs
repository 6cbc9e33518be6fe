//! Newtype wrappers for platform identifiers.
//!
//! These prevent accidentally passing a payment id where a price setting
//! id is expected, at compile time.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapping a `u64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from the given value.
            #[inline]
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the inner value.
            #[inline]
            #[must_use]
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = core::num::ParseIntError;

            #[inline]
            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                raw.trim().parse().map(Self)
            }
        }
    };
}

define_id! {
    /// Identifier of a price setting (the merchant account).
    PriceSettingId
}

define_id! {
    /// Identifier of a payment created on the platform.
    PaymentId
}

define_id! {
    /// Identifier of a payment method offered for a locale.
    PaymentMethodId
}

define_id! {
    /// Identifier of a payalogue (hosted product catalog page).
    PayalogueId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_setting_id_serde_roundtrip() {
        let id = PriceSettingId::new(111_111);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "111111");
        let deserialized: PriceSettingId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(PaymentId::new(999_999_999).to_string(), "999999999");
        assert_eq!(PaymentMethodId::new(2).to_string(), "2");
    }

    #[test]
    fn parses_from_string() {
        let id: PriceSettingId = " 111111 ".parse().unwrap();
        assert_eq!(id, PriceSettingId::new(111_111));
        assert!("abc".parse::<PaymentId>().is_err());
    }

    #[test]
    fn from_inner() {
        let id = PayalogueId::from(222_222_u64);
        assert_eq!(id.into_inner(), 222_222);
    }
}
