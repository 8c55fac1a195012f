//! Newtype IDs for type-safe entity references.
//!
//! Every id in Baby Sneakers is an opaque string: the API assigns UUIDs, and
//! the storefront synthesizes time-based ids for records created while the
//! API is unreachable. Cart lines and catalog entries share the same
//! [`ProductId`] type so the two can never disagree on representation.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use baby_sneakers_core::define_id;
/// define_id!(ProductId);
/// define_id!(ContactId);
///
/// let product_id = ProductId::new("abc");
/// let contact_id = ContactId::new("abc");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = contact_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(ProductId);
define_id!(ContactId);

impl ProductId {
    /// Prefix marking ids synthesized by the storefront while offline.
    pub const LOCAL_PREFIX: &'static str = "local-";

    /// Build a time-based local id from a millisecond timestamp.
    #[must_use]
    pub fn local(timestamp_millis: i64) -> Self {
        Self(format!("{}{timestamp_millis}", Self::LOCAL_PREFIX))
    }

    /// Whether this id was synthesized locally rather than assigned by the API.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0.starts_with(Self::LOCAL_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_transparently() {
        let id = ProductId::new("64f0c2");
        assert_eq!(serde_json::to_string(&id).unwrap_or_default(), "\"64f0c2\"");
    }

    #[test]
    fn test_local_ids() {
        let id = ProductId::local(1_700_000_000_000);
        assert_eq!(id.as_str(), "local-1700000000000");
        assert!(id.is_local());
        assert!(!ProductId::new("3f1e9a").is_local());
    }

    #[test]
    fn test_display_and_conversions() {
        let id = ContactId::from("abc");
        assert_eq!(id.to_string(), "abc");
        let raw: String = id.into();
        assert_eq!(raw, "abc");
    }
}
