use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur while decoding Snowflake IDs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SerdeError {
    /// The decoded value sets the reserved sign bit and can never have been
    /// issued by this scheme.
    #[error("decoded snowflake id {raw} sets the reserved bit")]
    DecodeOverflow {
        /// The raw decoded value that failed validation.
        raw: u64,
    },
}

/// Serialize/deserialize a [`SnowflakeId`] as its native `u64`.
///
/// Use for binary formats and storage layers that keep 64-bit integers
/// intact. For JSON consumed by JavaScript, prefer [`as_string`]: the packed
/// value exceeds `Number.MAX_SAFE_INTEGER` and loses precision as a JSON
/// number.
///
/// [`SnowflakeId`]: crate::SnowflakeId
/// [`as_string`]: crate::as_string
pub mod as_native {
    use super::{Deserialize, Deserializer, SerdeError, Serialize, Serializer};
    use crate::SnowflakeId;

    /// Serialize a Snowflake ID as its raw integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a Snowflake ID from its raw integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value sets the reserved sign bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        let id = SnowflakeId::from_raw(raw);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(SerdeError::DecodeOverflow {
                raw,
            }));
        }
        Ok(id)
    }
}

/// Serialize/deserialize a [`SnowflakeId`] as a decimal string.
///
/// The precision-safe interchange form: a JavaScript consumer can feed the
/// string straight to `BigInt` without rounding through a double.
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub mod as_string {
    use super::{Deserializer, SerdeError, Serializer};
    use crate::SnowflakeId;

    /// Serialize a Snowflake ID as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize a Snowflake ID from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a base-10 `u64`
    /// - The value sets the reserved sign bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal string encoding a 64-bit snowflake id")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let raw: u64 = v
                    .parse()
                    .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &self))?;
                let id = SnowflakeId::from_raw(raw);
                if !id.is_valid() {
                    return Err(E::custom(SerdeError::DecodeOverflow { raw }));
                }
                Ok(id)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}
