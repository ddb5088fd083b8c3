//! Serde helpers for values SurrealDB may hand back as NONE/null

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default for flags that start enabled
pub fn default_true() -> bool {
    true
}

/// Deserialize bool that treats null as true
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(true))
}

/// Deserialize a list that treats null as empty
pub fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decimal carried as a float, the shape SurrealDB stores numbers in
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct FloatDecimal(#[serde(with = "rust_decimal::serde::float")] Decimal);

/// Optional decimal stored as a float; NONE/null reads back as `None`
pub mod float_option {
    use super::*;

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(FloatDecimal).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FloatDecimal>::deserialize(deserializer).map(|opt| opt.map(|FloatDecimal(d)| d))
    }
}

/// Patch field for an optional decimal: absent leaves the value alone,
/// null clears it. Pair with `default` and `skip_serializing_if = "Option::is_none"`.
pub mod float_patch {
    use super::*;

    pub fn serialize<S>(value: &Option<Option<Decimal>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => float_option::serialize(inner, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        float_option::deserialize(deserializer).map(Some)
    }
}

/// Patch field for any optional value: absent leaves it alone, null clears it
pub fn patch<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
