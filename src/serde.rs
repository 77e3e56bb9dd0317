use serde::{Deserialize, Deserializer};

pub const fn default_true() -> bool {
    true
}

/// Accepts either a plain boolean or the full settings struct for a configuration section.
///
/// `healthcheck = false` reads the same as `healthcheck.enabled = false`.
pub fn bool_or_struct<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + From<bool>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrStruct<T> {
        Bool(bool),
        Struct(T),
    }

    Ok(match BoolOrStruct::<T>::deserialize(deserializer)? {
        BoolOrStruct::Bool(b) => T::from(b),
        BoolOrStruct::Struct(t) => t,
    })
}
