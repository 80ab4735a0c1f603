//! Code for handling IDs
use anyhow::{Context, Result};

macro_rules! define_id_type {
    ($name:ident) => {
        /// An ID type (e.g. `RegionID`, `CarrierID`, etc.)
        #[derive(
            Clone, std::hash::Hash, PartialEq, Eq, serde::Deserialize, Debug, serde::Serialize,
        )]
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }

            /// The ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
pub(crate) use define_id_type;

/// Look up a key in an [`indexmap::IndexMap`], failing with a useful message if absent.
///
/// All table and registry lookups go through this so that a malformed scenario
/// configuration fails fast with the offending key named.
pub fn lookup<'a, K, V>(
    map: &'a indexmap::IndexMap<K, V>,
    key: &str,
    what: &str,
) -> Result<&'a V>
where
    K: std::hash::Hash + Eq + std::borrow::Borrow<str>,
{
    map.get(key).with_context(|| format!("no {what} for {key}"))
}

#[cfg(test)]
define_id_type!(GenericID);
