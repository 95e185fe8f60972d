//! Pass selection.

use crate::transforms::PassKind;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// One independent switch per pass. Every flag defaults to off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    #[serde(deserialize_with = "bool_or_string")]
    pub unpack_arrays: bool,
    #[serde(deserialize_with = "bool_or_string")]
    pub decode_strings: bool,
    #[serde(deserialize_with = "bool_or_string")]
    pub remove_proxy_functions: bool,
    #[serde(deserialize_with = "bool_or_string")]
    pub string_proxy_functions: bool,
    #[serde(deserialize_with = "bool_or_string")]
    pub simplify_expressions: bool,
    #[serde(deserialize_with = "bool_or_string")]
    pub remove_dead_code: bool,
}

impl Configuration {
    pub fn all() -> Self {
        Configuration {
            unpack_arrays: true,
            decode_strings: true,
            remove_proxy_functions: true,
            string_proxy_functions: true,
            simplify_expressions: true,
            remove_dead_code: true,
        }
    }

    pub fn none() -> Self {
        Configuration::default()
    }

    pub fn is_enabled(&self, pass: PassKind) -> bool {
        match pass {
            PassKind::ProxyFunctions => self.remove_proxy_functions,
            PassKind::StringProxyFunctions => self.string_proxy_functions,
            PassKind::DecodeStrings => self.decode_strings,
            PassKind::SimplifyExpressions => self.simplify_expressions,
            PassKind::UnpackArrays => self.unpack_arrays,
            PassKind::RemoveDeadCode => self.remove_dead_code,
        }
    }

    pub fn set(&mut self, pass: PassKind, enabled: bool) {
        let flag = match pass {
            PassKind::ProxyFunctions => &mut self.remove_proxy_functions,
            PassKind::StringProxyFunctions => &mut self.string_proxy_functions,
            PassKind::DecodeStrings => &mut self.decode_strings,
            PassKind::SimplifyExpressions => &mut self.simplify_expressions,
            PassKind::UnpackArrays => &mut self.unpack_arrays,
            PassKind::RemoveDeadCode => &mut self.remove_dead_code,
        };
        *flag = enabled;
    }

    /// Enabled passes in pipeline order.
    pub fn enabled_passes(&self) -> Vec<PassKind> {
        PassKind::PIPELINE_ORDER
            .into_iter()
            .filter(|&pass| self.is_enabled(pass))
            .collect()
    }

    /// Flags set in either configuration.
    pub fn union(self, other: Configuration) -> Configuration {
        let mut merged = self;
        for pass in other.enabled_passes() {
            merged.set(pass, true);
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.enabled_passes().is_empty()
    }
}

/// Accept `true`/`false` as well as `"true"`, `"yes"`, `"1"`, `"on"` and
/// their negations, as host settings often store strings.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" | "" => Ok(false),
            other => Err(de::Error::custom(format!(
                "expected a boolean, found \"{other}\""
            ))),
        },
    }
}
