//! Mock configuration: the statically enumerated option record.
//!
//! Options are merged from partial patches; external JSON input passes
//! through a validating boundary that rejects unknown keys.

use crate::error::MockError;
use crate::types::request::HttpRequest;
use crate::types::response::ResponseInfo;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Debug hook signature: `(request, response_info, decoded_response_body)`.
pub type DebugFn = dyn Fn(&HttpRequest, &ResponseInfo, &Value);

/// Debug behavior for a mock.
#[derive(Clone, Default)]
pub enum DebugMode {
    /// No debug output
    #[default]
    Off,
    /// Emit a `tracing` debug event per response
    Log,
    /// Invoke a caller-supplied hook per response
    Hook(Rc<DebugFn>),
}

impl fmt::Debug for DebugMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugMode::Off => f.write_str("Off"),
            DebugMode::Log => f.write_str("Log"),
            DebugMode::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

/// Resolved options for one mock instance.
///
/// Label fields set to `None` disable the corresponding behavior (the
/// original wire format expressed this as `false`).
#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    pub debug: DebugMode,
    /// Nest the `{code, message}` descriptor under this key
    pub http_response_info_label: Option<String>,
    /// Wrap list payloads under this key
    pub collection_label: Option<String>,
    /// Wrap single-item payloads under this key
    pub singleton_label: Option<String>,
    /// Query parameter holding the pagination offset
    pub skip_argument_name: Option<String>,
    /// Query parameter holding the pagination limit
    pub limit_argument_name: Option<String>,
}

impl MockOptions {
    /// Merge a partial patch; omitted fields are left unchanged.
    pub fn apply(&mut self, patch: OptionsPatch) {
        if let Some(debug) = patch.debug {
            self.debug = if debug { DebugMode::Log } else { DebugMode::Off };
        }
        apply_setting(&mut self.http_response_info_label, patch.http_response_info_label);
        apply_setting(&mut self.collection_label, patch.collection_label);
        apply_setting(&mut self.singleton_label, patch.singleton_label);
        apply_setting(&mut self.skip_argument_name, patch.skip_argument_name);
        apply_setting(&mut self.limit_argument_name, patch.limit_argument_name);
    }
}

fn apply_setting(field: &mut Option<String>, setting: Option<LabelSetting>) {
    match setting {
        Some(LabelSetting::Off) => *field = None,
        Some(LabelSetting::Name(name)) => *field = Some(name),
        None => {}
    }
}

/// One option value that is either disabled (`false` on the wire) or a name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LabelRepr")]
pub enum LabelSetting {
    Off,
    Name(String),
}

impl From<&str> for LabelSetting {
    fn from(name: &str) -> Self {
        LabelSetting::Name(name.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelRepr {
    Flag(bool),
    Name(String),
}

impl TryFrom<LabelRepr> for LabelSetting {
    type Error = String;

    fn try_from(repr: LabelRepr) -> Result<Self, Self::Error> {
        match repr {
            LabelRepr::Flag(false) => Ok(LabelSetting::Off),
            LabelRepr::Flag(true) => Err("expected false or a string".to_string()),
            LabelRepr::Name(name) => Ok(LabelSetting::Name(name)),
        }
    }
}

/// Partial options as accepted by `set_options`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct OptionsPatch {
    pub debug: Option<bool>,
    pub http_response_info_label: Option<LabelSetting>,
    pub collection_label: Option<LabelSetting>,
    pub singleton_label: Option<LabelSetting>,
    pub skip_argument_name: Option<LabelSetting>,
    pub limit_argument_name: Option<LabelSetting>,
}

/// Keys accepted on the wire, matching the original option names.
const KNOWN_OPTION_KEYS: &[&str] = &[
    "debug",
    "httpResponseInfoLabel",
    "collectionLabel",
    "singletonLabel",
    "skipArgumentName",
    "limitArgumentName",
];

impl OptionsPatch {
    /// Validate and decode a patch from external JSON input.
    ///
    /// Unknown keys are rejected up front so the offending key can be named
    /// in the error.
    pub fn from_value(value: &Value) -> Result<Self, MockError> {
        let Some(obj) = value.as_object() else {
            return Err(MockError::InvalidOptionValue {
                reason: "expected a JSON object".to_string(),
            });
        };
        for key in obj.keys() {
            if !KNOWN_OPTION_KEYS.contains(&key.as_str()) {
                return Err(MockError::UnknownOption { key: key.clone() });
            }
        }
        serde_json::from_value(value.clone()).map_err(|e| MockError::InvalidOptionValue {
            reason: e.to_string(),
        })
    }
}
