use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SpaghettiError {
    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("could not parse settings: {0}")]
    SettingsJson(#[from] serde_json::Error),

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("audio output failed: {0}")]
    Audio(String),
}

impl SpaghettiError {
    pub(crate) fn dom(err: JsValue) -> Self {
        SpaghettiError::Dom(describe_js(&err))
    }

    pub(crate) fn audio(err: JsValue) -> Self {
        SpaghettiError::Audio(describe_js(&err))
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SpaghettiError::InvalidSetting { name, reason: reason.into() }
    }
}

fn describe_js(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

impl From<SpaghettiError> for JsValue {
    fn from(err: SpaghettiError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = SpaghettiError> = std::result::Result<T, E>;
