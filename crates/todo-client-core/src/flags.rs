use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Gates the login form and the home-page login shortcut.
pub const FEATURE_LOGIN: &str = "feature-login";

/// Flag name to boolean mapping, fixed for the lifetime of one page session.
/// Unknown names read as disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlagSet {
    flags: BTreeMap<String, bool>,
}

impl FeatureFlagSet {
    #[must_use]
    pub fn new(flags: BTreeMap<String, bool>) -> Self {
        Self { flags }
    }

    /// Builds a set from a decoded response body. Values are coerced with
    /// JSON truthiness; a body that is not an object yields `None`.
    #[must_use]
    pub fn from_json(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let flags = object
            .iter()
            .map(|(name, value)| (name.clone(), json_truthy(value)))
            .collect();
        Some(Self { flags })
    }

    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn login_enabled(&self) -> bool {
        self.is_enabled(FEATURE_LOGIN)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.flags).unwrap_or_else(|_| "{}".to_string())
    }
}

#[async_trait(?Send)]
pub trait FeatureFlagTransport {
    async fn fetch_flags(&self) -> Result<Value, ApiError>;
}

/// Issues the single flag read for this page lifetime. Any failure degrades
/// to an empty set so every flag reads as disabled.
pub async fn load_feature_flags<T>(transport: &T) -> FeatureFlagSet
where
    T: FeatureFlagTransport + ?Sized,
{
    match transport.fetch_flags().await {
        Ok(body) => FeatureFlagSet::from_json(&body).unwrap_or_else(|| {
            tracing::warn!("feature flag body is not an object; all flags disabled");
            FeatureFlagSet::default()
        }),
        Err(error) => {
            tracing::warn!(status = ?error.status, %error, "feature flag load failed; all flags disabled");
            FeatureFlagSet::default()
        }
    }
}

fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticFlags(Result<Value, ApiError>);

    #[async_trait(?Send)]
    impl FeatureFlagTransport for StaticFlags {
        async fn fetch_flags(&self) -> Result<Value, ApiError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn load_keeps_returned_mapping() {
        let transport = StaticFlags(Ok(json!({"feature-login": true, "feature-darkmode": false})));
        let flags = load_feature_flags(&transport).await;

        assert!(flags.login_enabled());
        assert!(!flags.is_enabled("feature-darkmode"));
    }

    #[tokio::test]
    async fn http_failure_falls_back_to_all_disabled() {
        let transport = StaticFlags(Err(ApiError::http(500, "Could not read feature flags")));
        let flags = load_feature_flags(&transport).await;

        assert!(flags.is_empty());
        assert!(!flags.login_enabled());
        assert!(!flags.is_enabled("anything"));
    }

    #[tokio::test]
    async fn network_failure_falls_back_to_all_disabled() {
        let transport = StaticFlags(Err(ApiError::transport("connection refused")));
        assert!(load_feature_flags(&transport).await.is_empty());
    }

    #[tokio::test]
    async fn non_object_body_falls_back_to_all_disabled() {
        let transport = StaticFlags(Ok(json!(["feature-login"])));
        assert!(load_feature_flags(&transport).await.is_empty());
    }

    #[test]
    fn unknown_flag_is_disabled() {
        let flags = FeatureFlagSet::default();
        assert!(!flags.is_enabled(FEATURE_LOGIN));
    }

    #[test]
    fn non_boolean_values_use_truthiness() {
        let flags = FeatureFlagSet::from_json(&json!({
            "a": 1, "b": 0, "c": "on", "d": "", "e": null
        }))
        .expect("object body");

        assert!(flags.is_enabled("a"));
        assert!(!flags.is_enabled("b"));
        assert!(flags.is_enabled("c"));
        assert!(!flags.is_enabled("d"));
        assert!(!flags.is_enabled("e"));
    }
}
