//! The context record and its patch overlay
//!
//! [`Context`] is the persisted and resolved shape: every field optional.
//! [`ContextPatch`] is the overlay used for merges, explicit overrides and
//! writes. Each of its fields distinguishes "leave alone" from "delete" from
//! "replace", which is what JSON expresses with an absent key, `null` and a
//! value respectively.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// Cloud provider backing an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Mock,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Mock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                format!("must be one of {} (got \"{}\")", allowed.join(", "), s)
            })
    }
}

/// The application commands act on when nothing else names one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveApp {
    pub account: String,
    pub team: String,
    pub moniker: String,
}

impl ActiveApp {
    pub fn new(
        account: impl Into<String>,
        team: impl Into<String>,
        moniker: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            team: team.into(),
            moniker: moniker.into(),
        }
    }
}

impl fmt::Display for ActiveApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.account, self.team, self.moniker)
    }
}

/// One of the fixed context keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Account,
    Team,
    Moniker,
    Provider,
    Region,
    ActiveApp,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Account,
        Field::Team,
        Field::Moniker,
        Field::Provider,
        Field::Region,
        Field::ActiveApp,
    ];

    /// Fields a deployment target needs, in reporting order.
    pub const TARGET: [Field; 5] = [
        Field::Account,
        Field::Team,
        Field::Moniker,
        Field::Provider,
        Field::Region,
    ];

    /// JSON key as stored on disk.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Team => "team",
            Self::Moniker => "moniker",
            Self::Provider => "provider",
            Self::Region => "region",
            Self::ActiveApp => "activeApp",
        }
    }

    /// Environment variable supplying a per-invocation override.
    pub fn env_var(&self) -> String {
        match self {
            Self::ActiveApp => "CTX_ACTIVE_APP".to_string(),
            other => format!("CTX_{}", other.key().to_uppercase()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "account" => Ok(Self::Account),
            "team" => Ok(Self::Team),
            "moniker" => Ok(Self::Moniker),
            "provider" => Ok(Self::Provider),
            "region" => Ok(Self::Region),
            "activeApp" | "active-app" | "active_app" => Ok(Self::ActiveApp),
            _ => Err(format!("unknown context field '{}'", s)),
        }
    }
}

/// Default command parameters, as persisted in a config file or produced by
/// resolution. No field is required here; see [`Context::require_target`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moniker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_app: Option<ActiveApp>,
}

impl Context {
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| !self.is_set(*f))
    }

    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::Account => self.account.is_some(),
            Field::Team => self.team.is_some(),
            Field::Moniker => self.moniker.is_some(),
            Field::Provider => self.provider.is_some(),
            Field::Region => self.region.is_some(),
            Field::ActiveApp => self.active_app.is_some(),
        }
    }

    /// Overlay that sets every field present here and keeps the rest.
    pub fn into_patch(self) -> ContextPatch {
        ContextPatch {
            account: self.account.into(),
            team: self.team.into(),
            moniker: self.moniker.into(),
            provider: self.provider.into(),
            region: self.region.into(),
            active_app: self.active_app.into(),
        }
    }

    /// File representation: 2-space indented JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        Ok(content)
    }

    /// Require every field a deployment needs.
    ///
    /// The error names all missing fields at once.
    pub fn require_target(&self) -> Result<DeployTarget> {
        match (
            &self.account,
            &self.team,
            &self.moniker,
            self.provider,
            &self.region,
        ) {
            (Some(account), Some(team), Some(moniker), Some(provider), Some(region)) => {
                Ok(DeployTarget {
                    account: account.clone(),
                    team: team.clone(),
                    moniker: moniker.clone(),
                    provider,
                    region: region.clone(),
                })
            }
            _ => Err(Error::MissingFields {
                fields: Field::TARGET
                    .into_iter()
                    .filter(|f| !self.is_set(*f))
                    .collect(),
            }),
        }
    }
}

/// A fully resolved context, as consumed by storage, policy and deployment
/// providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployTarget {
    pub account: String,
    pub team: String,
    pub moniker: String,
    pub provider: Provider,
    pub region: String,
}

/// Update to a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the base value untouched (key absent)
    Keep,
    /// Delete the key from the result (`null`)
    Clear,
    /// Replace the base value wholesale
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    /// The variant with the payload dropped.
    pub fn shape(&self) -> Patch<()> {
        match self {
            Self::Keep => Patch::Keep,
            Self::Clear => Patch::Clear,
            Self::Set(_) => Patch::Set(()),
        }
    }
}

impl<T: Clone> Patch<T> {
    /// Apply this update on top of `base`.
    pub fn apply(&self, base: Option<&T>) -> Option<T> {
        match self {
            Self::Keep => base.cloned(),
            Self::Clear => None,
            Self::Set(value) => Some(value.clone()),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Set(v),
            None => Self::Keep,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            // Skipped by the containing struct; only reached when serialized bare
            Self::Keep | Self::Clear => serializer.serialize_none(),
            Self::Set(value) => serializer.serialize_some(value),
        }
    }
}

/// Overlay over a [`Context`]: one [`Patch`] per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPatch {
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub account: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub team: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub moniker: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub provider: Patch<Provider>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub region: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub active_app: Patch<ActiveApp>,
}

impl ContextPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.shape(*f).is_keep())
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Patch::Set(account.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Patch::Set(team.into());
        self
    }

    pub fn with_moniker(mut self, moniker: impl Into<String>) -> Self {
        self.moniker = Patch::Set(moniker.into());
        self
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Patch::Set(provider);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Patch::Set(region.into());
        self
    }

    pub fn with_active_app(mut self, app: ActiveApp) -> Self {
        self.active_app = Patch::Set(app);
        self
    }

    /// Mark `field` for deletion.
    pub fn clear(mut self, field: Field) -> Self {
        match field {
            Field::Account => self.account = Patch::Clear,
            Field::Team => self.team = Patch::Clear,
            Field::Moniker => self.moniker = Patch::Clear,
            Field::Provider => self.provider = Patch::Clear,
            Field::Region => self.region = Patch::Clear,
            Field::ActiveApp => self.active_app = Patch::Clear,
        }
        self
    }

    /// What this patch does to `field`, without the value.
    pub fn shape(&self, field: Field) -> Patch<()> {
        match field {
            Field::Account => self.account.shape(),
            Field::Team => self.team.shape(),
            Field::Moniker => self.moniker.shape(),
            Field::Provider => self.provider.shape(),
            Field::Region => self.region.shape(),
            Field::ActiveApp => self.active_app.shape(),
        }
    }

    /// Context holding only the values this patch sets.
    pub fn into_context(self) -> Context {
        Context {
            account: self.account.apply(None),
            team: self.team.apply(None),
            moniker: self.moniker.apply(None),
            provider: self.provider.apply(None),
            region: self.region.apply(None),
            active_app: self.active_app.apply(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn context_serializes_camel_case_and_skips_unset() {
        let context = Context {
            account: Some("a1".into()),
            provider: Some(Provider::Azure),
            active_app: Some(ActiveApp::new("a1", "t1", "m1")),
            ..Context::default()
        };

        let json = context.to_json_pretty().unwrap();

        assert_eq!(
            json,
            "{\n  \"account\": \"a1\",\n  \"provider\": \"azure\",\n  \"activeApp\": {\n    \"account\": \"a1\",\n    \"team\": \"t1\",\n    \"moniker\": \"m1\"\n  }\n}\n"
        );
    }

    #[test]
    fn patch_serializes_clear_as_null_and_skips_keep() {
        let patch = ContextPatch::new()
            .with_team("t2")
            .clear(Field::Region);

        let value = serde_json::to_value(&patch).unwrap();

        assert_eq!(value, serde_json::json!({"team": "t2", "region": null}));
    }

    #[test]
    fn require_target_lists_all_missing_fields() {
        let context = Context {
            team: Some("t1".into()),
            moniker: Some("m1".into()),
            ..Context::default()
        };

        match context.require_target() {
            Err(Error::MissingFields { fields }) => {
                assert_eq!(fields, vec![Field::Account, Field::Provider, Field::Region])
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn require_target_succeeds_when_complete() {
        let context = Context {
            account: Some("a1".into()),
            team: Some("t1".into()),
            moniker: Some("m1".into()),
            provider: Some(Provider::Aws),
            region: Some("us-east-1".into()),
            active_app: None,
        };

        let target = context.require_target().unwrap();
        assert_eq!(target.provider, Provider::Aws);
        assert_eq!(target.region, "us-east-1");
    }

    #[test]
    fn field_parses_cli_spellings() {
        assert_eq!("active-app".parse::<Field>().unwrap(), Field::ActiveApp);
        assert_eq!("activeApp".parse::<Field>().unwrap(), Field::ActiveApp);
        assert_eq!("region".parse::<Field>().unwrap(), Field::Region);
        assert!("colour".parse::<Field>().is_err());
    }

    #[test]
    fn provider_parse_error_lists_allowed_values() {
        let err = "bogus".parse::<Provider>().unwrap_err();
        assert_eq!(err, "must be one of aws, azure, mock (got \"bogus\")");
    }
}
