//! Provider-configuration records.
//!
//! The cluster stores a loosely-typed `spec` object. [`ProviderConfiguration::decode`]
//! is the only place it becomes typed: the credential source is turned into a
//! sum type and unknown sources are rejected here rather than at use time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

pub const SOURCE_SECRET: &str = "Secret";
pub const SOURCE_WEB_IDENTITY: &str = "WebIdentity";
pub const SOURCE_UPBOUND: &str = "Upbound";

/// A decoded provider config: how to obtain credentials and where to send requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfiguration {
    pub endpoint: Option<EndpointOverride>,
    pub credentials: CredentialSpec,
    /// Ordered role hops. Only the first entry is honored.
    pub assume_role_chain: Vec<RoleChainEntry>,
    pub flags: ValidationFlags,
}

impl ProviderConfiguration {
    /// Decode the raw `spec` object of a provider config.
    pub fn decode(raw: &Value) -> Result<Self, DecodeError> {
        if raw.is_null() {
            return Err(DecodeError::MissingSpec);
        }

        let spec = RawSpec::deserialize(raw).map_err(DecodeError::InvalidSpec)?;
        let credentials = spec
            .credentials
            .ok_or(DecodeError::MissingCredentials)?
            .into_spec()?;

        Ok(Self {
            endpoint: spec.endpoint,
            credentials,
            assume_role_chain: spec.assume_role_chain,
            flags: spec.flags,
        })
    }

    /// The chain entry that will actually be assumed, if any.
    pub fn honored_chain_entry(&self) -> Option<&RoleChainEntry> {
        self.assume_role_chain.first()
    }

    /// Chain entries that are declared but not chained.
    pub fn ignored_chain_entries(&self) -> &[RoleChainEntry] {
        self.assume_role_chain.get(1..).unwrap_or_default()
    }

    /// Decode only the assume-role chain and flags of a `spec` object.
    ///
    /// The `credentials` block is not read, so records with any (or no)
    /// credential source decode.
    pub fn decode_chain(raw: &Value) -> Result<AssumeRoleConfiguration, DecodeError> {
        if raw.is_null() {
            return Err(DecodeError::MissingSpec);
        }

        let spec = RawChainSpec::deserialize(raw).map_err(DecodeError::InvalidSpec)?;
        Ok(AssumeRoleConfiguration {
            assume_role_chain: spec.assume_role_chain,
            flags: spec.flags,
        })
    }
}

/// The chain-only view of a provider config used when assuming a role with
/// ambient credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssumeRoleConfiguration {
    pub assume_role_chain: Vec<RoleChainEntry>,
    pub flags: ValidationFlags,
}

/// Where requests for a set of services should be sent instead of the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointOverride {
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub hostname_immutable: bool,
    #[serde(default)]
    pub url: Option<EndpointUrl>,
}

/// The `url` block of an endpoint override, as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointUrl {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub dynamic: String,
    #[serde(rename = "static", default)]
    pub static_url: String,
}

/// The URL an override resolves to, once its type tag has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTarget<'a> {
    Dynamic(&'a str),
    Static(&'a str),
}

impl EndpointUrl {
    /// The effective URL, or `None` when the type is unrecognised or the
    /// matching URL is empty.
    pub fn target(&self) -> Option<UrlTarget<'_>> {
        match self.kind.as_str() {
            "dynamic" if !self.dynamic.is_empty() => Some(UrlTarget::Dynamic(&self.dynamic)),
            "static" if !self.static_url.is_empty() => Some(UrlTarget::Static(&self.static_url)),
            _ => None,
        }
    }
}

impl UrlTarget<'_> {
    pub fn url(&self) -> &str {
        match self {
            UrlTarget::Dynamic(url) | UrlTarget::Static(url) => url,
        }
    }
}

/// The credential strategy of a provider config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSpec {
    /// INI credentials stored in a cluster secret.
    Secret(SecretReference),
    /// Federated token exchanged with STS, optionally followed by an assume-role hop.
    WebIdentity(WebIdentitySpec),
    /// Recognised in the schema but not implemented.
    Upbound,
}

impl CredentialSpec {
    /// The `source` value this variant was decoded from.
    pub fn source(&self) -> &'static str {
        match self {
            CredentialSpec::Secret(_) => SOURCE_SECRET,
            CredentialSpec::WebIdentity(_) => SOURCE_WEB_IDENTITY,
            CredentialSpec::Upbound => SOURCE_UPBOUND,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretReference {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebIdentitySpec {
    #[serde(default)]
    pub role_arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChainEntry {
    #[serde(rename = "roleARN", default)]
    pub role_arn: String,
}

impl RoleChainEntry {
    pub fn new(role_arn: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
        }
    }
}

/// Validation-skip flags. Not interpreted here; passed through to the
/// assembled client configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFlags {
    #[serde(default)]
    pub s3_use_path_style: bool,
    #[serde(default)]
    pub skip_credentials_validation: bool,
    #[serde(default)]
    pub skip_region_validation: bool,
    #[serde(default)]
    pub skip_requesting_account_id: bool,
    #[serde(default)]
    pub skip_metadata_api_check: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpec {
    #[serde(default)]
    endpoint: Option<EndpointOverride>,
    #[serde(default)]
    credentials: Option<RawCredentials>,
    #[serde(default)]
    assume_role_chain: Vec<RoleChainEntry>,
    #[serde(flatten)]
    flags: ValidationFlags,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChainSpec {
    #[serde(default)]
    assume_role_chain: Vec<RoleChainEntry>,
    #[serde(flatten)]
    flags: ValidationFlags,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredentials {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    secret_ref: Option<SecretReference>,
    #[serde(default)]
    web_identity: Option<WebIdentitySpec>,
}

impl RawCredentials {
    fn into_spec(self) -> Result<CredentialSpec, DecodeError> {
        match self.source.as_deref() {
            Some(SOURCE_SECRET) => {
                let secret_ref = self.secret_ref.unwrap_or_default();
                if secret_ref.name.is_empty() {
                    return Err(DecodeError::MissingField("credentials.secretRef.name"));
                }
                if secret_ref.namespace.is_empty() {
                    return Err(DecodeError::MissingField("credentials.secretRef.namespace"));
                }
                if secret_ref.key.is_empty() {
                    return Err(DecodeError::MissingField("credentials.secretRef.key"));
                }
                Ok(CredentialSpec::Secret(secret_ref))
            }
            Some(SOURCE_WEB_IDENTITY) => Ok(CredentialSpec::WebIdentity(
                self.web_identity.unwrap_or_default(),
            )),
            Some(SOURCE_UPBOUND) => Ok(CredentialSpec::Upbound),
            Some(other) => Err(DecodeError::UnsupportedSource(other.to_string())),
            None => Err(DecodeError::UnsupportedSource(String::new())),
        }
    }
}
