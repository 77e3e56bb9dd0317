use std::time::Duration;

use aws_config::{default_provider::credentials::DefaultCredentialsChain, provider_config::ProviderConfig};
use aws_credential_types::{Credentials, provider::SharedCredentialsProvider};
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use aws_types::region::Region;
use serde::{Deserialize, Serialize};

use crate::sensitive_string::SensitiveString;

// matches default load timeout from the SDK as of 0.10.1, but lets us confidently document the
// default rather than relying on the SDK default to not change
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration of the authentication strategy for interacting with AWS services.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, untagged)]
pub enum AwsAuthentication {
    /// Authenticate using a fixed access key and secret pair.
    AccessKey {
        /// The AWS access key ID.
        access_key_id: SensitiveString,

        /// The AWS secret access key.
        secret_access_key: SensitiveString,
    },

    /// Default authentication strategy which tries a variety of substrategies in a one-after-the-other fashion.
    Default {
        /// Timeout for successfully loading any credentials, in seconds.
        #[serde(default)]
        load_timeout_secs: Option<u64>,
    },
}

impl Default for AwsAuthentication {
    fn default() -> Self {
        Self::Default {
            load_timeout_secs: None,
        }
    }
}

impl AwsAuthentication {
    pub async fn credentials_provider(
        &self,
        service_region: Region,
        http_client: SharedHttpClient,
    ) -> crate::Result<SharedCredentialsProvider> {
        match self {
            Self::AccessKey {
                access_key_id,
                secret_access_key,
            } => Ok(SharedCredentialsProvider::new(Credentials::from_keys(
                access_key_id.inner(),
                secret_access_key.inner(),
                None,
            ))),
            Self::Default { .. } => Ok(SharedCredentialsProvider::new(
                default_credentials_provider(service_region, http_client).await,
            )),
        }
    }

    /// How long the SDK may spend resolving credentials before a request fails.
    pub fn load_timeout(&self) -> Duration {
        match self {
            Self::Default {
                load_timeout_secs: Some(secs),
            } => Duration::from_secs(*secs),
            _ => DEFAULT_LOAD_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn test_auth() -> AwsAuthentication {
        AwsAuthentication::AccessKey {
            access_key_id: "dummy".into(),
            secret_access_key: "dummy".into(),
        }
    }
}

async fn default_credentials_provider(
    region: Region,
    http_client: SharedHttpClient,
) -> DefaultCredentialsChain {
    let provider_config = ProviderConfig::without_region()
        .with_region(Some(region.clone()))
        .with_http_client(http_client);

    DefaultCredentialsChain::builder()
        .configure(provider_config)
        .region(region)
        .build()
        .await
}
