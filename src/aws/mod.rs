pub mod auth;
pub mod region;

use aws_config::BehaviorVersion;
use aws_smithy_async::{
    rt::sleep::{SharedAsyncSleep, TokioSleep},
    time::{SharedTimeSource, SystemTimeSource},
};
use aws_smithy_runtime::client::{http::hyper_014::HyperClientBuilder, identity::IdentityCache};
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use aws_smithy_types::retry::RetryConfig;
use aws_types::{SdkConfig, region::Region};

pub use self::auth::AwsAuthentication;
pub use self::region::RegionOrEndpoint;
use crate::tls::{TlsSettings, build_https_connector};

/// Builds a service client from a fully resolved SDK configuration.
pub trait ClientBuilder {
    type Client;

    fn build(config: &SdkConfig) -> Self::Client;
}

/// Builds the HTTP client every AWS call goes through.
pub fn connector(tls_settings: &TlsSettings) -> crate::Result<SharedHttpClient> {
    let https = build_https_connector(tls_settings)?;
    Ok(HyperClientBuilder::new().build(https))
}

/// Combines region, credentials and transport into an SDK configuration.
///
/// Retries inside the SDK are disabled: a failed write is reported to the caller, which decides
/// what happens to the batch.
pub async fn create_sdk_config(
    auth: &AwsAuthentication,
    region: Region,
    endpoint: Option<String>,
    tls_settings: &TlsSettings,
) -> crate::Result<SdkConfig> {
    let http_client = connector(tls_settings)?;

    let mut config_builder = SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .http_client(http_client.clone())
        .credentials_provider(
            auth.credentials_provider(region.clone(), http_client)
                .await?,
        )
        .identity_cache(
            IdentityCache::lazy()
                .load_timeout(auth.load_timeout())
                .build(),
        )
        .region(region)
        .retry_config(RetryConfig::disabled())
        .sleep_impl(SharedAsyncSleep::new(TokioSleep::new()))
        .time_source(SharedTimeSource::new(SystemTimeSource::new()));

    if let Some(endpoint_override) = endpoint {
        config_builder = config_builder.endpoint_url(endpoint_override);
    }

    Ok(config_builder.build())
}

pub async fn create_client<T: ClientBuilder>(
    auth: &AwsAuthentication,
    region: Region,
    endpoint: Option<String>,
    tls_settings: &TlsSettings,
) -> crate::Result<T::Client> {
    let config = create_sdk_config(auth, region, endpoint, tls_settings).await?;
    Ok(T::build(&config))
}
