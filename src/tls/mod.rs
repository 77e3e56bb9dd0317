use hyper::client::HttpConnector;
use hyper_openssl::HttpsConnector;
use openssl::error::ErrorStack;
use snafu::{ResultExt, Snafu};

mod settings;

pub use self::settings::TlsSettings;

pub type Result<T> = std::result::Result<T, TlsError>;

#[derive(Debug, Snafu)]
pub enum TlsError {
    #[snafu(display("Could not build TLS connector: {}", source))]
    TlsBuildConnector { source: ErrorStack },
    #[snafu(display("Failed to build HTTPS connector: {}", source))]
    MakeHttpsConnector { source: ErrorStack },
}

/// Builds a connector that speaks plain HTTP or HTTPS depending on the request URI.
pub fn build_https_connector(settings: &TlsSettings) -> Result<HttpsConnector<HttpConnector>> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let tls = settings.connector_builder()?;
    let mut https = HttpsConnector::with_connector(http, tls).context(MakeHttpsConnectorSnafu)?;

    let settings = settings.clone();
    https.set_callback(move |c, _uri| {
        settings.apply_connect_configuration(c);
        Ok(())
    });

    Ok(https)
}
