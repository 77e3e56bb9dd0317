use openssl::ssl::{ConnectConfiguration, SslConnector, SslConnectorBuilder, SslMethod, SslVerifyMode};
use snafu::ResultExt;

use super::{Result, TlsBuildConnectorSnafu};

/// Directly usable settings for TLS connectors
#[derive(Clone, Debug)]
pub struct TlsSettings {
    verify_certificate: bool,
    verify_hostname: bool,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TlsSettings {
    /// Settings for a client that checks (or, when `verify_peer` is false, skips checking) the
    /// certificate chain and host name of the server it connects to.
    pub fn new(verify_peer: bool) -> Self {
        if !verify_peer {
            warn!("`ssl_verify_peer` is DISABLED, this may lead to security vulnerabilities");
        }

        Self {
            verify_certificate: verify_peer,
            verify_hostname: verify_peer,
        }
    }

    pub const fn verify_certificate(&self) -> bool {
        self.verify_certificate
    }

    pub(super) fn connector_builder(&self) -> Result<SslConnectorBuilder> {
        let mut builder = SslConnector::builder(SslMethod::tls()).context(TlsBuildConnectorSnafu)?;
        builder.set_verify(if self.verify_certificate {
            SslVerifyMode::PEER
        } else {
            SslVerifyMode::NONE
        });
        Ok(builder)
    }

    pub(super) fn apply_connect_configuration(&self, connection: &mut ConnectConfiguration) {
        connection.set_verify_hostname(self.verify_hostname);
    }
}
