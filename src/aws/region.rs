use std::str::FromStr;

use aws_types::region::Region;
use http::Uri;
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum EndpointError {
    #[snafu(display("Invalid endpoint {:?}: {}", endpoint, source))]
    InvalidUri {
        endpoint: String,
        source: http::uri::InvalidUri,
    },
    #[snafu(display("Endpoint {:?} must be an absolute http or https URL.", endpoint))]
    NotAbsolute { endpoint: String },
}

/// The region of the target service, with an optional endpoint that overrides the one
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOrEndpoint {
    pub region: String,
    pub endpoint: Option<String>,
}

impl RegionOrEndpoint {
    pub fn with_both(region: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Returns the validated endpoint override, if any.
    pub fn endpoint(&self) -> Result<Option<String>, EndpointError> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(None);
        };

        let uri = Uri::from_str(endpoint).context(InvalidUriSnafu { endpoint })?;
        match uri.scheme_str() {
            Some("http") | Some("https") if uri.authority().is_some() => Ok(Some(endpoint.clone())),
            _ => Err(EndpointError::NotAbsolute {
                endpoint: endpoint.clone(),
            }),
        }
    }

    pub fn region(&self) -> Region {
        Region::new(self.region.clone())
    }
}
