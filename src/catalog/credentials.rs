//! Credential loading for signed calls

use aws_config::Region;
use aws_config::default_provider::credentials::DefaultCredentialsChain;
use aws_credential_types::provider::ProvideCredentials;

use crate::config::{CredentialSource, Credentials};
use crate::error::{Error, Result};

/// Load the credentials `source` points at
///
/// The default chain is built for `region` so that role-based providers
/// (web identity, SSO) talk to the right regional STS endpoint.
pub async fn load_credentials(source: &CredentialSource, region: &str) -> Result<Credentials> {
    match source {
        CredentialSource::Static(credentials) => Ok(credentials.clone()),
        CredentialSource::Disabled => Err(Error::Credentials(
            "credential loading is disabled".to_string(),
        )),
        CredentialSource::DefaultChain => {
            let chain = DefaultCredentialsChain::builder()
                .region(Region::new(region.to_string()))
                .build()
                .await;
            let loaded = chain
                .provide_credentials()
                .await
                .map_err(|e| Error::Credentials(e.to_string()))?;
            tracing::debug!(
                access_key_id = loaded.access_key_id(),
                temporary = loaded.session_token().is_some(),
                "loaded credentials from the default provider chain"
            );
            Ok(Credentials {
                access_key_id: loaded.access_key_id().to_string(),
                secret_access_key: loaded.secret_access_key().to_string(),
                session_token: loaded.session_token().map(String::from),
            })
        }
    }
}
