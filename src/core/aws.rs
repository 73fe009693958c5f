//! Shared AWS SDK setup and error formatting.

use aws_config::{Region, SdkConfig};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use super::config::AppConfig;

/// Loads the SDK config for the configured region. Static credentials are used
/// when both keys are configured, otherwise the default provider chain applies.
pub async fn load_sdk_config(config: &AppConfig) -> SdkConfig {
    let mut loader = aws_config::from_env().region(Region::new(config.aws_region.clone()));

    if let Some(credentials) = static_credentials(config) {
        loader = loader.credentials_provider(credentials);
    }

    loader.load().await
}

/// Credentials from the configured key pair, carrying the session token when
/// the keys are temporary (as on Lambda).
#[must_use]
pub fn static_credentials(config: &AppConfig) -> Option<Credentials> {
    let access_key = config.aws_access_key_id.as_deref()?;
    let secret_key = config.aws_secret_access_key.as_deref()?;

    Some(Credentials::new(
        access_key,
        secret_key,
        config.aws_session_token.clone(),
        None,
        "docsum-config",
    ))
}

/// Short description of an SDK failure: the service error code and message when
/// present, otherwise the full error chain.
pub fn describe_sdk_error<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        AppConfig::from_lookup(|name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_static_credentials_keep_session_token() {
        let config = config(&[
            ("S3_BUCKET", "docs"),
            ("AWS_ACCESS_KEY_ID", "ASIAEXAMPLE"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_SESSION_TOKEN", "sts-session-token"),
        ]);

        let credentials = static_credentials(&config).unwrap();
        assert_eq!(credentials.access_key_id(), "ASIAEXAMPLE");
        assert_eq!(credentials.secret_access_key(), "secret");
        assert_eq!(credentials.session_token(), Some("sts-session-token"));
    }

    #[test]
    fn test_static_credentials_without_token_or_keys() {
        let long_lived = config(&[
            ("S3_BUCKET", "docs"),
            ("AWS_ACCESS_KEY", "AKIAEXAMPLE"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]);
        let credentials = static_credentials(&long_lived).unwrap();
        assert_eq!(credentials.access_key_id(), "AKIAEXAMPLE");
        assert_eq!(credentials.session_token(), None);

        let chain_only = config(&[("S3_BUCKET", "docs"), ("AWS_ACCESS_KEY_ID", "ASIAEXAMPLE")]);
        assert!(static_credentials(&chain_only).is_none());
    }
}
