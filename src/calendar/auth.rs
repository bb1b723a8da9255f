// src/calendar/auth.rs

//! OAuth2 plumbing for the Google Calendar gateway.
//!
//! Token acquisition itself is delegated to `yup-oauth2` (re-exported by
//! `google-calendar3`). This module only decides *how* the installed-app flow
//! is allowed to behave:
//! - `gcalcron authorize` runs the interactive consent flow and persists the
//!   token to `token_path`.
//! - `gcalcron start` must never prompt; if the cached token cannot be used
//!   the flow delegate refuses and startup fails.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use google_calendar3::yup_oauth2::authenticator_delegate::InstalledFlowDelegate;
use google_calendar3::yup_oauth2::{
    self, ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
};
use tracing::info;

use crate::config::{CALENDAR_SCOPE, Settings};
use crate::errors::{GcalcronError, Result};

/// Read the "installed application" client secret JSON.
pub async fn read_client_secret(path: &Path) -> Result<ApplicationSecret> {
    yup_oauth2::read_application_secret(path)
        .await
        .map_err(|e| GcalcronError::AuthError {
            message: format!("cannot read OAuth client secret {:?}", path),
            source: Some(Box::new(e)),
        })
}

/// Fail early with a helpful message when no token was ever stored.
pub fn ensure_token_cached(token_path: &Path) -> Result<()> {
    if token_path.is_file() {
        return Ok(());
    }
    Err(GcalcronError::AuthError {
        message: format!(
            "no stored token at {:?}; run `gcalcron authorize` first",
            token_path
        ),
        source: None,
    })
}

/// Flow delegate used while the service runs: refuses to start a consent
/// flow, turning an unusable cached token into an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractiveDelegate;

impl InstalledFlowDelegate for NonInteractiveDelegate {
    fn present_user_url<'a>(
        &'a self,
        _url: &'a str,
        _need_code: bool,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<String, String>> + Send + 'a>> {
        Box::pin(async {
            Err("stored token is missing or revoked; run `gcalcron authorize`".to_string())
        })
    }
}

/// Run the interactive consent flow and persist the resulting token.
///
/// The consent URL is printed to stdout and the authorization code is read
/// from stdin.
pub async fn authorize(settings: &Settings) -> Result<()> {
    let secret = read_client_secret(settings.credentials_path()).await?;

    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::Interactive)
        .persist_tokens_to_disk(settings.token_path())
        .build()
        .await
        .map_err(|e| GcalcronError::AuthError {
            message: "failed to build authenticator".to_string(),
            source: Some(Box::new(e)),
        })?;

    auth.token(&[CALENDAR_SCOPE])
        .await
        .map_err(|e| GcalcronError::AuthError {
            message: "consent flow did not yield a token".to_string(),
            source: Some(Box::new(e)),
        })?;

    info!(path = %settings.token_path().display(), "token stored");
    println!("Token stored in {}", settings.token_path().display());
    Ok(())
}
