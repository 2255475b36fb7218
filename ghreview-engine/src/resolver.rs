//! Identity resolution
//!
//! Turns a username-or-email hint into the platform's account record.

use std::sync::Arc;

use ghreview_core::domain::assessment::UserIdentity;
use tracing::{debug, info, instrument, warn};

use crate::error::{EngineError, Result};
use crate::platform::SourcePlatform;

/// Resolves identity hints against a source platform
pub struct IdentityResolver {
    platform: Arc<dyn SourcePlatform>,
}

impl IdentityResolver {
    pub fn new(platform: Arc<dyn SourcePlatform>) -> Self {
        Self { platform }
    }

    /// Resolve a username and/or email to an account
    ///
    /// The username is tried first. When it is absent or unknown the email is
    /// used for a best-effort reverse lookup, whose first match is then looked
    /// up by handle. `Ok(None)` means no account could be found, which includes
    /// the platform refusing the email search.
    #[instrument(skip(self, email), fields(has_email = email.is_some()))]
    pub async fn resolve(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserIdentity>> {
        if let Some(username) = username {
            let user = self
                .platform
                .get_user(username)
                .await
                .map_err(|e| EngineError::platform(format!("Failed to look up user {}", username), e))?;

            if let Some(user) = user {
                info!(login = user.login().unwrap_or(username), "Resolved user by username");
                return Ok(Some(user));
            }
            debug!("No user with that username");
        }

        let Some(email) = email else {
            return Ok(None);
        };

        let login = match self.platform.search_login_by_email(email).await {
            Ok(login) => login,
            Err(e) if e.is_denied() => {
                warn!("Email search denied by platform, treating as not found: {}", e);
                None
            }
            Err(e) => return Err(EngineError::platform("Failed to search users by email", e)),
        };

        let Some(login) = login else {
            debug!("Email search returned no match");
            return Ok(None);
        };

        let user = self
            .platform
            .get_user(&login)
            .await
            .map_err(|e| EngineError::platform(format!("Failed to look up user {}", login), e))?;

        if user.is_some() {
            info!(login = %login, "Resolved user by email");
        }

        Ok(user)
    }
}
