//! Result assembly

use ghreview_core::domain::assessment::{AssessmentResult, RepositorySample, UserIdentity};

use crate::error::{EngineError, Result};

/// Assemble the final result for a resolved user
///
/// Pure; fails only when the user record lacks a login handle.
pub fn aggregate(
    user: UserIdentity,
    repositories: Vec<RepositorySample>,
    summary: String,
    requested_by: Option<String>,
) -> Result<AssessmentResult> {
    if user.login().is_none() {
        return Err(EngineError::InvalidData(
            "user record has no login".to_string(),
        ));
    }

    Ok(AssessmentResult {
        user,
        repositories,
        summary,
        requested_by,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::identity;

    #[test]
    fn test_aggregate_keeps_everything() {
        let result = aggregate(
            identity("octocat"),
            vec![],
            "summary".to_string(),
            Some("alice".to_string()),
        )
        .unwrap();

        assert_eq!(result.user.login(), Some("octocat"));
        assert_eq!(result.summary, "summary");
        assert_eq!(result.requested_by.as_deref(), Some("alice"));
    }

    #[test]
    fn test_aggregate_requires_login() {
        let err = aggregate(UserIdentity::default(), vec![], String::new(), None).unwrap_err();
        assert!(matches!(err, EngineError::InvalidData(_)));
    }
}
