//! Repository reference parsed from a user-supplied URL.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::CollectorError;

/// Owner/name pair identifying a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

impl RepositoryReference {
    /// Parse `https://<host>/<owner>/<repo>`.
    ///
    /// Query string, fragment and trailing slashes are ignored. Owner and name
    /// are the first two path segments, so browser sub-paths such as
    /// `/acme/widget/tree/main/src` resolve to the repository itself.
    pub fn parse(input: &str) -> Result<Self, CollectorError> {
        let invalid = || CollectorError::InvalidUrl {
            input: input.to_string(),
        };

        let url = Url::parse(input.trim()).map_err(|_| invalid())?;
        let mut segments = url
            .path_segments()
            .ok_or_else(invalid)?
            .filter(|segment| !segment.is_empty());

        let owner = segments.next().ok_or_else(invalid)?;
        let repo = segments.next().ok_or_else(invalid)?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if repo.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: repo.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
