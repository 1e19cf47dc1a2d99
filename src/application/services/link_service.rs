//! Link creation, lookup, and deletion service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{IdentitySource, LinkRepository, LinkTotals};
use crate::error::AppError;
use crate::utils::code_codec::{encode, is_reserved, is_valid_syntax};
use crate::utils::url_validator::validate_url;

/// How many identities may be skipped for reserved codes before giving up.
const MAX_IDENTITY_ATTEMPTS: usize = 4;

/// Service for creating and managing shortened links.
///
/// Codes are never chosen at random: each link takes the next identity from
/// the [`IdentitySource`] and its Base62 encoding becomes the short code, so
/// codes cannot collide.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    identity_source: Arc<dyn IdentitySource>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are built on, e.g.
    /// `https://s.example.com`.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        identity_source: Arc<dyn IdentitySource>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            identity_source,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link for a destination URL.
    ///
    /// # Flow
    ///
    /// 1. Validate the destination
    /// 2. Draw the next identity (skipping any whose code is a reserved route)
    /// 3. Encode it as Base62
    /// 4. Persist and return the stored record
    ///
    /// An identity drawn for a link that fails to persist is not reused.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is rejected.
    /// Returns [`AppError::Persistence`] if the identity source or storage fails.
    pub async fn create_short_link(&self, long_url: &str) -> Result<Link, AppError> {
        let long_url = validate_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let (id, code) = self.next_code().await?;
        debug!(id, code = %code, "Generated short code");

        let link = self
            .link_repository
            .create(NewLink { id, code, long_url })
            .await
            .inspect_err(|e| error!(id, error = %e, "Failed to store short link"))?;

        info!(code = %link.code, "Created short link");
        Ok(link)
    }

    /// Retrieves a link with its usage metadata.
    ///
    /// A code that is not valid Base62 is reported as not found without
    /// touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        if !is_valid_syntax(code) {
            return Err(not_found(code));
        }

        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// Deletes a link permanently.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !is_valid_syntax(code) || !self.link_repository.delete_by_code(code).await? {
            warn!(code, "Short code not found for deletion");
            return Err(not_found(code));
        }

        info!(code, "Deleted short link");
        Ok(())
    }

    /// Link and click totals across all links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn totals(&self) -> Result<LinkTotals, AppError> {
        self.link_repository.totals().await
    }

    /// Checks that storage is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if storage cannot be reached.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Draws identities until one encodes to a non-reserved code.
    async fn next_code(&self) -> Result<(i64, String), AppError> {
        for _ in 0..MAX_IDENTITY_ATTEMPTS {
            let id = self.identity_source.next_identity().await?;

            let Ok(unsigned) = u64::try_from(id) else {
                error!(id, "Identity source returned a negative identity");
                return Err(AppError::internal(
                    "Identity source returned an invalid identity",
                    json!({ "id": id }),
                ));
            };

            let code = encode(unsigned);
            if is_reserved(&code) {
                debug!(id, code = %code, "Skipping identity with reserved code");
                continue;
            }

            return Ok((id, code));
        }

        Err(AppError::internal(
            "Failed to generate short code",
            json!({ "reason": "Too many reserved codes" }),
        ))
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short code not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockIdentitySource, MockLinkRepository};
    use crate::utils::code_codec::decode;
    use chrono::Utc;

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), 0, Utc::now(), None)
    }

    fn identities(ids: Vec<i64>) -> MockIdentitySource {
        let mut mock = MockIdentitySource::new();
        let mut ids = ids.into_iter();
        mock.expect_next_identity()
            .returning(move || Ok(ids.next().expect("no more identities")));
        mock
    }

    fn service(links: MockLinkRepository, ids: MockIdentitySource) -> LinkService {
        LinkService::new(Arc::new(links), Arc::new(ids), "https://s.example.com/")
    }

    #[tokio::test]
    async fn test_create_short_link_encodes_identity() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_create()
            .withf(|new_link| {
                new_link.id == 125
                    && new_link.code == "21"
                    && new_link.long_url == "https://example.com"
            })
            .times(1)
            .returning(|n| Ok(create_test_link(n.id, &n.code, &n.long_url)));

        let service = service(mock_link_repo, identities(vec![125]));

        let link = service
            .create_short_link("https://example.com")
            .await
            .unwrap();

        assert_eq!(link.code, "21");
        assert_eq!(decode(&link.code).unwrap(), 125);
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_url() {
        let mut mock_ids = MockIdentitySource::new();
        mock_ids.expect_next_identity().times(0);
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_create().times(0);

        let service = service(mock_link_repo, mock_ids);

        for url in ["not-a-url", "javascript:alert(1)", "http://localhost/admin"] {
            let result = service.create_short_link(url).await;
            assert!(matches!(result, Err(AppError::Validation { .. })), "{url}");
        }
    }

    #[tokio::test]
    async fn test_create_short_link_persistence_failure_consumes_identity() {
        let mut mock_link_repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_link_repo
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::persistence("Database error", json!({}))));
        mock_link_repo
            .expect_create()
            .withf(|new_link| new_link.id == 2 && new_link.code == "2")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|n| Ok(create_test_link(n.id, &n.code, &n.long_url)));

        let service = service(mock_link_repo, identities(vec![1, 2]));

        let first = service.create_short_link("https://example.com").await;
        assert!(matches!(first, Err(AppError::Persistence { .. })));

        let second = service
            .create_short_link("https://example.com")
            .await
            .unwrap();
        assert_eq!(second.code, "2");
    }

    #[tokio::test]
    async fn test_create_short_link_skips_reserved_code() {
        let urls_id = decode("urls").unwrap() as i64;

        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_create()
            .withf(move |new_link| new_link.id == urls_id + 1 && new_link.code == "urlt")
            .times(1)
            .returning(|n| Ok(create_test_link(n.id, &n.code, &n.long_url)));

        let service = service(mock_link_repo, identities(vec![urls_id, urls_id + 1]));

        let link = service
            .create_short_link("https://example.com")
            .await
            .unwrap();
        assert_eq!(link.code, "urlt");
    }

    #[tokio::test]
    async fn test_create_short_link_rejects_negative_identity() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_create().times(0);

        let service = service(mock_link_repo, identities(vec![-5]));

        let result = service.create_short_link("https://example.com").await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_identity_source_failure() {
        let mut mock_ids = MockIdentitySource::new();
        mock_ids
            .expect_next_identity()
            .times(1)
            .returning(|| Err(AppError::persistence("Database error", json!({}))));
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_create().times(0);

        let service = service(mock_link_repo, mock_ids);

        let result = service.create_short_link("https://example.com").await;
        assert!(matches!(result, Err(AppError::Persistence { .. })));
    }

    #[tokio::test]
    async fn test_get_link_found() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_by_code()
            .withf(|code| code == "abc")
            .times(1)
            .returning(|code| Ok(Some(create_test_link(1, code, "https://example.com"))));

        let service = service(mock_link_repo, MockIdentitySource::new());

        let link = service.get_link("abc").await.unwrap();
        assert_eq!(link.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(mock_link_repo, MockIdentitySource::new());

        let result = service.get_link("abc").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_link_invalid_syntax_skips_storage() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_find_by_code().times(0);

        let service = service(mock_link_repo, MockIdentitySource::new());

        let result = service.get_link("bad-code").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_link() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_delete_by_code()
            .withf(|code| code == "abc")
            .times(1)
            .returning(|_| Ok(true));
        mock_link_repo
            .expect_delete_by_code()
            .withf(|code| code == "missing")
            .times(1)
            .returning(|_| Ok(false));

        let service = service(mock_link_repo, MockIdentitySource::new());

        assert!(service.delete_link("abc").await.is_ok());
        assert!(matches!(
            service.delete_link("missing").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_link_invalid_syntax_skips_storage() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_delete_by_code().times(0);

        let service = service(mock_link_repo, MockIdentitySource::new());

        assert!(matches!(
            service.delete_link("").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = service(MockLinkRepository::new(), MockIdentitySource::new());
        assert_eq!(service.short_url("21"), "https://s.example.com/21");
    }
}
