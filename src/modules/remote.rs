// Remote collaborators.
// The list and pinned-review resources are owned by the backend; this crate
// only consumes them. `HttpApi` is the production implementation, tests use
// the in-memory fakes in `testing`.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::{ListUpdate, RankedList, ReviewEntry};

#[async_trait]
pub trait ListApi: Send + Sync {
    async fn fetch_list(&self, list_id: &str) -> Result<RankedList>;

    /// Replaces the remote copy wholesale.
    async fn update_list(&self, list_id: &str, update: &ListUpdate) -> Result<()>;
}

#[async_trait]
pub trait PinnedReviewApi: Send + Sync {
    /// The server-confirmed selection for `user_id`.
    async fn get_pinned(&self, user_id: &str) -> Result<Vec<ReviewEntry>>;

    async fn add_pinned(&self, review_id: &str) -> Result<()>;

    async fn remove_pinned(&self, review_id: &str) -> Result<()>;
}
