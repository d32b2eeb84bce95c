//! Storage contracts consumed by the managers, plus the two shipped backends.
//!
//! Every mutating method is a single atomic document update. Nothing here spans
//! two documents; callers that touch two records (friendship) issue two calls.

mod memory;
mod redis_store;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

use chrono::{DateTime, Utc};

use crate::{
    errors::StoreError,
    models::{Comment, Post, ProfilePatch, User},
};

/// Persistence for user records.
#[allow(async_fn_in_trait)]
pub trait IdentityStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Looks a user up by email, ignoring case and surrounding whitespace.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Stores a new user. Fails with `DuplicateEmail` when the address is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Atomically removes `remove` from and adds `add` to the user's friend set.
    ///
    /// Adding an id that is already present is a no-op, as is removing one that
    /// is absent. Returns the updated record.
    async fn update_friends(
        &self,
        user_id: &str,
        add: &[String],
        remove: &[String],
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError>;

    /// Atomically applies every `Some` field of `patch`.
    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError>;
}

/// Persistence for posts and their engagement.
#[allow(async_fn_in_trait)]
pub trait PostStore {
    async fn find_post(&self, post_id: &str) -> Result<Option<Post>, StoreError>;

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError>;

    /// Sets `user_id`'s like membership if the post is still at `expected_version`.
    ///
    /// Fails with `VersionConflict` when another write landed first. On success the
    /// post version is incremented and the updated record returned.
    async fn set_like(
        &self,
        post_id: &str,
        user_id: &str,
        liked: bool,
        expected_version: u64,
    ) -> Result<Post, StoreError>;

    /// Atomically appends to the comment log and returns the updated record.
    async fn append_comment(&self, post_id: &str, comment: &Comment) -> Result<Post, StoreError>;

    /// Removes the post. Returns `false` when it was already gone.
    async fn delete_post(&self, post_id: &str) -> Result<bool, StoreError>;

    /// Lists posts matching `filter` in insertion order, oldest first.
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, StoreError>;
}

/// Selection applied by `PostStore::list_posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<String>,
}

impl PostFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_author(author_id: impl Into<String>) -> Self {
        Self {
            author_id: Some(author_id.into()),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.author_id.as_deref().is_none_or(|author| post.author_id == author)
    }
}
