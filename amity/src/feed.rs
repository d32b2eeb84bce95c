//! Read-only feed projections.

use crate::{
    errors::{SocialError, Subject},
    models::Post,
    store::{PostFilter, PostStore},
    validators::require_id,
};

pub struct FeedAssembler<S> {
    store: S,
}

impl<S> FeedAssembler<S>
where
    S: PostStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every post, newest first.
    pub async fn list_feed(&self) -> Result<Vec<Post>, SocialError> {
        assemble(&self.store, &PostFilter::all()).await
    }

    /// Posts written by `user_id`, newest first. Unknown users simply have no posts.
    pub async fn list_user_feed(&self, user_id: &str) -> Result<Vec<Post>, SocialError> {
        require_id(user_id, "user id")?;
        assemble(&self.store, &PostFilter::by_author(user_id)).await
    }
}

pub(crate) async fn assemble<S: PostStore>(store: &S, filter: &PostFilter) -> Result<Vec<Post>, SocialError> {
    let mut posts = store
        .list_posts(filter)
        .await
        .map_err(|err| SocialError::from_store(err, Subject::Post))?;
    sort_newest_first(&mut posts);
    Ok(posts)
}

/// Orders by `created_at` descending. The sort is stable, so posts with equal
/// timestamps keep their insertion order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
