//! Likes, comments and post lifecycle.
//!
//! Like toggles are optimistic: read the post and its version, flip membership,
//! and write back only if the version is unchanged. A conflicting write sends
//! the toggle around again, up to `max_conflict_retries` attempts in total.
//! Comment appends need no version check; the store's append order is final.

use chrono::Utc;
use serde::Serialize;

use crate::{
    config::EngagementConfig,
    errors::{SocialError, StoreError, Subject},
    feed::assemble,
    id::generate_record_id,
    models::{AuthorSnapshot, Comment, CommentRecord, IdSet, NewPost, Post, User},
    store::{IdentityStore, PostFilter, PostStore},
    validators::{is_present, require_id},
};

/// Result of a like toggle.
#[derive(Debug, Clone, Serialize)]
pub struct LikeOutcome {
    pub post: Post,
    /// Whether the user likes the post after the toggle.
    pub liked: bool,
    pub like_count: usize,
}

pub struct EngagementManager<S> {
    store: S,
    max_conflict_retries: u32,
}

impl<S> EngagementManager<S>
where
    S: IdentityStore + PostStore,
{
    pub fn new(store: S, config: &EngagementConfig) -> Self {
        Self {
            store,
            max_conflict_retries: config.max_conflict_retries.max(1),
        }
    }

    /// Flips `user_id`'s like on the post. Applying it twice restores the original state.
    pub async fn toggle_like(&self, post_id: &str, user_id: &str) -> Result<LikeOutcome, SocialError> {
        require_id(user_id, "user id")?;
        require_id(post_id, "post id")?;

        for attempt in 1..=self.max_conflict_retries {
            let post = self.require_post(post_id).await?;
            let liked = !post.is_liked_by(user_id);
            match self.store.set_like(post_id, user_id, liked, post.version).await {
                Ok(post) => {
                    log::debug!("{user_id} {} post {post_id}", if liked { "liked" } else { "unliked" });
                    return Ok(LikeOutcome {
                        like_count: post.like_count(),
                        liked,
                        post,
                    });
                }
                Err(StoreError::VersionConflict { expected, actual }) => {
                    log::warn!(
                        "like on post {post_id} conflicted (attempt {attempt}/{}, expected v{expected}, found v{actual})",
                        self.max_conflict_retries
                    );
                }
                Err(err) => return Err(SocialError::from_store(err, Subject::Post)),
            }
        }

        Err(SocialError::StoreUnavailable {
            message: format!(
                "like on post {post_id} still conflicting after {} attempts",
                self.max_conflict_retries
            ),
        })
    }

    /// Appends a comment attributed to the user's current name and picture.
    pub async fn add_comment(&self, post_id: &str, user_id: &str, text: &str) -> Result<Post, SocialError> {
        require_id(user_id, "user id")?;
        require_id(post_id, "post id")?;
        if !is_present(text) {
            return Err(SocialError::invalid("comment text must not be empty"));
        }

        self.require_post(post_id).await?;
        let author = self.require_user(user_id).await?;

        let comment = Comment::Structured(CommentRecord::snapshot(&author, text.trim(), Utc::now()));
        let post = self
            .store
            .append_comment(post_id, &comment)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::Post))?;
        log::debug!("{user_id} commented on post {post_id} ({} comments)", post.comments.len());
        Ok(post)
    }

    /// Publishes a post with a snapshot of its author and returns the feed.
    pub async fn create_post(&self, author_id: &str, new_post: NewPost) -> Result<Vec<Post>, SocialError> {
        require_id(author_id, "user id")?;
        let author = self.require_user(author_id).await?;

        let post = Post {
            id: generate_record_id(),
            author_id: author.id.clone(),
            author: AuthorSnapshot::of(&author),
            description: new_post.description.trim().to_string(),
            image_ref: new_post.image_ref.filter(|image| is_present(image)),
            likes: IdSet::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
            version: 0,
        };
        self.store
            .insert_post(&post)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::Post))?;
        log::debug!("{author_id} published post {}", post.id);

        assemble(&self.store, &PostFilter::all()).await
    }

    /// Deletes a post owned by `requester_id` and returns the feed without it.
    ///
    /// Ownership is a direct comparison against the post's `author_id`.
    pub async fn delete_post(&self, post_id: &str, requester_id: &str) -> Result<Vec<Post>, SocialError> {
        require_id(post_id, "post id")?;
        require_id(requester_id, "user id")?;

        let post = self.require_post(post_id).await?;
        if post.author_id != requester_id {
            return Err(SocialError::forbidden("you can only delete your own posts"));
        }

        let removed = self
            .store
            .delete_post(post_id)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::Post))?;
        if !removed {
            log::debug!("post {post_id} was already gone");
        }

        assemble(&self.store, &PostFilter::all()).await
    }

    async fn require_post(&self, post_id: &str) -> Result<Post, SocialError> {
        self.store
            .find_post(post_id)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::Post))?
            .ok_or_else(|| SocialError::not_found(Subject::Post, post_id))
    }

    async fn require_user(&self, user_id: &str) -> Result<User, SocialError> {
        self.store
            .find_user(user_id)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::User))?
            .ok_or_else(|| SocialError::not_found(Subject::User, user_id))
    }
}
