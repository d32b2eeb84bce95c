use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};

use super::{IdentityStore, PostFilter, PostStore};
use crate::{
    errors::StoreError,
    models::{Comment, Post, ProfilePatch, User},
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<String, User>,
    /// Case-folded email to user id.
    emails: HashMap<String, String>,
    posts: HashMap<String, Post>,
    /// Post ids in insertion order.
    post_order: Vec<String>,
}

/// In-process store. Each method holds the lock for the whole read-modify-write,
/// which makes every mutation atomic per document.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Unavailable {
            message: "memory store lock poisoned".into(),
        })
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl IdentityStore for MemoryStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.state()?.users.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state()?;
        Ok(state
            .emails
            .get(&email_key(email))
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut state = self.state()?;
        let key = email_key(&user.email);
        if state.emails.contains_key(&key) {
            return Err(StoreError::DuplicateEmail {
                email: user.email.clone(),
            });
        }
        state.emails.insert(key, user.id.clone());
        state.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_friends(
        &self,
        user_id: &str,
        add: &[String],
        remove: &[String],
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let mut state = self.state()?;
        let user = state.users.get_mut(user_id).ok_or_else(|| StoreError::NotFound {
            id: user_id.to_string(),
        })?;
        for id in remove {
            user.friends.remove(id);
        }
        for id in add {
            user.friends.insert(id.clone());
        }
        user.updated_at = updated_at;
        Ok(user.clone())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let mut state = self.state()?;
        let user = state.users.get_mut(user_id).ok_or_else(|| StoreError::NotFound {
            id: user_id.to_string(),
        })?;
        patch.apply_to(user);
        user.updated_at = updated_at;
        Ok(user.clone())
    }
}

impl PostStore for MemoryStore {
    async fn find_post(&self, post_id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.state()?.posts.get(post_id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut state = self.state()?;
        if state.posts.insert(post.id.clone(), post.clone()).is_none() {
            state.post_order.push(post.id.clone());
        }
        Ok(())
    }

    async fn set_like(
        &self,
        post_id: &str,
        user_id: &str,
        liked: bool,
        expected_version: u64,
    ) -> Result<Post, StoreError> {
        let mut state = self.state()?;
        let post = state.posts.get_mut(post_id).ok_or_else(|| StoreError::NotFound {
            id: post_id.to_string(),
        })?;
        if post.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: post.version,
            });
        }
        if liked {
            post.likes.insert(user_id);
        } else {
            post.likes.remove(user_id);
        }
        post.version += 1;
        Ok(post.clone())
    }

    async fn append_comment(&self, post_id: &str, comment: &Comment) -> Result<Post, StoreError> {
        let mut state = self.state()?;
        let post = state.posts.get_mut(post_id).ok_or_else(|| StoreError::NotFound {
            id: post_id.to_string(),
        })?;
        post.comments.push(comment.clone());
        post.version += 1;
        Ok(post.clone())
    }

    async fn delete_post(&self, post_id: &str) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        let removed = state.posts.remove(post_id).is_some();
        if removed {
            state.post_order.retain(|id| id != post_id);
        }
        Ok(removed)
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, StoreError> {
        let state = self.state()?;
        Ok(state
            .post_order
            .iter()
            .filter_map(|id| state.posts.get(id))
            .filter(|post| filter.matches(post))
            .cloned()
            .collect())
    }
}
