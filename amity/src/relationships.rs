//! Symmetric friend graph.
//!
//! A friendship lives in two documents, one per user, and is written with two
//! independent atomic updates (caller first, then the counterpart). A failure
//! between the two leaves the pair asymmetric. Reads never cross-check the
//! other side: each user's own list is authoritative for their view, and
//! [`RelationshipManager::reconcile`] re-applies that view to the counterpart.

use chrono::{DateTime, Utc};

use crate::{
    errors::{SocialError, Subject},
    models::{FriendView, User},
    store::IdentityStore,
    validators::require_id,
};

pub struct RelationshipManager<S> {
    store: S,
}

impl<S> RelationshipManager<S>
where
    S: IdentityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds the friendship if `self_id` does not list `other_id`, removes it otherwise.
    ///
    /// Returns the caller's friend list after the change.
    pub async fn toggle_friend(&self, self_id: &str, other_id: &str) -> Result<Vec<FriendView>, SocialError> {
        require_id(self_id, "user id")?;
        require_id(other_id, "friend id")?;
        if self_id == other_id {
            return Err(SocialError::invalid("cannot add yourself as a friend"));
        }

        let user = self.require_user(self_id, Subject::User).await?;
        self.require_user(other_id, Subject::Friend).await?;

        let befriend = !user.friends.contains(other_id);
        let now = Utc::now();

        let updated = self.set_membership(self_id, other_id, befriend, now, Subject::User).await?;
        if let Err(err) = self.set_membership(other_id, self_id, befriend, now, Subject::Friend).await {
            match err {
                // The counterpart disappeared after we resolved it; nothing left to mirror.
                SocialError::NotFound { .. } => {
                    log::warn!("friend {other_id} vanished while mirroring toggle from {self_id}");
                }
                other => {
                    log::warn!("friendship {self_id} -> {other_id} left one-sided, reconcile to repair: {other}");
                    return Err(other);
                }
            }
        }

        log::debug!(
            "{} friendship {self_id} <-> {other_id}",
            if befriend { "added" } else { "removed" }
        );
        self.project(&updated).await
    }

    /// Resolves the user's friend list. Ids that no longer resolve are skipped.
    pub async fn list_friends(&self, user_id: &str) -> Result<Vec<FriendView>, SocialError> {
        require_id(user_id, "user id")?;
        let user = self.require_user(user_id, Subject::User).await?;
        self.project(&user).await
    }

    /// Makes `other_id`'s side of the pair agree with `self_id`'s list.
    ///
    /// Returns `true` when a repair was written. Running it again is a no-op.
    pub async fn reconcile(&self, self_id: &str, other_id: &str) -> Result<bool, SocialError> {
        require_id(self_id, "user id")?;
        require_id(other_id, "friend id")?;
        if self_id == other_id {
            return Err(SocialError::invalid("cannot reconcile a user with themselves"));
        }

        let user = self.require_user(self_id, Subject::User).await?;
        let Some(other) = self.find_user(other_id).await? else {
            return Ok(false);
        };

        let should_list = user.friends.contains(other_id);
        if other.friends.contains(self_id) == should_list {
            return Ok(false);
        }

        self.set_membership(other_id, self_id, should_list, Utc::now(), Subject::Friend)
            .await?;
        log::debug!("reconciled {other_id}'s view of {self_id} (listed: {should_list})");
        Ok(true)
    }

    async fn set_membership(
        &self,
        owner_id: &str,
        member_id: &str,
        present: bool,
        at: DateTime<Utc>,
        subject: Subject,
    ) -> Result<User, SocialError> {
        let ids = [member_id.to_string()];
        let none: &[String] = &[];
        let (add, remove) = if present { (&ids[..], none) } else { (none, &ids[..]) };
        self.store
            .update_friends(owner_id, add, remove, at)
            .await
            .map_err(|err| SocialError::from_store(err, subject))
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, SocialError> {
        self.store
            .find_user(user_id)
            .await
            .map_err(|err| SocialError::from_store(err, Subject::User))
    }

    async fn require_user(&self, user_id: &str, subject: Subject) -> Result<User, SocialError> {
        self.find_user(user_id)
            .await?
            .ok_or_else(|| SocialError::not_found(subject, user_id))
    }

    async fn project(&self, user: &User) -> Result<Vec<FriendView>, SocialError> {
        let mut friends = Vec::with_capacity(user.friends.len());
        for friend_id in user.friends.iter() {
            match self.find_user(friend_id).await? {
                Some(friend) => friends.push(FriendView::from(&friend)),
                None => log::warn!("skipping dangling friend id {friend_id} on user {}", user.id),
            }
        }
        Ok(friends)
    }
}
