use serde::Serialize;

use crate::models::ProfilePatch;

/// Argument of `friends_update.lua`.
#[derive(Debug, Serialize)]
pub struct FriendsUpdate<'a> {
    pub add: &'a [String],
    pub remove: &'a [String],
    pub updated_at: String,
}

/// Argument of `profile_update.lua`. Absent patch fields are not serialized.
#[derive(Debug, Serialize)]
pub struct ProfileUpdate<'a> {
    pub fields: &'a ProfilePatch,
    pub updated_at: String,
}

/// Argument of `post_like.lua`.
#[derive(Debug, Serialize)]
pub struct LikeMutation<'a> {
    pub user_id: &'a str,
    pub liked: bool,
    pub expected_version: u64,
}
