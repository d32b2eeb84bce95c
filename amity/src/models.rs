//! Record shapes shared by the stores and the managers.
//!
//! Author names and pictures embedded in posts and comments are snapshots taken
//! when the post or comment was written. Profile edits never rewrite them.

use std::{collections::BTreeSet, fmt, marker::PhantomData};

use chrono::{DateTime, Utc};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, SeqAccess, Visitor},
};
use serde_json::Value;

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

/// Attribution shown for comments stored as bare text.
pub const LEGACY_COMMENT_AUTHOR: &str = "Unknown user";

/// Set of user ids used for both friend lists and like membership.
///
/// Stored documents may carry this as an array, as a map of id to flag, or not
/// at all; every shape is normalized here so callers only ever see a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet(BTreeSet<String>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Adds `id`, returning `false` when it was already a member.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    /// Removes `id`, returning `false` when it was not a member.
    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for IdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl Serialize for IdSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.0)
    }
}

impl<'de> Deserialize<'de> for IdSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdSetVisitor)
    }
}

struct IdSetVisitor;

impl<'de> Visitor<'de> for IdSetVisitor {
    type Value = IdSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of ids, a map of id to flag, or null")
    }

    fn visit_unit<E: de::Error>(self) -> Result<IdSet, E> {
        Ok(IdSet::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<IdSet, E> {
        Ok(IdSet::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<IdSet, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdSetVisitor)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<IdSet, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut ids = IdSet::new();
        while let Some(entry) = seq.next_element::<Option<String>>()? {
            if let Some(id) = entry.filter(|id| !id.is_empty()) {
                ids.insert(id);
            }
        }
        Ok(ids)
    }

    fn visit_map<A>(self, mut map: A) -> Result<IdSet, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut ids = IdSet::new();
        while let Some((id, flag)) = map.next_entry::<String, Value>()? {
            if !matches!(flag, Value::Null | Value::Bool(false)) {
                ids.insert(id);
            }
        }
        Ok(ids)
    }
}

/// Deserializes a sequence that older writers may have stored as `null` or as an
/// empty object (Lua's cjson cannot tell an empty array from an empty table).
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct LenientSeq<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for LenientSeq<T> {
        type Value = Vec<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a sequence, an empty object, or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Vec<T>, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Vec<T>, E> {
            Ok(Vec::new())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<T>, A::Error> {
            let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(item) = seq.next_element()? {
                items.push(item);
            }
            Ok(items)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<T>, A::Error> {
            let mut items = Vec::new();
            while let Some((_, item)) = map.next_entry::<de::IgnoredAny, T>()? {
                items.push(item);
            }
            Ok(items)
        }
    }

    deserializer.deserialize_any(LenientSeq(PhantomData))
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub picture_ref: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub friends: IdSet,
    #[serde(default)]
    pub viewed_profile: u64,
    #[serde(default)]
    pub impressions: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for account registration. The password arrives already hashed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub picture_ref: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub linkedin: String,
}

/// Partial profile edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

impl ProfilePatch {
    /// Drops blank names so an empty form field cannot erase them; other fields may be cleared.
    pub fn normalized(self) -> Self {
        let keep_name = |name: Option<String>| {
            name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
        };
        Self {
            first_name: keep_name(self.first_name),
            last_name: keep_name(self.last_name),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, user: &mut User) {
        let fields = [
            (&self.first_name, &mut user.first_name),
            (&self.last_name, &mut user.last_name),
            (&self.location, &mut user.location),
            (&self.occupation, &mut user.occupation),
            (&self.twitter, &mut user.twitter),
            (&self.linkedin, &mut user.linkedin),
        ];
        for (patch, slot) in fields {
            if let Some(value) = patch {
                slot.clone_from(value);
            }
        }
    }
}

/// Friend list entry returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct FriendView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub occupation: String,
    pub location: String,
    pub picture_ref: String,
}

impl From<&User> for FriendView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            occupation: user.occupation.clone(),
            location: user.location.clone(),
            picture_ref: user.picture_ref.clone(),
        }
    }
}

/// Public view of an account; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub picture_ref: String,
    pub location: String,
    pub occupation: String,
    pub twitter: String,
    pub linkedin: String,
    pub friends: Vec<String>,
    pub friend_count: usize,
    pub viewed_profile: u64,
    pub impressions: u64,
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            picture_ref: user.picture_ref.clone(),
            location: user.location.clone(),
            occupation: user.occupation.clone(),
            twitter: user.twitter.clone(),
            linkedin: user.linkedin.clone(),
            friends: user.friends.to_vec(),
            friend_count: user.friends.len(),
            viewed_profile: user.viewed_profile,
            impressions: user.impressions,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Copy of the author's public fields taken when a post is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorSnapshot {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub picture_ref: String,
}

impl AuthorSnapshot {
    pub fn of(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            location: user.location.clone(),
            picture_ref: user.picture_ref.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A structured comment with attribution snapshotted at write time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentRecord {
    #[serde(alias = "userId")]
    pub author_id: String,
    #[serde(alias = "userName")]
    pub author_name: String,
    #[serde(default, alias = "userPicturePath")]
    pub author_picture_ref: String,
    pub text: String,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    pub fn snapshot(author: &User, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            author_id: author.id.clone(),
            author_name: author.display_name(),
            author_picture_ref: author.picture_ref.clone(),
            text: text.into(),
            created_at,
        }
    }
}

/// An entry in a post's comment log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Comment {
    Structured(CommentRecord),
    /// Bare text written before comments carried author metadata.
    Legacy(String),
}

impl Comment {
    pub fn text(&self) -> &str {
        match self {
            Comment::Structured(record) => &record.text,
            Comment::Legacy(text) => text,
        }
    }

    pub fn author_id(&self) -> Option<&str> {
        match self {
            Comment::Structured(record) => Some(&record.author_id),
            Comment::Legacy(_) => None,
        }
    }

    pub fn author_name(&self) -> &str {
        match self {
            Comment::Structured(record) => &record.author_name,
            Comment::Legacy(_) => LEGACY_COMMENT_AUTHOR,
        }
    }

    pub fn author_picture_ref(&self) -> Option<&str> {
        match self {
            Comment::Structured(record) if !record.author_picture_ref.is_empty() => Some(&record.author_picture_ref),
            _ => None,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Comment::Structured(record) => Some(record.created_at),
            Comment::Legacy(_) => None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Comment::Legacy(_))
    }
}

/// A post in the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author: AuthorSnapshot,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub likes: IdSet,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    /// Bumped by every like mutation and comment append.
    #[serde(default)]
    pub version: u64,
}

impl Post {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.contains(user_id)
    }
}

/// Input for a new post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_ref: Option<String>,
}
