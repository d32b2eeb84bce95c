use chrono::{DateTime, SecondsFormat, Utc};
use redis::{AsyncCommands, aio::ConnectionManager, cmd};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{IdentityStore, PostFilter, PostStore};
use crate::{
    config::StoreConfig,
    errors::StoreError,
    keys::KeyContext,
    models::{Comment, Post, ProfilePatch, User},
    runtime::{
        ScriptExecutor,
        commands::{FriendsUpdate, LikeMutation, ProfileUpdate},
        scripts::{
            FRIENDS_UPDATE_SCRIPT, POST_COMMENT_SCRIPT, POST_DELETE_SCRIPT, POST_INSERT_SCRIPT, POST_LIKE_SCRIPT,
            PROFILE_UPDATE_SCRIPT, USER_INSERT_SCRIPT,
        },
    },
};

/// Redis-backed store. Each record is a JSON string; every mutation runs as one
/// Lua script so it is atomic with respect to other clients.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
    service: String,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
            service: service.into(),
        }
    }

    /// Opens a managed connection using the `[store]` section of the configuration.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = config.resolved_url().map_err(|err| StoreError::Unavailable {
            message: err.to_string().into(),
        })?;
        let client = redis::Client::open(url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        log::debug!("connected to redis store (prefix {}:{})", config.prefix, config.service);
        Ok(Self::new(conn, config.prefix.clone(), config.service.clone()))
    }

    pub fn keys(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix, &self.service)
    }

    /// Deletes every key under this store's prefix. Returns the number removed.
    ///
    /// Uses SCAN + DEL so large namespaces do not block the server.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        const SCAN_COUNT: usize = 1000;
        let mut conn = self.conn.clone();
        let pattern = self.keys().namespace_pattern();
        let mut cursor: u64 = 0;
        let mut total_deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let deleted: u64 = cmd("DEL").arg(&keys).query_async(&mut conn).await?;
                total_deleted += deleted;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(total_deleted)
    }

    async fn get_document<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;
        raw.map(|json| decode_document(&json)).transpose()
    }

    async fn run(
        &self,
        script: &redis::Script,
        keys: Vec<String>,
        args: Vec<String>,
        record_id: &str,
    ) -> Result<Value, StoreError> {
        let mut conn = self.conn.clone();
        let mut executor = ScriptExecutor::new(&mut conn);
        executor.run(script, &keys, &args).await.map_err(|err| match err {
            StoreError::NotFound { .. } => StoreError::NotFound {
                id: record_id.to_string(),
            },
            other => other,
        })
    }
}

fn decode_document<T: DeserializeOwned>(json: &str) -> Result<T, StoreError> {
    serde_json::from_str(json).map_err(|err| StoreError::Corrupt {
        message: format!("failed to deserialize document: {err}").into(),
    })
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|err| StoreError::Corrupt {
        message: format!("failed to deserialize document: {err}").into(),
    })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|err| StoreError::Corrupt {
        message: format!("failed to serialize payload: {err}").into(),
    })
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl IdentityStore for RedisStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        self.get_document(&self.keys().user(user_id)).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn.clone();
        let user_id: Option<String> = conn.get(self.keys().user_email(email)).await?;
        match user_id {
            Some(id) => self.find_user(&id).await,
            None => Ok(None),
        }
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let keys = self.keys();
        self.run(
            &USER_INSERT_SCRIPT,
            vec![keys.user(&user.id), keys.user_email(&user.email)],
            vec![encode(user)?, user.id.clone(), user.email.clone()],
            &user.id,
        )
        .await?;
        Ok(())
    }

    async fn update_friends(
        &self,
        user_id: &str,
        add: &[String],
        remove: &[String],
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let payload = FriendsUpdate {
            add,
            remove,
            updated_at: timestamp(updated_at),
        };
        let value = self
            .run(
                &FRIENDS_UPDATE_SCRIPT,
                vec![self.keys().user(user_id)],
                vec![encode(&payload)?],
                user_id,
            )
            .await?;
        from_value(value)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let payload = ProfileUpdate {
            fields: patch,
            updated_at: timestamp(updated_at),
        };
        let value = self
            .run(
                &PROFILE_UPDATE_SCRIPT,
                vec![self.keys().user(user_id)],
                vec![encode(&payload)?],
                user_id,
            )
            .await?;
        from_value(value)
    }
}

impl PostStore for RedisStore {
    async fn find_post(&self, post_id: &str) -> Result<Option<Post>, StoreError> {
        self.get_document(&self.keys().post(post_id)).await
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        let keys = self.keys();
        self.run(
            &POST_INSERT_SCRIPT,
            vec![keys.post(&post.id), keys.post_feed(), keys.post_sequence()],
            vec![encode(post)?, post.id.clone()],
            &post.id,
        )
        .await?;
        Ok(())
    }

    async fn set_like(
        &self,
        post_id: &str,
        user_id: &str,
        liked: bool,
        expected_version: u64,
    ) -> Result<Post, StoreError> {
        let payload = LikeMutation {
            user_id,
            liked,
            expected_version,
        };
        let value = self
            .run(&POST_LIKE_SCRIPT, vec![self.keys().post(post_id)], vec![encode(&payload)?], post_id)
            .await?;
        from_value(value)
    }

    async fn append_comment(&self, post_id: &str, comment: &Comment) -> Result<Post, StoreError> {
        let value = self
            .run(&POST_COMMENT_SCRIPT, vec![self.keys().post(post_id)], vec![encode(comment)?], post_id)
            .await?;
        from_value(value)
    }

    async fn delete_post(&self, post_id: &str) -> Result<bool, StoreError> {
        let keys = self.keys();
        let value = self
            .run(
                &POST_DELETE_SCRIPT,
                vec![keys.post(post_id), keys.post_feed()],
                vec![post_id.to_string()],
                post_id,
            )
            .await?;
        Ok(value.get("deleted").and_then(Value::as_bool).unwrap_or(false))
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, StoreError> {
        let mut conn = self.conn.clone();
        let keys = self.keys();
        let ids: Vec<String> = conn.zrange(keys.post_feed(), 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let post_keys: Vec<String> = ids.iter().map(|id| keys.post(id)).collect();
        let documents: Vec<Option<String>> = cmd("MGET").arg(&post_keys).query_async(&mut conn).await?;

        let mut posts = Vec::with_capacity(documents.len());
        // A document can vanish between ZRANGE and MGET when a delete races the read.
        for json in documents.into_iter().flatten() {
            let post: Post = decode_document(&json)?;
            if filter.matches(&post) {
                posts.push(post);
            }
        }
        Ok(posts)
    }
}
