//! Amity core library.
//!
//! Consistency rules for a small social network: a symmetric friend graph,
//! toggled per-user likes, append-only comments and a recency-ordered feed.
//! Storage sits behind the `IdentityStore` and `PostStore` traits.

pub mod accounts;
pub mod client;
pub mod config;
pub mod engagement;
pub mod errors;
pub mod feed;
pub mod id;
pub mod keys;
pub mod models;
pub mod relationships;
pub mod runtime;
pub mod store;
pub mod validators;

pub use accounts::AccountDirectory;
pub use client::SocialClient;
pub use config::{AmityConfig, ConfigError};
pub use engagement::{EngagementManager, LikeOutcome};
pub use errors::*;
pub use feed::FeedAssembler;
pub use models::{
    AuthorSnapshot, Comment, CommentRecord, FriendView, IdSet, NewPost, NewUser, Post, ProfilePatch, User,
    UserProfile,
};
pub use relationships::RelationshipManager;
pub use store::{IdentityStore, MemoryStore, PostFilter, PostStore, RedisStore};

// Re-export redis types so users don't need to depend on a specific redis version
pub use redis;
pub use redis::aio::ConnectionManager;
