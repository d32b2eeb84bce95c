//! Entry point bundling one store with the operations built on top of it.
//!
//! # Example
//! ```ignore
//! let config = AmityConfig::load_or_default(Path::new("amity.toml"))?;
//! let social = SocialClient::connect(config).await?;
//!
//! let friends = social.relationships().toggle_friend(&ada, &bob).await?;
//! let outcome = social.engagement().toggle_like(&post_id, &bob).await?;
//! let feed = social.feed().list_feed().await?;
//! ```

use crate::{
    accounts::AccountDirectory,
    config::AmityConfig,
    engagement::EngagementManager,
    errors::StoreError,
    feed::FeedAssembler,
    relationships::RelationshipManager,
    store::{IdentityStore, MemoryStore, PostStore, RedisStore},
};

/// Hands out managers that share one store handle. Store handles are cheap to
/// clone (an `Arc` or a Redis connection manager).
#[derive(Clone)]
pub struct SocialClient<S> {
    store: S,
    config: AmityConfig,
}

impl<S> SocialClient<S>
where
    S: Clone + IdentityStore + PostStore,
{
    pub fn new(store: S, config: AmityConfig) -> Self {
        Self { store, config }
    }

    pub fn relationships(&self) -> RelationshipManager<S> {
        RelationshipManager::new(self.store.clone())
    }

    pub fn engagement(&self) -> EngagementManager<S> {
        EngagementManager::new(self.store.clone(), &self.config.engagement)
    }

    pub fn feed(&self) -> FeedAssembler<S> {
        FeedAssembler::new(self.store.clone())
    }

    pub fn accounts(&self) -> AccountDirectory<S> {
        AccountDirectory::new(self.store.clone())
    }

    pub fn config(&self) -> &AmityConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl SocialClient<RedisStore> {
    /// Connects to the store named in `config.store`.
    pub async fn connect(config: AmityConfig) -> Result<Self, StoreError> {
        let store = RedisStore::connect(&config.store).await?;
        Ok(Self::new(store, config))
    }
}

impl SocialClient<MemoryStore> {
    pub fn in_memory(config: AmityConfig) -> Self {
        Self::new(MemoryStore::new(), config)
    }
}
