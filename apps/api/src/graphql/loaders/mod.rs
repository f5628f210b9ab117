//! DataLoader implementations for GraphQL
//!
//! Every relationship field on `User` and `Profile` resolves through one of
//! these loaders, so sibling lookups issued during one resolution step are
//! coalesced into a single grouped store fetch.
//!
//! There are two types of loaders:
//! - To-one loaders: return `Option<T>` per key, and insert `None` for keys
//!   with no row so a missing profile or member type is memoized as well
//! - To-many loaders: return `Vec<T>` per key, empty when nothing matches
//!
//! Loaders live in a [`RequestLoaders`] registry that is created fresh for
//! each GraphQL request by [`LoaderFactory::create`] and attached as request
//! data. Nothing cached by one request is visible to another.

mod member_type;
mod posts_by_author;
mod profile;
mod subscriptions;

pub use member_type::MemberTypeLoader;
pub use posts_by_author::PostsByAuthorLoader;
pub use profile::ProfileByUserLoader;
pub use subscriptions::{AuthorsBySubscriberLoader, SubscribersByAuthorLoader};

use std::sync::Arc;
use std::time::Duration;

use async_graphql::dataloader::{DataLoader, HashMapCache};
use async_graphql::Context;
use once_cell::sync::OnceCell;

use crate::error::ApiError;
use crate::repositories::SharedStore;

/// Log a failed grouped fetch once and share it with every waiting key
pub(crate) fn shared_error(error: ApiError) -> Arc<ApiError> {
    error.log();
    Arc::new(error)
}

/// Batch window and size for every loader in a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderSettings {
    /// How long a loader waits for more keys before dispatching a batch
    pub delay: Duration,
    /// Upper bound on keys per grouped fetch
    pub max_batch_size: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1),
            max_batch_size: 1000,
        }
    }
}

/// Builds a fresh [`RequestLoaders`] for every incoming request
#[derive(Clone)]
pub struct LoaderFactory {
    store: SharedStore,
    settings: LoaderSettings,
}

impl LoaderFactory {
    pub fn new(store: SharedStore, settings: LoaderSettings) -> Self {
        Self { store, settings }
    }

    /// Create an empty registry; loaders are instantiated on first use
    pub fn create(&self) -> RequestLoaders {
        RequestLoaders {
            store: self.store.clone(),
            settings: self.settings,
            profiles: OnceCell::new(),
            posts: OnceCell::new(),
            member_types: OnceCell::new(),
            subscribed_authors: OnceCell::new(),
            subscribers: OnceCell::new(),
        }
    }
}

/// Request-scoped loader registry
///
/// Each accessor returns the same loader instance for the lifetime of the
/// registry, creating it lazily on first use.
pub struct RequestLoaders {
    store: SharedStore,
    settings: LoaderSettings,
    profiles: OnceCell<DataLoader<ProfileByUserLoader, HashMapCache>>,
    posts: OnceCell<DataLoader<PostsByAuthorLoader, HashMapCache>>,
    member_types: OnceCell<DataLoader<MemberTypeLoader, HashMapCache>>,
    subscribed_authors: OnceCell<DataLoader<AuthorsBySubscriberLoader, HashMapCache>>,
    subscribers: OnceCell<DataLoader<SubscribersByAuthorLoader, HashMapCache>>,
}

impl RequestLoaders {
    /// Look up the registry attached to the current request
    pub fn from_context<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a RequestLoaders> {
        ctx.data::<RequestLoaders>()
    }

    pub fn profiles(&self) -> &DataLoader<ProfileByUserLoader, HashMapCache> {
        self.profiles
            .get_or_init(|| self.build(ProfileByUserLoader::new(self.store.clone())))
    }

    pub fn posts(&self) -> &DataLoader<PostsByAuthorLoader, HashMapCache> {
        self.posts
            .get_or_init(|| self.build(PostsByAuthorLoader::new(self.store.clone())))
    }

    pub fn member_types(&self) -> &DataLoader<MemberTypeLoader, HashMapCache> {
        self.member_types
            .get_or_init(|| self.build(MemberTypeLoader::new(self.store.clone())))
    }

    pub fn subscribed_authors(&self) -> &DataLoader<AuthorsBySubscriberLoader, HashMapCache> {
        self.subscribed_authors
            .get_or_init(|| self.build(AuthorsBySubscriberLoader::new(self.store.clone())))
    }

    pub fn subscribers(&self) -> &DataLoader<SubscribersByAuthorLoader, HashMapCache> {
        self.subscribers
            .get_or_init(|| self.build(SubscribersByAuthorLoader::new(self.store.clone())))
    }

    fn build<T>(&self, loader: T) -> DataLoader<T, HashMapCache>
    where
        T: Send + Sync + 'static,
    {
        DataLoader::with_cache(loader, tokio::spawn, HashMapCache::default())
            .delay(self.settings.delay)
            .max_batch_size(self.settings.max_batch_size)
    }
}
