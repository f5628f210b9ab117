//! GraphQL schema builder for Memberhub
//!
//! This module provides the schema construction for the async-graphql API and
//! [`GraphQLState`], which runs requests against the schema with a fresh loader
//! registry attached to each one.

use async_graphql::{EmptySubscription, Request, Response, Schema};

use crate::config::{MutationFailurePolicy, DEFAULT_DEPTH_LIMIT};
use crate::repositories::SharedStore;

use super::loaders::{LoaderFactory, LoaderSettings};
use super::mutation::Mutation;
use super::query::Query;

/// The Memberhub GraphQL schema type
pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builder for constructing the GraphQL schema with required services
pub struct SchemaBuilder {
    store: SharedStore,
    depth_limit: usize,
    failure_policy: MutationFailurePolicy,
}

impl SchemaBuilder {
    /// Create a new schema builder over the given store
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            depth_limit: DEFAULT_DEPTH_LIMIT,
            failure_policy: MutationFailurePolicy::default(),
        }
    }

    /// Set the maximum nesting of selection sets
    pub fn depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    /// Set how change/delete/subscribe mutations report store failures
    pub fn failure_policy(mut self, policy: MutationFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Build the schema with all configured services
    pub fn build(self) -> AppSchema {
        Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .data(self.store)
            .data(self.failure_policy)
            .limit_depth(self.depth_limit)
            .finish()
    }
}

/// Create a new GraphQL schema over the given store
///
/// This is a convenience function for quickly creating a schema with the
/// default depth limit and failure policy.
pub fn build_schema(store: SharedStore) -> AppSchema {
    SchemaBuilder::new(store).build()
}

/// Schema plus the factory that supplies each request with its loaders
#[derive(Clone)]
pub struct GraphQLState {
    schema: AppSchema,
    loaders: LoaderFactory,
}

impl GraphQLState {
    pub fn new(schema: AppSchema, loaders: LoaderFactory) -> Self {
        Self { schema, loaders }
    }

    /// Build schema and loader factory from one store handle
    pub fn from_store(
        store: SharedStore,
        depth_limit: usize,
        failure_policy: MutationFailurePolicy,
        settings: LoaderSettings,
    ) -> Self {
        let schema = SchemaBuilder::new(store.clone())
            .depth_limit(depth_limit)
            .failure_policy(failure_policy)
            .build();
        Self::new(schema, LoaderFactory::new(store, settings))
    }

    /// Execute one GraphQL request with its own loader registry
    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        let request = request.into().data(self.loaders.create());
        self.schema.execute(request).await
    }
}
