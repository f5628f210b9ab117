//! GraphQL schema and resolvers for Memberhub
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for member types, users, profiles and posts
//! - Mutation resolvers for CRUD and subscriptions
//! - Type definitions with batched relationship resolvers
//! - Request-scoped DataLoaders

pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use loaders::{LoaderFactory, LoaderSettings, RequestLoaders};
pub use schema::{build_schema, AppSchema, GraphQLState, SchemaBuilder};
