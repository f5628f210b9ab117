//! Test helper functions for API integration tests
//!
//! Provides utility functions for executing GraphQL documents and inspecting
//! their JSON responses.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_graphql::{Request, Variables};
use memberhub_api::graphql::GraphQLState;
use serde_json::Value;

/// Serializes tests that touch process environment variables
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Temporarily set environment variables for the duration of a test
///
/// Returns a guard that will restore the original values when dropped.
pub struct EnvGuard {
    original: HashMap<String, Option<String>>,
}

impl EnvGuard {
    /// Create a new environment guard that sets the given variables
    pub fn new(vars: &[(String, String)]) -> Self {
        let mut original = HashMap::new();

        for (key, value) in vars {
            original.insert(key.clone(), std::env::var(key).ok());
            std::env::set_var(key, value);
        }

        Self { original }
    }

    /// Create from a HashMap
    pub fn from_map(vars: &HashMap<String, String>) -> Self {
        let pairs: Vec<_> = vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        Self::new(&pairs)
    }

    /// Unset the given variables, restoring them on drop
    pub fn remove(keys: &[&str]) -> Self {
        let mut original = HashMap::new();
        for key in keys {
            original.insert(key.to_string(), std::env::var(key).ok());
            std::env::remove_var(key);
        }
        Self { original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.original {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

/// Execute a document and return the response as JSON
pub async fn execute(state: &GraphQLState, query: &str) -> Value {
    let response = state.execute(Request::new(query)).await;
    serde_json::to_value(&response).expect("response serializes")
}

/// Execute a document with variables and return the response as JSON
pub async fn execute_with(state: &GraphQLState, query: &str, variables: Value) -> Value {
    let request = Request::new(query).variables(Variables::from_json(variables));
    let response = state.execute(request).await;
    serde_json::to_value(&response).expect("response serializes")
}

/// Error list of a response, empty when absent
pub fn errors(response: &Value) -> Vec<Value> {
    response
        .get("errors")
        .and_then(|e| e.as_array())
        .cloned()
        .unwrap_or_default()
}

/// `extensions.code` of the first error
pub fn first_error_code(response: &Value) -> Option<String> {
    errors(response)
        .first()
        .and_then(|e| e.pointer("/extensions/code"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
}

/// Assert a response has no errors, printing them otherwise
pub fn assert_no_errors(response: &Value) {
    let errors = errors(response);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
}
