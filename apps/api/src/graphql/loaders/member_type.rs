//! Member type DataLoader

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{MemberType, MemberTypeId};
use crate::repositories::SharedStore;

use super::shared_error;

/// DataLoader for batching `Profile.memberType` lookups
#[derive(Clone)]
pub struct MemberTypeLoader {
    store: SharedStore,
}

impl MemberTypeLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<MemberTypeId> for MemberTypeLoader {
    type Value = Option<MemberType>;
    type Error = Arc<ApiError>;

    async fn load(
        &self,
        keys: &[MemberTypeId],
    ) -> Result<HashMap<MemberTypeId, Self::Value>, Self::Error> {
        tracing::debug!(keys = keys.len(), "Batch loading member types");

        let member_types = self
            .store
            .member_types_by_ids(keys)
            .await
            .map_err(shared_error)?;

        let mut result: HashMap<MemberTypeId, Option<MemberType>> =
            keys.iter().map(|key| (*key, None)).collect();
        for member_type in member_types {
            result.insert(member_type.id, Some(member_type));
        }

        Ok(result)
    }
}
