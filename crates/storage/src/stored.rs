use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resource together with the timestamps managed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored<R> {
    #[serde(flatten)]
    pub resource: R,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<R> Stored<R> {
    pub(crate) fn new(resource: R, now: DateTime<Utc>) -> Self {
        Self {
            resource,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_inner(self) -> R {
        self.resource
    }
}

impl<R> Deref for Stored<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

impl<R> DerefMut for Stored<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.resource
    }
}
