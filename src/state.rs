//! Shared server state.

use crate::knowledge::KnowledgeBaseFinder;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The knowledge base shared by every tool call.
///
/// Queries take the read lock and may run concurrently. Additions and
/// removals take the write lock, so a query never sees a document that is
/// only partially indexed.
#[derive(Debug, Default)]
pub struct KbState {
    finder: RwLock<KnowledgeBaseFinder>,
}

impl KbState {
    pub fn new(finder: KnowledgeBaseFinder) -> Self {
        Self {
            finder: RwLock::new(finder),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, KnowledgeBaseFinder> {
        self.finder.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, KnowledgeBaseFinder> {
        self.finder.write().await
    }
}
