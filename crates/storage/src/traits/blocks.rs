use async_trait::async_trait;
use flowdex_types::Block;

use crate::ResourceIndex;

#[async_trait]
pub trait BlocksIndex: ResourceIndex<Block> {
    /// Height of the highest indexed block, `None` when no block was indexed yet.
    async fn last_indexed_height(&self) -> Option<u64> {
        self.find_all().await.iter().map(|block| block.height).max()
    }
}
