//! Tree materializer: turns partitioner buckets into folders.
//!
//! Folders are created one at a time in bucket order, so sibling indices are
//! gap-free regardless of how the storage schedules work. Each bucket's moves
//! are issued together and joined before the next bucket starts; the call
//! resolves only once every folder exists and every move has landed.

use futures::future::try_join_all;
use tracing::debug;

use crate::managers::bookmark_tree::BookmarkTree;
use crate::types::bookmark::{CreateDetails, MoveDestination};
use crate::types::bucket::Bucket;
use crate::types::errors::StorageError;

/// Creates one folder per bucket under `parent_id` and moves each bucket's
/// items into it at indices `0..n`. Returns the created folder ids in bucket order.
///
/// # Errors
/// The first storage fault aborts the call; folders and moves already done stay.
pub async fn materialize(
    tree: &dyn BookmarkTree,
    parent_id: &str,
    buckets: &[Bucket],
) -> Result<Vec<String>, StorageError> {
    let mut folder_ids = Vec::with_capacity(buckets.len());

    for (slot, bucket) in buckets.iter().enumerate() {
        let folder = tree
            .create(CreateDetails::folder(parent_id, &bucket.label, Some(slot as i32)))
            .await?;

        let moves = bucket.item_ids().into_iter().enumerate().map(|(index, id)| {
            tree.move_node(id, MoveDestination::new(&folder.id, index as i32))
        });
        try_join_all(moves).await?;

        debug!(
            parent = parent_id,
            folder = %folder.id,
            label = %bucket.label,
            granularity = ?bucket.granularity,
            items = bucket.len(),
            "bucket materialized"
        );
        folder_ids.push(folder.id);
    }

    Ok(folder_ids)
}
