//! Bucket index over document B's fragments: `sketch_key -> [FragmentId]`.
//! Read-only after construction, shared by reference across workers
//! during the match stage.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::model::{Fragment, FragmentId};

/// Candidate fragment ids sharing a bucket rarely number more than a
/// handful, so the per-bucket vector is inline up to 8 before spilling.
type Bucket = SmallVec<[FragmentId; 8]>;

/// A read-only lookup from sketch key to the ids of document-B fragments
/// carrying that key.
pub struct BucketIndex {
    buckets: FxHashMap<u32, Bucket>,
}

impl BucketIndex {
    /// Insert every B fragment under each of its sketch keys.
    pub fn build(fragments: &[Fragment]) -> Self {
        let mut buckets: FxHashMap<u32, Bucket> = FxHashMap::default();
        for fragment in fragments {
            for &key in &fragment.sketch_keys {
                buckets.entry(key).or_default().push(fragment.id);
            }
        }
        Self { buckets }
    }

    /// Union the candidate fragment ids of all of `a`'s sketch keys,
    /// de-duplicated by [`FragmentId`] and order-preserving.
    pub fn candidates_for(&self, sketch_keys: &[u32]) -> Vec<FragmentId> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut out = Vec::new();
        for key in sketch_keys {
            if let Some(bucket) = self.buckets.get(key) {
                for &id in bucket {
                    if seen.insert(id) {
                        out.push(id);
                    }
                }
            }
        }
        out
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
