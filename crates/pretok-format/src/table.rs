//! Generic chained on-disk hash table builder.
//!
//! All three PTH tables (identifier-keyed, ID-keyed, file-keyed) share this
//! emission scheme: a payload region of per-bucket entry runs, then a
//! 4-byte-aligned directory of `u32 bucket_count, u32 entry_count,
//! u32[bucket_count] bucket_offsets`. Readers locate a key by hashing it,
//! indexing the directory, and scanning the bucket's run.

use crate::BitWriter;

/// Per-table encoding policy.
///
/// The builder owns hashing-independent structure (buckets, chains, the
/// directory); the trait owns everything key- and value-shaped. Methods take
/// `&mut self` so an implementation can record on-disk offsets while its
/// keys are emitted; the identifier table uses this to fill its dense
/// ID-to-name-offset array during the same traversal.
pub trait TableInfo {
    type Key;
    type Value;

    fn hash(&self, key: &Self::Key) -> u32;

    /// Write this entry's length header and return `(key_len, value_len)`.
    ///
    /// The header layout is table-specific: a table with fixed-width values
    /// may omit the value length entirely. Whatever is written here, the
    /// returned lengths must equal the byte counts that `emit_key` and
    /// `emit_value` will produce.
    fn emit_key_value_lengths(
        &mut self,
        out: &mut BitWriter,
        key: &Self::Key,
        value: &Self::Value,
    ) -> (u32, u32);

    fn emit_key(&mut self, out: &mut BitWriter, key: &Self::Key, key_len: u32);

    fn emit_value(&mut self, out: &mut BitWriter, key: &Self::Key, value: &Self::Value, value_len: u32);
}

struct Item<K, V> {
    key: K,
    value: V,
    hash: u32,
    next: Option<u32>,
}

#[derive(Clone, Copy, Default)]
struct Bucket {
    head: Option<u32>,
    len: u32,
    disk_offset: u32,
}

/// Chained-bucket hash table builder.
///
/// Entries live in one arena vector for the builder's lifetime; bucket heads
/// and chain links are raw indices into it. Insertion is at the chain head,
/// and the bucket array is rebuilt from the arena on resize, so a bucket's
/// chain is always exactly reverse insertion order. That order is observable
/// on disk and covered by tests; do not change it.
pub struct HashTableBuilder<I: TableInfo> {
    info: I,
    items: Vec<Item<I::Key, I::Value>>,
    buckets: Vec<Bucket>,
}

const INITIAL_BUCKETS: usize = 64;

impl<I: TableInfo> HashTableBuilder<I> {
    pub fn new(info: I) -> Self {
        Self {
            info,
            items: Vec::new(),
            buckets: vec![Bucket::default(); INITIAL_BUCKETS],
        }
    }

    pub fn info(&self) -> &I {
        &self.info
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn insert(&mut self, key: I::Key, value: I::Value) {
        let hash = self.info.hash(&key);
        let idx = self.items.len() as u32;
        self.items.push(Item {
            key,
            value,
            hash,
            next: None,
        });

        if 4 * self.items.len() >= 3 * self.buckets.len() {
            self.rebuild(self.buckets.len() * 2);
        } else {
            self.link(idx);
        }
    }

    fn link(&mut self, idx: u32) {
        let mask = (self.buckets.len() - 1) as u32;
        let bucket = &mut self.buckets[(self.items[idx as usize].hash & mask) as usize];
        self.items[idx as usize].next = bucket.head;
        bucket.head = Some(idx);
        bucket.len += 1;
    }

    fn rebuild(&mut self, new_size: usize) {
        debug_assert!(new_size.is_power_of_two());
        self.buckets = vec![Bucket::default(); new_size];
        for idx in 0..self.items.len() as u32 {
            self.link(idx);
        }
    }

    /// Serialize the table and return the absolute offset of its directory.
    ///
    /// Layout: for every non-empty bucket in index order, a `u16` entry
    /// count followed by the bucket's entries (`u32 hash`, the trait's
    /// length header, key bytes, value bytes), entries in reverse insertion
    /// order. Then 4-byte padding and the directory. Empty buckets record
    /// offset 0 in the directory.
    pub fn emit(&mut self, out: &mut BitWriter) -> u32 {
        for b in 0..self.buckets.len() {
            if self.buckets[b].head.is_none() {
                continue;
            }
            self.buckets[b].disk_offset = out.tell();
            out.emit_u16(self.buckets[b].len);

            let mut cursor = self.buckets[b].head;
            while let Some(idx) = cursor {
                let item = &self.items[idx as usize];
                out.emit_u32(item.hash);
                let (key_len, value_len) =
                    self.info.emit_key_value_lengths(out, &item.key, &item.value);
                self.info.emit_key(out, &item.key, key_len);
                self.info.emit_value(out, &item.key, &item.value, value_len);
                cursor = item.next;
            }
        }

        out.pad_to(4);
        let directory = out.tell();
        out.emit_u32(self.buckets.len() as u32);
        out.emit_u32(self.items.len() as u32);
        for bucket in &self.buckets {
            out.emit_u32(bucket.disk_offset);
        }
        directory
    }
}
