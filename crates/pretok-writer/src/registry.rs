//! Persistent identifier IDs and the identifier tables.
//!
//! Identifier-like tokens carry a dense 1-based persistent ID in their
//! token records; ID 0 means "no identifier". The registry assigns IDs in
//! first-resolved order and, at the end of the run, emits both directions
//! of the mapping: a name-keyed hash table (name -> ID) and a dense table
//! (ID -> on-disk name offset). One traversal produces both: emitting a
//! hash table key records where its name bytes landed, and those offsets
//! are exactly what the dense table needs.

use indexmap::IndexMap;

use pretok_core::{Ident, IdentTable};
use pretok_format::{bernstein_hash, BitWriter, HashTableBuilder, TableInfo};

/// Assigns persistent IDs and emits the identifier tables.
#[derive(Default)]
pub struct IdentifierRegistry {
    ids: IndexMap<Ident, u32>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The persistent ID for `ident`, assigning the next one on first
    /// sight. `None` maps to the reserved ID 0.
    pub fn resolve(&mut self, ident: Option<Ident>) -> u32 {
        let Some(ident) = ident else {
            return 0;
        };
        if let Some(&id) = self.ids.get(&ident) {
            return id;
        }
        // Pre-increment: the first assigned ID is 1, 0 stays reserved.
        let id = self.ids.len() as u32 + 1;
        self.ids.insert(ident, id);
        id
    }

    /// Number of assigned IDs.
    pub fn id_count(&self) -> u32 {
        self.ids.len() as u32
    }

    /// Emit the name-keyed hash table, then the dense ID-to-name-offset
    /// table. Returns `(id_table_offset, name_directory_offset)`.
    pub fn emit_tables(&self, out: &mut BitWriter, table: &IdentTable) -> (u32, u32) {
        // Slot i holds the identifier with persistent ID i + 1. IDs are
        // assigned in insertion order, so the map's order is the dense
        // order already.
        let slots = self
            .ids
            .keys()
            .map(|&ident| IdSlot {
                ident,
                name_offset: 0,
            })
            .collect();

        let mut builder = HashTableBuilder::new(IdentTableInfo { table, slots });
        for (slot, (_, &id)) in self.ids.iter().enumerate() {
            debug_assert_eq!(slot as u32 + 1, id);
            builder.insert(slot as u32, id);
        }

        let name_directory = builder.emit(out);

        let id_table = out.tell();
        out.emit_u32(self.ids.len() as u32);
        for slot in &builder.info().slots {
            out.emit_u32(slot.name_offset);
        }

        (id_table, name_directory)
    }
}

struct IdSlot {
    ident: Ident,
    /// Where this identifier's name bytes landed, recorded during key
    /// emission and consumed by the dense table.
    name_offset: u32,
}

struct IdentTableInfo<'a> {
    table: &'a IdentTable,
    slots: Vec<IdSlot>,
}

impl TableInfo for IdentTableInfo<'_> {
    /// Slot index into the dense array.
    type Key = u32;
    /// Persistent ID.
    type Value = u32;

    fn hash(&self, key: &u32) -> u32 {
        bernstein_hash(self.table.name(self.slots[*key as usize].ident).as_bytes())
    }

    fn emit_key_value_lengths(
        &mut self,
        out: &mut BitWriter,
        key: &u32,
        _value: &u32,
    ) -> (u32, u32) {
        // Values are fixed 4-byte IDs: no value-length byte on disk.
        let n = self.table.name(self.slots[*key as usize].ident).len() as u32 + 1;
        out.emit_u16(n);
        (n, 4)
    }

    fn emit_key(&mut self, out: &mut BitWriter, key: &u32, _key_len: u32) {
        let slot = &mut self.slots[*key as usize];
        slot.name_offset = out.tell();
        out.emit_bytes(self.table.name(slot.ident).as_bytes());
        out.emit_u8(0);
    }

    fn emit_value(&mut self, out: &mut BitWriter, _key: &u32, value: &u32, _value_len: u32) {
        out.emit_u32(*value);
    }
}
