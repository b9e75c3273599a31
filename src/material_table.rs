//! Open-addressed, quadratic-probed string→id table mapping material names
//! to their 1-based position in the parsed material list.
//!
//! Grounded on `tinyobj_material_table_t` / `hash_table_insert_value` /
//! `hash_table_maybe_grow` in the reference implementation. The reference
//! uses DJB2-hashed entries chained via raw `next` pointers rebuilt on every
//! grow; `SPEC_FULL.md` calls that out as a redesign point for a safe port,
//! so this table instead keeps one `Vec<Option<Entry>>` slot array with a
//! plain quadratic probe — no pointers, no unsafe, same growth policy and
//! the same O(1) amortized `set`/`get`.

const DEFAULT_CAPACITY: usize = 10;

fn djb2(name: &str) -> u64 {
    let mut hash: u64 = 5381;
    for &b in name.as_bytes() {
        hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(b as u64);
    }
    hash
}

#[derive(Clone, Debug)]
struct Entry {
    hash: u64,
    name: String,
    value: i64,
}

/// Maps material names to their 1-based position in the material list (or
/// any other caller-chosen `i64` payload).
#[derive(Clone, Debug)]
pub struct MaterialTable {
    slots: Vec<Option<Entry>>,
    len: usize,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Quadratic probe: `(start + i*i) mod capacity`, `i` starting at 1.
    /// Returns the slot index to use for `hash`, stopping at either a free
    /// slot or a slot already holding this exact hash (linear scan bounded
    /// by capacity, matching the reference's "give up after `capacity`
    /// probes" behavior).
    fn probe(&self, hash: u64, find_existing: bool) -> Option<usize> {
        let capacity = self.slots.len() as u64;
        let start = (hash % capacity) as usize;
        if match &self.slots[start] {
            None => !find_existing,
            Some(e) => find_existing && e.hash == hash,
        } {
            return Some(start);
        }

        let mut i: u64 = 1;
        while i < capacity {
            let idx = ((hash % capacity) + i * i) % capacity;
            let idx = idx as usize;
            match &self.slots[idx] {
                None if !find_existing => return Some(idx),
                Some(e) if find_existing && e.hash == hash => return Some(idx),
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn grow_to_fit(&mut self, new_n: usize) {
        if new_n <= self.slots.len() {
            return;
        }
        let new_capacity = 2 * (2 * self.slots.len()).max(new_n);
        let mut grown = Self::with_capacity(new_capacity);
        for entry in self.slots.drain(..).flatten() {
            grown.insert_entry(entry);
        }
        *self = grown;
    }

    fn insert_entry(&mut self, entry: Entry) {
        let hash = entry.hash;
        if let Some(idx) = self.probe(hash, false) {
            self.slots[idx] = Some(entry);
            self.len += 1;
        }
    }

    /// Looks up `name`, returning its stored value if present.
    pub fn get(&self, name: &str) -> Option<i64> {
        let hash = djb2(name);
        self.probe(hash, true)
            .and_then(|idx| self.slots[idx].as_ref())
            .filter(|e| e.name == name)
            .map(|e| e.value)
    }

    /// Inserts or overwrites `name`'s value, growing the table first if
    /// the insert would not otherwise fit.
    pub fn set(&mut self, name: &str, value: i64) {
        let hash = djb2(name);
        if let Some(idx) = self.probe(hash, true) {
            if let Some(e) = self.slots[idx].as_mut().filter(|e| e.name == name) {
                e.value = value;
                return;
            }
        }

        self.grow_to_fit(self.len + 1);
        let entry = Entry {
            hash,
            name: name.to_string(),
            value,
        };
        loop {
            if let Some(idx) = self.probe(hash, false) {
                self.slots[idx] = Some(entry);
                self.len += 1;
                return;
            }
            self.grow_to_fit(self.slots.len() + 1);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_then_get_roundtrips() {
        let mut t = MaterialTable::new();
        t.set("CubeMaterial", 1);
        assert_eq!(t.get("CubeMaterial"), Some(1));
        assert_eq!(t.get("missing"), None);
    }

    #[test]
    fn set_overwrites_existing_key() {
        let mut t = MaterialTable::new();
        t.set("red", 1);
        t.set("red", 2);
        assert_eq!(t.get("red"), Some(2));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn grows_past_default_capacity() {
        let mut t = MaterialTable::new();
        for i in 0..200i64 {
            t.set(&format!("material_{i}"), i);
        }
        assert_eq!(t.len(), 200);
        for i in 0..200i64 {
            assert_eq!(t.get(&format!("material_{i}")), Some(i));
        }
    }

    #[test]
    fn empty_table_reports_empty() {
        let t = MaterialTable::new();
        assert!(t.is_empty());
    }
}
