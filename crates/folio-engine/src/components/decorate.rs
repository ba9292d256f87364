use std::collections::BTreeMap;

/// A single merge applied to a style or data map.
///
/// Merges are either an upsert of several keys at once or the removal of one
/// key; both apply atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorateOp {
    Upsert(BTreeMap<String, String>),
    Remove(String),
}

impl DecorateOp {
    /// Upsert a single key
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Upsert(BTreeMap::from([(key.into(), value.into())]))
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove(key.into())
    }
}

/// Style and data decoration carried by every component
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoration {
    style: BTreeMap<String, String>,
    data: BTreeMap<String, String>,
}

impl Decoration {
    pub fn new(style: BTreeMap<String, String>, data: BTreeMap<String, String>) -> Self {
        Self { style, data }
    }

    pub fn style(&self) -> &BTreeMap<String, String> {
        &self.style
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// Apply a merge to the style map, returning whether anything changed
    pub fn merge_style(&mut self, op: DecorateOp) -> bool {
        merge(&mut self.style, op)
    }

    /// Apply a merge to the data map, returning whether anything changed
    pub fn merge_data(&mut self, op: DecorateOp) -> bool {
        merge(&mut self.data, op)
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_empty() && self.data.is_empty()
    }
}

fn merge(map: &mut BTreeMap<String, String>, op: DecorateOp) -> bool {
    match op {
        DecorateOp::Upsert(values) => {
            let mut changed = false;
            for (key, value) in values {
                if map.get(&key) != Some(&value) {
                    map.insert(key, value);
                    changed = true;
                }
            }
            changed
        }
        DecorateOp::Remove(key) => map.remove(&key).is_some(),
    }
}
