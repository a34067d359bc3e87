use std::borrow::Borrow;

/// A small map backed by a vector of key-value pairs that preserves insertion order.
///
/// Used for the handful of named robots in a match, where iteration order must be
/// the registration order and lookups by `&str` should not allocate.
#[derive(Clone, Debug)]
pub struct VecMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for VecMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> VecMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

impl<K, V> VecMap<K, V>
where
    K: PartialEq,
{
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries.iter().any(|(k, _)| k.borrow() == key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Inserts a key-value pair. An existing entry keeps its position and has its
    /// value replaced; the old value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.entries.iter().position(|(k, _)| k == &key) {
            Some(std::mem::replace(&mut self.entries[index].1, value))
        } else {
            self.entries.push((key, value));
            None
        }
    }
}

impl<K, V> FromIterator<(K, V)> for VecMap<K, V>
where
    K: PartialEq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut map: VecMap<String, i32> = VecMap::new();
        assert!(map.is_empty());

        map.insert("yellow".to_string(), 1);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("yellow"));
        assert_eq!(map.get("yellow"), Some(&1));
        assert_eq!(map.get("blue"), None);

        assert_eq!(map.insert("yellow".to_string(), 2), Some(1));
        assert_eq!(map.get("yellow"), Some(&2));

        *map.get_mut("yellow").unwrap() += 1;
        assert_eq!(map.get("yellow"), Some(&3));

        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut map = VecMap::new();
        map.insert("c", 3);
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 10);

        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);

        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, vec![3, 10, 2]);
    }

    #[test]
    fn test_from_iter_dedups_keys() {
        let map: VecMap<_, _> = vec![("x", 10), ("y", 20), ("x", 30)].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x"), Some(&30));
    }
}
