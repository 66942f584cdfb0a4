use im::{OrdMap, Vector};

pub trait OrDefault<K, V> {
    fn get_or_default(&self, item: &K) -> V;
}

impl<K, V> OrDefault<K, V> for OrdMap<K, V>
where
    K: Ord + Clone,
    V: Default + Clone,
{
    fn get_or_default(&self, item: &K) -> V {
        match self.get(item) {
            Some(v) => v.clone(),
            None => V::default(),
        }
    }
}

pub trait PushImmut<T> {
    fn push(&self, item: T) -> Vector<T>;
}
impl<T: Clone> PushImmut<T> for Vector<T> {
    fn push(&self, item: T) -> Vector<T> {
        let mut result = self.clone();
        result.push_back(item);
        result
    }
}

pub trait RemoveImmut<T> {
    fn remove_idx(&self, idx: usize) -> Vector<T>;
}
impl<T: Clone> RemoveImmut<T> for Vector<T> {
    fn remove_idx(&self, idx: usize) -> Vector<T> {
        let mut result = self.clone();
        result.remove(idx);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use im::{ordmap, vector};

    #[test]
    fn push_leaves_original_untouched() {
        let original = vector![1, 2];
        let pushed = original.push(3);
        assert_eq!(original, vector![1, 2]);
        assert_eq!(pushed, vector![1, 2, 3]);
    }

    #[test]
    fn remove_idx_leaves_original_untouched() {
        let original = vector!["a", "b", "c"];
        let removed = original.remove_idx(1);
        assert_eq!(original, vector!["a", "b", "c"]);
        assert_eq!(removed, vector!["a", "c"]);
    }

    #[test]
    fn missing_key_yields_default() {
        let map: OrdMap<&str, Vector<u8>> = ordmap! {"a" => vector![1]};
        assert_eq!(map.get_or_default(&"a"), vector![1]);
        assert_eq!(map.get_or_default(&"b"), Vector::new());
    }
}
