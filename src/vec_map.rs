use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// The trait that must be implemented by keys in an `VecMap`
pub trait NumericId: Copy {
    fn to_index(self) -> usize;
}

/// A dense map from (numeric id) keys to values
///
/// It's a convenience wrapper type around a `Vec<V>`
#[derive(Debug, Clone)]
pub struct VecMap<K: NumericId, V> {
    pub _marker: PhantomData<fn(K)>,
    pub inner: Vec<V>,
}

impl<K: NumericId, V> Index<K> for VecMap<K, V> {
    type Output = V;

    #[inline]
    fn index(&self, index: K) -> &Self::Output {
        &self.inner[index.to_index()]
    }
}

impl<K: NumericId, V> IndexMut<K> for VecMap<K, V> {
    #[inline]
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.inner[index.to_index()]
    }
}

impl<K: NumericId, V> Default for VecMap<K, V> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<K: NumericId, V> VecMap<K, V> {
    pub fn new(inner: Vec<V>) -> Self {
        Self {
            _marker: PhantomData,
            inner,
        }
    }

    /// `len` copies of `value`
    pub fn filled(len: usize, value: V) -> Self
    where
        V: Clone,
    {
        Self::new(vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Like indexing, but `None` for keys past the end
    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        self.inner.get(key.to_index())
    }

    /// Append the value for the next key
    pub fn push(&mut self, value: V) {
        self.inner.push(value);
    }
}
