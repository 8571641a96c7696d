use super::handle::Handle;

/// One entry of the insertion-order chain.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Entry inserted just before this one.
    pub(crate) prev: Option<Handle>,
    /// Entry inserted just after this one.
    pub(crate) next: Option<Handle>,
}

impl<K, V> Node<K, V> {
    pub(crate) const fn new(key: K, value: V, prev: Option<Handle>) -> Self {
        Self {
            key,
            value,
            prev,
            next: None,
        }
    }

    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
