//! The storage unit of a [`Tree`][crate::Tree].
//!
//! A [`Node`] owns its two children through [`Link`]s and observes its parent
//! through a plain pointer. Only the owning links ever free memory; the parent
//! pointer is just a way back up for in-order successor lookups and for
//! detaching a node during `erase`.

use std::fmt;
use std::ptr::NonNull;

/// An owning link to a child (or to the root, when held by the tree).
///
/// This is a raw pointer instead of a `Box` so that moving a `Link` (or the
/// `Tree` holding it) never invalidates the children's parent pointers.
/// Dropping a `Link` frees the whole subtree beneath it.
pub(crate) struct Link<K, V>(pub(crate) Option<NonNull<Node<K, V>>>);

/// A non-owning pointer to the node holding the [`Link`] that owns this one.
/// `None` for the root.
pub(crate) type Parent<K, V> = Option<NonNull<Node<K, V>>>;

impl<K, V> Default for Link<K, V> {
    fn default() -> Self {
        Self(None)
    }
}

impl<K, V> Drop for Link<K, V> {
    fn drop(&mut self) {
        // Free the subtree with an explicit stack so a degenerate (list shaped)
        // tree can't blow the call stack.
        let mut pending: Vec<_> = self.take_box().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take_box());
            pending.extend(node.right.take_box());
        }
    }
}

impl<K, V> Link<K, V> {
    pub(crate) fn ptr(&self) -> Option<NonNull<Node<K, V>>> {
        self.0
    }

    pub(crate) fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub(crate) fn get(&self) -> Option<&Node<K, V>> {
        // SAFETY: A non-empty `Link` always points to a live node allocated by `Node::leak` and
        // owned by this link alone. The returned reference borrows `self`, so the node can't be
        // freed through this link while it is in use.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    pub(crate) fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    /// Releases ownership of the pointed-to node as a `Box`, leaving this link empty. The
    /// node's own children stay attached to it.
    pub(crate) fn take_box(&mut self) -> Option<Box<Node<K, V>>> {
        // SAFETY: The pointer came from `Box::leak` in `Node::leak` and this link was its only
        // owner. Taking it out of the link means nobody else will rebuild a `Box` from it.
        self.0
            .take()
            .map(|ptr| unsafe { Box::from_raw(ptr.as_ptr()) })
    }

    pub(crate) fn into_box(mut self) -> Option<Box<Node<K, V>>> {
        self.take_box()
    }
}

/// A single key/value entry of a [`Tree`][crate::Tree] together with its links to the
/// surrounding nodes.
///
/// `Node`s are only ever handed out by shared reference, so the accessors below are
/// read-only. They are enough to walk the structure of a tree, which is what the
/// [`Diagram`][crate::Diagram] printer does.
///
/// # Examples
///
/// ```
/// use bst_map::Tree;
///
/// let mut tree = Tree::new();
/// tree.insert((8, "eight"));
/// tree.insert((3, "three"));
/// tree.insert((1, "one"));
///
/// let root = tree.root().unwrap();
/// assert_eq!(root.data(), (&8, &"eight"));
/// assert!(root.parent().is_none());
///
/// let three = root.left().unwrap();
/// assert_eq!(three.key(), &3);
/// assert_eq!(three.parent().map(|n| n.key()), Some(&8));
/// assert!(root.right().is_none());
///
/// assert_eq!(root.leftmost().key(), &1);
/// ```
pub struct Node<K, V> {
    key: K,
    value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) parent: Parent<K, V>,
}

impl<K, V> fmt::Debug for Node<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<K, V> Node<K, V> {
    fn new_boxed(key: K, value: V, parent: Parent<K, V>) -> Box<Self> {
        Box::new(Node {
            key,
            left: Link(None),
            parent,
            right: Link(None),
            value,
        })
    }

    /// Allocates a childless node and gives up the `Box`. The caller must store the returned
    /// pointer in exactly one [`Link`].
    pub(crate) fn leak(key: K, value: V, parent: Parent<K, V>) -> NonNull<Self> {
        NonNull::from(Box::leak(Self::new_boxed(key, value, parent)))
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value stored in this node.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The key/value pair stored in this node.
    pub fn data(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// The key/value pair stored in this node with the value mutable. The key stays
    /// read-only since changing it could break the ordering of the tree.
    pub(crate) fn data_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    /// The root of the left subtree, holding keys that order before this one.
    pub fn left(&self) -> Option<&Self> {
        self.left.get()
    }

    /// The root of the right subtree, holding keys that order after this one.
    pub fn right(&self) -> Option<&Self> {
        self.right.get()
    }

    /// The node owning this one, or `None` for the root of the tree.
    pub fn parent(&self) -> Option<&Self> {
        // SAFETY: The parent owns `self` through one of its links, so it lives at least as long
        // as `self` does. Nodes are only handed out by shared reference while the tree is
        // borrowed, so nothing can mutate the parent while this reference exists.
        unsafe { self.parent.as_ref().map(|ptr| ptr.as_ref()) }
    }

    /// Follows left children from `self` until there are none left. The node reached holds the
    /// smallest key of the subtree rooted at `self`.
    pub fn leftmost(&self) -> &Self {
        let mut node = self;
        while let Some(left) = node.left() {
            node = left;
        }
        node
    }

    /// Unwraps the node into its key and value, freeing any children still attached.
    pub(crate) fn into_pair(self: Box<Self>) -> (K, V) {
        let Node { key, value, .. } = *self;
        (key, value)
    }

    /// Deep copies the subtree rooted at `self`. Every copied child points at its copied parent;
    /// the copy of `self` has no parent since only the caller knows where it will be attached.
    pub(crate) fn deep_copy(&self) -> Link<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let root = Self::leak(self.key.clone(), self.value.clone(), None);
        // Owned from here on so a panicking `clone` frees what was copied so far.
        let copy = Link(Some(root));

        let mut pending = vec![(self, root)];
        while let Some((source, mut target)) = pending.pop() {
            // SAFETY: `target` was just allocated by `leak` above (or in an earlier iteration) and
            // is owned by `copy`. No other reference to it exists.
            let target_node = unsafe { target.as_mut() };

            if let Some(left) = source.left() {
                let new_left = Self::leak(left.key.clone(), left.value.clone(), Some(target));
                target_node.left = Link(Some(new_left));
                pending.push((left, new_left));
            }
            if let Some(right) = source.right() {
                let new_right = Self::leak(right.key.clone(), right.value.clone(), Some(target));
                target_node.right = Link(Some(new_right));
                pending.push((right, new_right));
            }
        }

        copy
    }
}
