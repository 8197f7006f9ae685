//! Cursors and iterators over a [`Tree`][crate::Tree].
//!
//! All traversal is driven by the in-order successor of a node, computed from the
//! node's child and parent links alone, so walking the tree needs no auxiliary
//! stack:
//!
//! 1. If the node has a right child, the successor is the leftmost node of that
//!    right subtree.
//! 2. Otherwise walk up the parent links until arriving from a left child. That
//!    parent is the successor. Running out of parents means there is no successor.
//!
//! # Examples
//!
//! ```
//! use bst_map::Tree;
//!
//! let tree: Tree<_, _> = [(8, 0), (3, 1), (9, 1), (1, 900)].into_iter().collect();
//!
//! let mut cursor = tree.begin();
//! let mut keys = Vec::new();
//! while cursor != tree.end() {
//!     keys.push(*cursor.key().unwrap());
//!     cursor.move_next();
//! }
//! assert_eq!(keys, [1, 3, 8, 9]);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use crate::node::{Link, Node};

/// Returns the node following `node` in key order, if any.
fn successor<K, V>(node: &Node<K, V>) -> Option<&Node<K, V>> {
    if let Some(right) = node.right() {
        return Some(right.leftmost());
    }

    let mut child = node;
    let mut parent = node.parent();
    while let Some(p) = parent {
        if p.left().map_or(false, |left| ptr::eq(left, child)) {
            return Some(p);
        }
        child = p;
        parent = p.parent();
    }
    None
}

/// A read-only position in a [`Tree`][crate::Tree]: either a node or the end of the sequence.
///
/// Cursors compare by node identity, not by the contents of the node. The tree stays borrowed
/// for as long as a cursor exists, so it can't be restructured under it.
pub struct Cursor<'a, K, V> {
    current: Option<&'a Node<K, V>>,
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, K, V> Copy for Cursor<'a, K, V> {}

impl<'a, K, V> PartialEq for Cursor<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self.current, other.current) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}
impl<'a, K, V> Eq for Cursor<'a, K, V> {}

impl<'a, K, V> fmt::Debug for Cursor<'a, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(current: Option<&'a Node<K, V>>) -> Self {
        Self { current }
    }

    pub(crate) fn end() -> Self {
        Self { current: None }
    }

    /// Whether this cursor is past the last node.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The node under the cursor.
    pub fn node(&self) -> Option<&'a Node<K, V>> {
        self.current
    }

    /// The key/value pair under the cursor, or `None` at the end.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.current.map(Node::data)
    }

    /// The key under the cursor, or `None` at the end.
    pub fn key(&self) -> Option<&'a K> {
        self.current.map(Node::key)
    }

    /// The value under the cursor, or `None` at the end.
    pub fn value(&self) -> Option<&'a V> {
        self.current.map(Node::value)
    }

    /// Advances to the next node in key order. Does nothing once at the end.
    pub fn move_next(&mut self) {
        self.current = self.current.and_then(successor);
    }

    /// A cursor at the next node in key order, leaving `self` where it is.
    #[must_use]
    pub fn successor(&self) -> Self {
        let mut next = *self;
        next.move_next();
        next
    }
}

/// A position in a [`Tree`][crate::Tree] allowing the value to be changed. Returned by
/// [`Tree::insert`][crate::Tree::insert], so it always refers to a node.
pub struct CursorMut<'a, K, V> {
    node: NonNull<Node<K, V>>,
    _marker: PhantomData<&'a mut Node<K, V>>,
}

impl<'a, K, V> fmt::Debug for CursorMut<'a, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.node().data()).finish()
    }
}

impl<'a, K, V> CursorMut<'a, K, V> {
    /// # Safety
    ///
    /// `node` must be a live node of a tree that is mutably borrowed for `'a`.
    pub(crate) unsafe fn new(node: NonNull<Node<K, V>>) -> Self {
        Self {
            node,
            _marker: PhantomData,
        }
    }

    fn node(&self) -> &Node<K, V> {
        // SAFETY: `new` guarantees a live node, and the tree is exclusively borrowed through us.
        unsafe { self.node.as_ref() }
    }

    /// The key under the cursor.
    pub fn key(&self) -> &K {
        self.node().key()
    }

    /// The value under the cursor.
    pub fn value(&self) -> &V {
        self.node().value()
    }

    /// The value under the cursor, mutably.
    pub fn value_mut(&mut self) -> &mut V {
        // SAFETY: See `node`. `&mut self` makes this the only reference handed out.
        unsafe { self.node.as_mut() }.data_mut().1
    }

    /// Converts the cursor into a mutable reference to its value that lives as long as the
    /// borrow of the tree.
    pub fn into_value_mut(mut self) -> &'a mut V {
        // SAFETY: See `node`. Consuming `self` hands its exclusive borrow to the caller.
        unsafe { self.node.as_mut() }.data_mut().1
    }

    /// A read-only cursor at the same node.
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(Some(self.node()))
    }

    /// Converts into a read-only cursor at the same node that can keep walking the tree.
    pub fn into_cursor(self) -> Cursor<'a, K, V> {
        // SAFETY: See `new`. Giving up `self` downgrades the exclusive borrow to a shared one.
        Cursor::new(Some(unsafe { self.node.as_ref() }))
    }
}

/// An iterator over the entries of a [`Tree`][crate::Tree] in key order.
///
/// Created by [`Tree::iter`][crate::Tree::iter].
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> fmt::Debug for Iter<'a, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(begin: Cursor<'a, K, V>, len: usize) -> Self {
        Self {
            cursor: begin,
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.get()?;
        self.cursor.move_next();
        self.remaining = self.remaining.saturating_sub(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// An owning iterator over the entries of a [`Tree`][crate::Tree] in key order.
///
/// Created by the `into_iter` method on `Tree`. Nodes are freed as they are yielded.
pub struct IntoIter<K, V> {
    /// Nodes whose key hasn't been yielded yet but whose left subtree has. The next entry is on
    /// top.
    stack: Vec<Box<Node<K, V>>>,
    remaining: usize,
}

impl<K, V> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(root: Link<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Link<K, V>) {
        while let Some(mut node) = link.take_box() {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        let right = node.right.take();
        self.push_left_spine(right);
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.into_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}
