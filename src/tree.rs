//! An unbalanced BST that rebuilds instead of splicing.
//!
//! Insertion is the textbook walk down to an empty link. Deletion is not: the
//! node is cut out of the tree and every entry of its two former subtrees is
//! inserted again from the root. Nothing keeps the tree balanced while it is
//! being modified; [`Tree::balance`] rebuilds it with logarithmic height on
//! request.
//!
//! # Examples
//!
//! ```
//! use bst_map::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.find(&1).is_end());
//!
//! let (_, added) = tree.insert((1, 2));
//! assert!(added);
//! assert_eq!(tree.get(&1), Some(&2));
//!
//! // Inserting an existing key doesn't overwrite its value.
//! let (cursor, added) = tree.insert((1, 3));
//! assert!(!added);
//! assert_eq!(cursor.value(), &2);
//!
//! // Erasing a node returns its value.
//! assert_eq!(tree.erase(&1), Ok(Some(2)));
//! assert_eq!(tree.get(&1), None);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;
use std::ptr::NonNull;

use compare::{Compare, Natural};
use tracing::{debug, trace};

use crate::diagram::Diagram;
use crate::error::{Error, Result};
use crate::iter::{Cursor, CursorMut, IntoIter, Iter};
use crate::node::{Link, Node};

/// An ordered map from unique keys to values, stored as a plain binary search tree.
///
/// Keys are ordered by the comparator `C`, which defaults to the keys' natural order.
pub struct Tree<K, V, C = Natural<K>> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that it can be moved around with the
    // `Tree` without the children's parent pointers breaking.
    root: Link<K, V>,
    len: usize,
    cmp: C,
}

impl<K: Ord, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Clone for Tree<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.get().map_or_else(Link::default, Node::deep_copy),
            len: self.len,
            cmp: self.cmp.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for Tree<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> fmt::Display for Tree<K, V, C>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Height of the tree is: {}", self.height())?;
        for (key, value) in self {
            write!(f, "[ key={} , value={} ] ", key, value)?;
        }
        Ok(())
    }
}

impl<K, V, C> PartialEq for Tree<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for Tree<K, V, C> {}

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Generates a new, empty `Tree` ordered by the natural order of its keys.
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }
}

impl<K, V, C> Tree<K, V, C> {
    /// Generates a new, empty `Tree` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::Tree;
    ///
    /// let mut tree = Tree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.emplace(1, "one");
    /// tree.emplace(3, "three");
    /// tree.emplace(2, "two");
    ///
    /// let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [3, 2, 1]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: Link::default(),
            len: 0,
            cmp,
        }
    }

    /// The comparator ordering this tree's keys.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The number of distinct keys in the tree.
    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of nodes on the longest path from the root down to a leaf. An empty tree has
    /// height 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.height(), 0);
    ///
    /// for key in 0..7 {
    ///     tree.emplace(key, ());
    /// }
    /// assert_eq!(tree.height(), 7);
    ///
    /// tree.balance();
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut pending: Vec<_> = self.root.get().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = pending.pop() {
            height = height.max(depth);
            pending.extend(node.left().map(|left| (left, depth + 1)));
            pending.extend(node.right().map(|right| (right, depth + 1)));
        }
        height
    }

    /// Drops every node of the tree.
    pub fn clear(&mut self) {
        self.root = Link::default();
        self.len = 0;
    }

    /// The root node, if the tree isn't empty.
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.get()
    }

    /// A cursor at the entry with the smallest key, or at the end if the tree is empty.
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.root.get().map(Node::leftmost))
    }

    /// The cursor one past the entry with the largest key. It never refers to a node and is
    /// only useful for comparing against other cursors.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::end()
    }

    /// Iterates over the entries of the tree in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.begin(), self.len)
    }

    /// A printable sideways drawing of the tree's shape.
    pub fn diagram(&self) -> Diagram<'_, K, V> {
        Diagram::new(self.root.get())
    }
}

impl<K, V, C> Tree<K, V, C>
where
    C: Compare<K>,
{
    /// Inserts the given key/value pair unless the key is already present, in which case the
    /// tree is left unchanged.
    ///
    /// Returns a cursor at the node holding the key and whether a new node was created.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// let (cursor, added) = tree.insert((8, 0));
    /// assert_eq!(cursor.key(), &8);
    /// assert!(added);
    ///
    /// let (mut cursor, added) = tree.insert((8, 1));
    /// assert!(!added);
    /// *cursor.value_mut() = 5;
    ///
    /// assert_eq!(tree.get(&8), Some(&5));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, (key, value): (K, V)) -> (CursorMut<'_, K, V>, bool) {
        let (node, added) = self.attach(key, value);
        if added {
            self.len += 1;
        }
        // SAFETY: `attach` returns a node of this tree, which stays mutably borrowed for as long
        // as the cursor lives.
        (unsafe { CursorMut::new(node) }, added)
    }

    /// Same as [`insert`][Self::insert] with the pair given as two arguments.
    pub fn emplace(&mut self, key: K, value: V) -> (CursorMut<'_, K, V>, bool) {
        self.insert((key, value))
    }

    /// A cursor at the node holding `key`, or the [`end`][Self::end] cursor if there is none.
    pub fn find(&self, key: &K) -> Cursor<'_, K, V> {
        // SAFETY: Nodes found from `self.root` live as long as `self` is borrowed.
        Cursor::new(self.find_ptr(key).map(|ptr| unsafe { ptr.as_ref() }))
    }

    /// The value stored for `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).value()
    }

    /// The value stored for `key` as a mutable reference, if any.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        // SAFETY: The node belongs to this tree and `&mut self` makes this the only reference
        // into it.
        self.find_ptr(key)
            .map(|mut ptr| unsafe { ptr.as_mut() }.data_mut().1)
    }

    /// Whether `key` is present in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_ptr(key).is_some()
    }

    /// The value stored for `key`, inserting `V::default()` first if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::Tree;
    ///
    /// let mut counts: Tree<&str, u32> = Tree::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_insert_default(word) += 1;
    /// }
    ///
    /// assert_eq!(counts.get(&"a"), Some(&2));
    /// assert_eq!(counts.get(&"b"), Some(&1));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.insert((key, V::default())).0.into_value_mut()
    }

    /// Removes the node holding `key` and returns its value.
    ///
    /// The removed node's children are not spliced back into its place. Instead every entry of
    /// both former subtrees is inserted again, one at a time, just like [`insert`][Self::insert]
    /// would. The remaining keys and values are untouched but the shape of the tree may change.
    ///
    /// Returns `Ok(None)` if the key isn't present.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`] if the tree has no nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{Error, Tree};
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.erase(&1), Err(Error::EmptyTree));
    ///
    /// tree.emplace(2, "two");
    /// tree.emplace(1, "one");
    /// tree.emplace(3, "three");
    ///
    /// assert_eq!(tree.erase(&4), Ok(None));
    /// assert_eq!(tree.erase(&2), Ok(Some("two")));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn erase(&mut self, key: &K) -> Result<Option<V>> {
        if self.root.is_none() {
            return Err(Error::EmptyTree);
        }
        let Some(target) = self.find_ptr(key) else {
            debug!("erase: key not found");
            return Ok(None);
        };

        let mut detached = self.detach(target);
        let left = detached.left.take();
        let right = detached.right.take();
        let (_, value) = detached.into_pair();
        self.len -= 1;

        let repopulated = self.repopulate(right) + self.repopulate(left);
        debug!(repopulated, len = self.len, "erase: removed node");

        Ok(Some(value))
    }

    /// Rebuilds the tree so that its height is logarithmic in its length. The entries are
    /// unchanged.
    ///
    /// Entries are pulled out in key order and reinserted median first, then recursively the
    /// median of the entries before it and of those after it.
    pub fn balance(&mut self) {
        let len = self.len;
        let root = self.root.take();
        self.len = 0;

        let mut entries: Vec<_> = IntoIter::new(root, len).map(Some).collect();
        self.insert_balanced(&mut entries);

        debug!(len = self.len, height = self.height(), "balance: rebuilt tree");
    }

    /// Inserts the median of `entries`, then the medians of the entries on either side of it.
    fn insert_balanced(&mut self, entries: &mut [Option<(K, V)>]) {
        if entries.is_empty() {
            return;
        }

        let median = entries.len() / 2;
        if let Some(entry) = entries[median].take() {
            self.insert(entry);
        }

        let (before, after) = entries.split_at_mut(median);
        self.insert_balanced(before);
        self.insert_balanced(&mut after[1..]);
    }

    /// Walks down from the root to the node holding `key`.
    fn find_ptr(&self, key: &K) -> Option<NonNull<Node<K, V>>> {
        let mut current = self.root.ptr();
        while let Some(ptr) = current {
            // SAFETY: Every pointer stored in a link of this tree refers to a live node, and the
            // tree can't be mutated while `self` is borrowed.
            let node = unsafe { ptr.as_ref() };
            current = match self.cmp.compare(key, node.key()) {
                Ordering::Less => node.left.ptr(),
                Ordering::Greater => node.right.ptr(),
                Ordering::Equal => {
                    trace!("find: hit");
                    return Some(ptr);
                }
            };
        }
        trace!("find: miss");
        None
    }

    /// Places a new node for `key` at the empty link where a search for it ends. If a node with
    /// an equal key is met first, nothing is allocated and that node is returned instead.
    ///
    /// Doesn't touch `len`; callers account for new nodes themselves.
    fn attach(&mut self, key: K, value: V) -> (NonNull<Node<K, V>>, bool) {
        let Some(mut current) = self.root.ptr() else {
            trace!("insert: root");
            let root = Node::leak(key, value, None);
            self.root = Link(Some(root));
            return (root, true);
        };

        loop {
            // SAFETY: `current` is reachable from `self.root`, so it's a live node of this tree,
            // and `&mut self` guarantees there are no other references into the tree.
            let node = unsafe { current.as_mut() };
            let (slot, side) = match self.cmp.compare(&key, node.key()) {
                Ordering::Less => (&mut node.left, "left"),
                Ordering::Greater => (&mut node.right, "right"),
                Ordering::Equal => {
                    trace!("insert: key already present");
                    return (current, false);
                }
            };

            match slot.ptr() {
                Some(child) => current = child,
                None => {
                    trace!(side, "insert: new leaf");
                    let leaf = Node::leak(key, value, Some(current));
                    *slot = Link(Some(leaf));
                    return (leaf, true);
                }
            }
        }
    }

    /// Unhooks `target` from the link owning it and takes ownership of it. Its children stay
    /// attached to it.
    fn detach(&mut self, target: NonNull<Node<K, V>>) -> Box<Node<K, V>> {
        // SAFETY: `target` was found by walking down from `self.root`, so it's a live node of this
        // tree owned by exactly one link: the root link if it has no parent, otherwise one of its
        // parent's child links. Emptying that link before rebuilding the `Box` keeps ownership
        // unique.
        unsafe {
            match target.as_ref().parent {
                None => self.root.0 = None,
                Some(mut parent) => {
                    let parent = parent.as_mut();
                    if parent.left.ptr() == Some(target) {
                        parent.left.0 = None;
                    } else {
                        parent.right.0 = None;
                    }
                }
            }

            let mut node = Box::from_raw(target.as_ptr());
            node.parent = None;
            node
        }
    }

    /// Inserts every entry of a detached subtree back into the tree, children before their
    /// parent and left subtrees before right ones. Returns how many entries were moved.
    fn repopulate(&mut self, subtree: Link<K, V>) -> usize {
        let mut pending: Vec<_> = subtree.into_box().into_iter().collect();
        let mut reversed_post_order = Vec::new();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take_box());
            pending.extend(node.right.take_box());
            reversed_post_order.push(node);
        }

        let moved = reversed_post_order.len();
        while let Some(node) = reversed_post_order.pop() {
            let (key, value) = node.into_pair();
            let (_, added) = self.attach(key, value);
            debug_assert!(added, "keys of a detached subtree are unique");
        }
        moved
    }
}

impl<K, V, C> Index<&K> for Tree<K, V, C>
where
    C: Compare<K>,
{
    type Output = V;

    /// # Panics
    ///
    /// If `key` is not present in the tree.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, C> IntoIterator for &'a Tree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for Tree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let Tree { root, len, .. } = self;
        IntoIter::new(root, len)
    }
}

impl<K, V, C> Extend<(K, V)> for Tree<K, V, C>
where
    C: Compare<K>,
{
    /// Inserts every pair. Pairs whose key is already present are dropped.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Tree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}
