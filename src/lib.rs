//! An ordered map stored as a plain (unbalanced) Binary Search Tree (BST),
//! mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! "Less" and "greater" are decided by a comparator from the [`compare`] crate
//! which defaults to the natural order of the keys.
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined
//! as the longest path from the root `Node` to a leaf `Node`). This tree does
//! nothing to limit its height while it is modified, so inserting sorted keys
//! degrades it into a list. [`Tree::balance`] rebuilds it with a height of
//! `O(lg N)` on request.
//!
//! Every `Node` also keeps a pointer back to its parent. That's what lets the
//! [`Cursor`] walk the tree in sorted order one node at a time without any
//! auxiliary storage.
//!
//! # Examples
//!
//! ```
//! use bst_map::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert((8, 0));
//! tree.insert((3, 1));
//! tree.insert((9, 1));
//! tree.insert((1, 900));
//!
//! let entries: Vec<_> = tree.iter().collect();
//! assert_eq!(entries, [(&1, &900), (&3, &1), (&8, &0), (&9, &1)]);
//!
//! assert_eq!(tree.erase(&8), Ok(Some(0)));
//! assert!(tree.find(&8).is_end());
//! assert_eq!(tree.find(&9).value(), Some(&1));
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod diagram;
mod error;
mod iter;
mod node;
mod tree;


pub use compare::{self, Compare, Natural};

pub use crate::diagram::Diagram;
pub use crate::error::{Error, Result};
pub use crate::iter::{Cursor, CursorMut, IntoIter, Iter};
pub use crate::node::Node;
pub use crate::tree::Tree;
