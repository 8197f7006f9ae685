//! Errors reported by [`Tree`][crate::Tree] operations.
//!
//! Most "negative" outcomes are ordinary return values: a missing key makes
//! [`find`][crate::Tree::find] return the end cursor and
//! [`erase`][crate::Tree::erase] return `Ok(None)`, and a duplicate key makes
//! [`insert`][crate::Tree::insert] report `false`. Only structural
//! preconditions show up here.

use thiserror::Error;

/// Errors that can occur while operating on a [`Tree`][crate::Tree].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `erase` was called on a tree without a root node. The tree is left
    /// untouched.
    #[error("cannot erase from an empty tree: there is no root node")]
    EmptyTree,
}

/// A `Result` alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
