//! A sideways drawing of a tree's shape, for eyeballing while debugging.

use std::fmt;

use crate::node::Node;

/// Extra indentation for each level below the root.
const INDENT: usize = 10;

/// Displays the keys of a [`Tree`][crate::Tree] rotated 90° counter-clockwise: the root sits at
/// the left margin, right subtrees are printed above their parent and left subtrees below. Every
/// key is preceded by a blank line.
///
/// Created by [`Tree::diagram`][crate::Tree::diagram].
///
/// # Examples
///
/// ```
/// use bst_map::Tree;
///
/// let tree: Tree<_, _> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
///
/// let expected = "\n          3\n\n2\n\n          1\n";
/// assert_eq!(tree.diagram().to_string(), expected);
/// ```
pub struct Diagram<'a, K, V> {
    root: Option<&'a Node<K, V>>,
}

impl<'a, K, V> Diagram<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>) -> Self {
        Self { root }
    }
}

impl<'a, K, V> fmt::Display for Diagram<'a, K, V>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reverse in-order walk: right subtree, node, left subtree.
        let mut pending = Vec::new();
        let mut current = self.root.map(|root| (root, 0));
        loop {
            while let Some((node, level)) = current {
                pending.push((node, level));
                current = node.right().map(|right| (right, level + 1));
            }
            let Some((node, level)) = pending.pop() else {
                return Ok(());
            };

            writeln!(f)?;
            writeln!(f, "{:indent$}{}", "", node.key(), indent = level * INDENT)?;

            current = node.left().map(|left| (left, level + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Tree;

    #[test]
    fn empty_tree_draws_nothing() {
        let tree: Tree<i32, ()> = Tree::new();
        assert_eq!(tree.diagram().to_string(), "");
    }

    #[test]
    fn deeper_levels_are_indented_further() {
        let mut tree = Tree::new();
        for key in [8, 3, 9, 1] {
            tree.emplace(key, ());
        }

        let lines: Vec<_> = tree
            .diagram()
            .to_string()
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        assert_eq!(
            lines,
            [
                format!("{:10}9", ""),
                "8".to_string(),
                format!("{:10}3", ""),
                format!("{:20}1", ""),
            ]
        );
    }
}
