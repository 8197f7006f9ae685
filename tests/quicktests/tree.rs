use bst_map::{Error, Tree};

use std::collections::{HashMap, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a hashmap.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in the map.
fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut Tree<K, V>, map: &mut HashMap<K, V>)
where
    K: std::hash::Hash + Eq + Clone + Ord,
    V: std::fmt::Debug + PartialEq + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                bst.insert((k.clone(), v.clone()));
                map.entry(k.clone()).or_insert_with(|| v.clone());
            }
            Op::Remove(k) => {
                let expected = if map.is_empty() {
                    Err(Error::EmptyTree)
                } else {
                    Ok(map.remove(k))
                };
                assert_eq!(bst.erase(k), expected);
            }
        }
    }
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
        let mut tree = Tree::new();
        let mut map = HashMap::new();

        do_ops(&ops, &mut tree, &mut map);
        tree.len() == map.len() && map.keys().all(|key| tree.get(key) == map.get(key))
    }

    fn in_order_is_strictly_ascending(ops: Vec<Op<i16, ()>>) -> bool {
        let mut tree = Tree::new();
        let mut map = HashMap::new();

        do_ops(&ops, &mut tree, &mut map);
        let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
        keys.windows(2).all(|pair| pair[0] < pair[1])
    }

    fn distinct_inserts_are_all_counted(xs: HashSet<i32>) -> bool {
        let tree: Tree<_, _> = xs.iter().map(|x| (*x, ())).collect();
        tree.len() == xs.len()
    }

    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            tree.insert((*x, *x));
        }
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| tree.find(x).is_end())
    }

    fn find_agrees_with_erase(xs: Vec<i8>, probe: i8) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            tree.insert((*x, ()));
        }

        let found = !tree.find(&probe).is_end();
        match tree.erase(&probe) {
            Ok(erased) => erased.is_some() == found,
            Err(Error::EmptyTree) => xs.is_empty() && !found,
        }
    }

    fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            tree.insert((*x, *x));
        }
        for delete in &deletes {
            let _ = tree.erase(delete);
        }

        let mut still_present = xs;
        for delete in &deletes {
            // We may have inserted the same value multiple times - delete each one.
            while let Some(pos) = still_present.iter().position(|x| x == delete) {
                still_present.swap_remove(pos);
            }
        }

        deletes.iter().all(|x| tree.get(x).is_none())
            && still_present.iter().all(|x| tree.get(x) == Some(x))
    }

    fn copies_are_independent(xs: Vec<(i8, i8)>, ops: Vec<Op<i8, i8>>) -> bool {
        let original: Tree<_, _> = xs.into_iter().collect();
        let snapshot: Vec<_> = original.iter().map(|(k, v)| (*k, *v)).collect();

        let mut copy = original.clone();
        let mut map: HashMap<_, _> = snapshot.iter().copied().collect();
        do_ops(&ops, &mut copy, &mut map);

        original.iter().map(|(k, v)| (*k, *v)).eq(snapshot)
    }

    fn balance_preserves_content(xs: Vec<(i8, i8)>) -> bool {
        let mut tree: Tree<_, _> = xs.into_iter().collect();
        let before = tree.clone();

        tree.balance();
        tree == before
    }
}
