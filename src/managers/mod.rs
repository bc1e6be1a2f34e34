// Chronomarks state managers
// Managers own stateful storage: the bookmark tree.

pub mod bookmark_tree;
