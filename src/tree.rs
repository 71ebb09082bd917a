//! The ordered, multi-keyed configuration tree.
//!
//! A [`VariantTree`] node holds one [`Variant`] datum and an ordered list of
//! `(key, subtree)` children. Keys need not be unique: two siblings named `x`
//! are two distinct nodes, kept in insertion order.
//!
//! ## Paths
//!
//! Lookup helpers accept dot-separated paths. Each segment selects the first
//! child with that key.
//!
//! ```rust
//! use variant_tree::{Variant, VariantTree};
//!
//! let mut tree = VariantTree::new();
//! tree.put("server.port", 8080);
//! tree.put("server.host", "localhost");
//!
//! assert_eq!(tree.get::<i64>("server.port").unwrap(), 8080);
//! assert_eq!(tree.get_value("server.host"), Some(&Variant::from("localhost")));
//! assert_eq!(tree.get_or("server.timeout", 30i64), 30);
//! ```

use crate::variant::Translator;
use crate::{Error, Result, Variant};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::mem;

const PATH_SEPARATOR: char = '.';

/// An ordered tree of [`Variant`] values with possibly duplicate keys.
///
/// Each node owns its children outright. Dropping a tree releases its nodes
/// iteratively, so very deep trees do not overflow the stack.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariantTree {
    data: Variant,
    children: Vec<(String, VariantTree)>,
}

impl VariantTree {
    /// Creates an empty tree with a `Null` datum.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a childless node holding `data`.
    #[must_use]
    pub fn with_data(data: impl Into<Variant>) -> Self {
        VariantTree {
            data: data.into(),
            children: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &Variant {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut Variant {
        &mut self.data
    }

    pub fn set_data(&mut self, data: impl Into<Variant>) {
        self.data = data.into();
    }

    /// Number of direct children.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the node has no children.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over direct children in order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &VariantTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut VariantTree)> {
        self.children.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the keys of direct children, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(k, _)| k.as_str())
    }

    /// Appends `child` under `key` and returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_tree::VariantTree;
    ///
    /// let mut tree = VariantTree::new();
    /// tree.push_back("x", VariantTree::with_data(1));
    /// tree.push_back("x", VariantTree::with_data(2));
    ///
    /// let xs: Vec<_> = tree.find_all("x").map(|t| t.data().as_i64()).collect();
    /// assert_eq!(xs, vec![Some(1), Some(2)]);
    /// ```
    pub fn push_back(&mut self, key: impl Into<String>, child: VariantTree) -> &mut VariantTree {
        self.children.push((key.into(), child));
        let last = self.children.len() - 1;
        &mut self.children[last].1
    }

    /// Appends a childless node holding `value` under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Variant>) -> &mut VariantTree {
        self.push_back(key, VariantTree::with_data(value))
    }

    /// Moves every child of `other` to the end of this node's children.
    pub fn append(&mut self, mut other: VariantTree) {
        self.children.append(&mut other.children);
    }

    /// First child with the given key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&VariantTree> {
        self.children.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut VariantTree> {
        self.children
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// All children with the given key, in order.
    pub fn find_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a VariantTree> + 'a {
        self.children
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Number of children with the given key.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.children.iter().filter(|(k, _)| k == key).count()
    }

    /// Removes all children with the given key and returns how many were removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|(k, _)| k != key);
        before - self.children.len()
    }

    /// Follows a dot-separated path. An empty path names this node.
    #[must_use]
    pub fn get_child(&self, path: &str) -> Option<&VariantTree> {
        if path.is_empty() {
            return Some(self);
        }
        path.split(PATH_SEPARATOR)
            .try_fold(self, |node, key| node.find(key))
    }

    pub fn get_child_mut(&mut self, path: &str) -> Option<&mut VariantTree> {
        if path.is_empty() {
            return Some(self);
        }
        path.split(PATH_SEPARATOR)
            .try_fold(self, |node, key| node.find_mut(key))
    }

    /// Datum of the node at `path`.
    #[must_use]
    pub fn get_value(&self, path: &str) -> Option<&Variant> {
        self.get_child(path).map(VariantTree::data)
    }

    /// Typed datum of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchPath`] when the path does not exist, or a conversion
    /// error when the datum is of a different kind.
    pub fn get<T>(&self, path: &str) -> Result<T>
    where
        T: TryFrom<Variant, Error = Error>,
    {
        let value = self
            .get_value(path)
            .ok_or_else(|| Error::NoSuchPath(path.to_string()))?;
        T::try_from(value.clone())
    }

    /// Typed datum of the node at `path`, or `default` if missing or of another kind.
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Variant, Error = Error>,
    {
        self.get(path).unwrap_or(default)
    }

    /// Sets the datum at `path`, creating missing nodes along the way.
    ///
    /// Existing nodes are reused (first match per segment), so `put` overwrites
    /// rather than duplicates.
    pub fn put(&mut self, path: &str, value: impl Into<Variant>) -> &mut VariantTree {
        let mut node = self;
        if !path.is_empty() {
            for key in path.split(PATH_SEPARATOR) {
                let pos = match node.children.iter().position(|(k, _)| k == key) {
                    Some(pos) => pos,
                    None => {
                        node.children.push((key.to_string(), VariantTree::new()));
                        node.children.len() - 1
                    }
                };
                node = &mut node.children[pos].1;
            }
        }
        node.data = value.into();
        node
    }

    /// Removes all children and resets the datum to `Null`.
    pub fn clear(&mut self) {
        self.data = Variant::Null;
        self.children.clear();
    }

    /// Exchanges the contents of two trees.
    pub fn swap(&mut self, other: &mut VariantTree) {
        mem::swap(self, other);
    }

    /// Converts every `String` datum in the tree through `translator`.
    ///
    /// Useful for trees built from raw text, such as values copied out of
    /// another configuration source.
    ///
    /// # Errors
    ///
    /// Stops at the first datum the translator rejects. Nodes visited before
    /// the failure keep their converted value.
    pub fn translate_data<T>(&mut self, translator: &T) -> Result<()>
    where
        T: Translator + ?Sized,
    {
        let mut stack: Vec<&mut VariantTree> = vec![self];
        while let Some(node) = stack.pop() {
            if let Variant::String(text) = &node.data {
                node.data = translator.get_value(text)?;
            }
            stack.extend(node.children.iter_mut().map(|(_, child)| child));
        }
        Ok(())
    }
}

impl Drop for VariantTree {
    fn drop(&mut self) {
        let mut pending: Vec<VariantTree> = self.children.drain(..).map(|(_, c)| c).collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.drain(..).map(|(_, c)| c));
        }
    }
}

impl Serialize for VariantTree {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.children.is_empty() {
            return self.data.serialize(serializer);
        }
        let extra = usize::from(!self.data.is_null());
        let mut map = serializer.serialize_map(Some(self.children.len() + extra))?;
        if !self.data.is_null() {
            map.serialize_entry("", &self.data)?;
        }
        for (key, child) in &self.children {
            map.serialize_entry(key, child)?;
        }
        map.end()
    }
}
