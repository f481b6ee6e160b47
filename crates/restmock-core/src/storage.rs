//! Storage tree for mock resource items.
//!
//! A resource family stores its items in an arbitrarily deep JSON object
//! tree keyed by opaque path-segment strings. Traversal walks an ordered id
//! sequence; crossing parent/child resource boundaries is just a longer
//! sequence.

use serde_json::{Map, Value};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Handle over the root object of one resource family's storage tree.
///
/// Cloning the handle shares the underlying tree. A mock owns its data
/// source exclusively unless the caller deliberately hands the same handle
/// to a parent and its sub-resources.
#[derive(Debug, Clone)]
pub struct DataSource {
    root: Rc<RefCell<Value>>,
}

impl DataSource {
    /// Create an empty storage tree.
    pub fn new() -> Self {
        Self {
            root: Rc::new(RefCell::new(Value::Object(Map::new()))),
        }
    }

    /// Borrow the root node.
    pub fn root(&self) -> Ref<'_, Value> {
        self.root.borrow()
    }

    /// Mutably borrow the root node.
    pub fn root_mut(&self) -> RefMut<'_, Value> {
        self.root.borrow_mut()
    }

    /// Clone the current tree, for assertions and debugging.
    pub fn snapshot(&self) -> Value {
        self.root.borrow().clone()
    }

    /// Clone the node addressed by `ids`, if present.
    pub fn item<S: AsRef<str>>(&self, ids: &[S]) -> Option<Value> {
        locate(&self.root.borrow(), ids).cloned()
    }
}

impl Default for DataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Value> for DataSource {
    fn from(root: Value) -> Self {
        Self {
            root: Rc::new(RefCell::new(root)),
        }
    }
}

/// Walk `root` through `ids` in order; `None` as soon as a key is missing.
///
/// The node reached after consuming all ids may be a leaf item or a
/// sub-tree; the caller does not distinguish.
pub fn locate<'a, S: AsRef<str>>(root: &'a Value, ids: &[S]) -> Option<&'a Value> {
    let mut node = root;
    for id in ids {
        node = node.as_object()?.get(id.as_ref())?;
    }
    Some(node)
}

/// Mutable traversal; with `auto_create` a missing key becomes an empty
/// object and the walk descends into it.
pub fn locate_mut<'a, S: AsRef<str>>(
    root: &'a mut Value,
    ids: &[S],
    auto_create: bool,
) -> Option<&'a mut Value> {
    let mut node = root;
    for id in ids {
        let key = id.as_ref();
        let obj = node.as_object_mut()?;
        if !obj.contains_key(key) {
            if !auto_create {
                return None;
            }
            obj.insert(key.to_string(), Value::Object(Map::new()));
        }
        node = obj.get_mut(key)?;
    }
    Some(node)
}
