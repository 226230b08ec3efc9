/*!
# Attribute Records

This module defines the attribute records attached to graphs, nodes, and
edges.

- A [`Value`] is an attribute value: null, boolean, number, text, or a list.
- An [`Attrs`] record maps string attribute names to values in insertion
  order. Records are almost always tiny (zero to three entries), so they are
  stored inline and scanned linearly.

The [`attrs!`](crate::attrs) macro builds records in place:

```
use agraphs::attrs;

let record = attrs! { "weight" => 2.5, "color" => "red" };
assert_eq!(record.get("weight").and_then(|v| v.as_number()), Some(2.5));
```
*/

use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

use smallvec::SmallVec;

use crate::key::Key;

/// An attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Coerces numeric values to `f64`.
    ///
    /// Weighted degrees use this to sum edge weights; non-numeric values
    /// yield `None` and count like a missing attribute.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(x) => Some(*x as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the integer value if this is a [`Value::Int`].
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the text value if this is a [`Value::Text`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a [`Value::Bool`].
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($($t:ty => $variant:ident $(as $conv:ty)?),+ $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value $(as $conv)?)
                }
            }
        )+
    };
}

impl_value_from!(
    bool => Bool,
    i64 => Int,
    i32 => Int as i64,
    u32 => Int as i64,
    f64 => Float,
    f32 => Float as f64,
    String => Text,
    Vec<Value> => List,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<&Key> for Value {
    fn from(value: &Key) -> Self {
        match value {
            Key::Int(x) => Value::Int(*x),
            Key::Text(s) => Value::Text(s.to_string()),
            Key::Pair(p) => Value::List(vec![(&p.0).into(), (&p.1).into()]),
        }
    }
}

impl From<Key> for Value {
    fn from(value: Key) -> Self {
        (&value).into()
    }
}

/// A mutable attribute record: attribute names mapped to [`Value`]s.
///
/// Entries iterate in insertion order. Setting an existing name replaces the
/// value in place; removal preserves the order of the remaining entries.
#[derive(Clone, Default)]
pub struct Attrs {
    entries: SmallVec<[(Box<str>, Value); 2]>,
}

impl Attrs {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored under `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v)
    }

    /// Stores `value` under `name`, returning the previous value if any.
    pub fn set(&mut self, name: impl Into<Box<str>>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Removes the entry stored under `name` and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| &**k == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Returns `true` if the record contains `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| &**k == name)
    }

    /// Copies every entry of `other` into this record, overwriting entries
    /// with the same name.
    pub fn merge(&mut self, other: &Attrs) {
        for (name, value) in other.iter() {
            self.set(name, value.clone());
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for Attrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Records compare as maps: entry order is irrelevant.
impl PartialEq for Attrs {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<N: Into<Box<str>>, V: Into<Value>> FromIterator<(N, V)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut attrs = Attrs::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}

/// A graph-owned handle to an [`Attrs`] record.
///
/// Mirrored adjacency entries and subgraph views alias the same record
/// through this handle: `Clone` produces another alias, so mutating the
/// record through one handle is visible through all of them.
/// [`SharedAttrs::deep_clone`] detaches an independent copy.
#[derive(Clone, Default)]
pub struct SharedAttrs(Rc<RefCell<Attrs>>);

impl SharedAttrs {
    /// Wraps `attrs` into a fresh handle.
    pub fn new(attrs: Attrs) -> Self {
        Self(Rc::new(RefCell::new(attrs)))
    }

    /// Borrows the record for reading.
    ///
    /// # Panics
    /// Panics if the record is currently borrowed for mutation.
    pub fn borrow(&self) -> Ref<'_, Attrs> {
        self.0.borrow()
    }

    /// Borrows the record for mutation.
    ///
    /// # Panics
    /// Panics if the record is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Attrs> {
        self.0.borrow_mut()
    }

    /// Returns a handle to an independent copy of the record.
    pub fn deep_clone(&self) -> Self {
        Self::new(self.borrow().clone())
    }

    /// Unwraps the record, cloning it if other aliases exist.
    pub fn into_attrs(self) -> Attrs {
        match Rc::try_unwrap(self.0) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().clone(),
        }
    }

    /// Returns `true` if both handles alias the same record.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl From<Attrs> for SharedAttrs {
    fn from(attrs: Attrs) -> Self {
        Self::new(attrs)
    }
}

impl std::fmt::Debug for SharedAttrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.borrow().fmt(f)
    }
}

/// Handles compare by record contents, not by identity.
impl PartialEq for SharedAttrs {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || *self.borrow() == *other.borrow()
    }
}

/// Builds an [`Attrs`] record from `name => value` pairs.
#[macro_export]
macro_rules! attrs {
    () => { $crate::attr::Attrs::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::attr::Attrs::new();
        $( record.set($name, $value); )+
        record
    }};
}
