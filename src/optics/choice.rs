//! Disjunctive and conjunctive lenses.
//!
//! A focus *exists* when the lens reads it without error and it is not
//! `null`. [`Disjunctive`] focuses with its left lens when that focus exists
//! and with its right lens otherwise; exactly one side is ever written.
//! [`Conjunctive`] focuses on both sides, but only when both foci exist. When
//! either is missing, or the joint read or write fails, its `get` is `null`
//! and its `map` is a no-op.
//!
//! # Examples
//!
//! ```
//! use focal::optics::path;
//! use serde_json::json;
//!
//! let name = path("nickname").unwrap().or(path("name").unwrap());
//! assert_eq!(name.get(&json!({"name": "Ada"})).unwrap(), json!("Ada"));
//! assert_eq!(name.get(&json!({"name": "Ada", "nickname": "A"})).unwrap(), json!("A"));
//!
//! let both = path("a").unwrap().and(path("b").unwrap());
//! assert_eq!(both.get(&json!({"a": 1, "b": 2})).unwrap(), json!([1, 2]));
//! assert_eq!(both.get(&json!({"a": 1})).unwrap(), json!(null));
//! assert_eq!(both.set(json!({"a": 1}), json!(0)).unwrap(), json!({"a": 1}));
//! ```

use std::sync::Arc;

use serde_json::Value;

use super::flags::{Flags, LensKind};
use super::lens::{Focus, Lens};
use crate::error::Result;

/// Reads the focus of `lens`, treating errors and `null` as absent.
fn existing(lens: &Lens, source: &Value) -> Option<Value> {
    match lens.get(source) {
        Ok(Value::Null) => None,
        Ok(focus) => Some(focus),
        Err(error) => {
            log::trace!("treating failed read as a missing focus: {error}");
            None
        }
    }
}

/// Focuses with `left` when its focus exists, otherwise with `right`.
#[derive(Debug, Clone)]
pub struct Disjunctive {
    left: Lens,
    right: Lens,
}

impl Disjunctive {
    /// Joins two lenses disjunctively.
    #[must_use]
    pub fn build(left: Lens, right: Lens) -> Lens {
        let kind = LensKind::Disjunctive {
            left: Box::new(left.kind().clone()),
            right: Box::new(right.kind().clone()),
        };
        let flags = Flags::merged(kind, left.flags(), right.flags());
        let view = left.inherited_view(&right);
        Lens::from_parts(Arc::new(Self { left, right }), flags, view)
    }
}

impl Focus for Disjunctive {
    fn get(&self, source: &Value) -> Result<Value> {
        match existing(&self.left, source) {
            Some(focus) => Ok(focus),
            None => {
                log::debug!("left focus missing; reading with the right lens");
                self.right.get(source)
            }
        }
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        if existing(&self.left, &source).is_some() {
            self.left.map(source, function)
        } else {
            log::debug!("left focus missing; mapping with the right lens");
            self.right.map(source, function)
        }
    }
}

/// Focuses on both `left` and `right`, only when both foci exist.
#[derive(Debug, Clone)]
pub struct Conjunctive {
    left: Lens,
    right: Lens,
    both: Lens,
}

impl Conjunctive {
    /// Joins two lenses conjunctively.
    #[must_use]
    pub fn build(left: Lens, right: Lens) -> Lens {
        let kind = LensKind::Conjunctive {
            left: Box::new(left.kind().clone()),
            right: Box::new(right.kind().clone()),
        };
        let flags = Flags::merged(kind, left.flags(), right.flags());
        let view = left.inherited_view(&right);
        let both = left.add(right.clone());
        Lens::from_parts(Arc::new(Self { left, right, both }), flags, view)
    }

    fn both_exist(&self, source: &Value) -> bool {
        existing(&self.left, source).is_some() && existing(&self.right, source).is_some()
    }
}

impl Focus for Conjunctive {
    fn get(&self, source: &Value) -> Result<Value> {
        if !self.both_exist(source) {
            return Ok(Value::Null);
        }
        self.both.get(source).or_else(|error| {
            log::trace!("conjunctive read failed; focus is null: {error}");
            Ok(Value::Null)
        })
    }

    fn map(&self, source: Value, function: &dyn Fn(Value) -> Value) -> Result<Value> {
        if !self.both_exist(&source) {
            log::trace!("conjunctive focus incomplete; source unchanged");
            return Ok(source);
        }
        let unchanged = source.clone();
        self.both.map(source, function).or_else(|error| {
            log::trace!("conjunctive write failed; source unchanged: {error}");
            Ok(unchanged)
        })
    }
}

/// A lens focusing with `left` when its focus exists, otherwise `right`.
#[must_use]
pub fn disjunction(left: Lens, right: Lens) -> Lens {
    Disjunctive::build(left, right)
}

/// A lens focusing on both `left` and `right` when both foci exist.
#[must_use]
pub fn conjunction(left: Lens, right: Lens) -> Lens {
    Conjunctive::build(left, right)
}
