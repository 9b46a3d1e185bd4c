//! Lenses over JSON-like values.
//!
//! A [`Lens`] focuses on part of a [`serde_json::Value`]: it can read the
//! focus (`get`), transform it (`map`) or replace it (`set`), always
//! returning a new value. Lenses are built from primitives and combined with
//! combinators:
//!
//! # Primitive Lenses
//!
//! - [`IndexedLens`]: one array element (`index`, `unsafe_index`)
//! - [`SliceLens`]: a contiguous sub-array (`slice`, `slice_spec`)
//! - [`PathLens`]: the value at a dot-separated key path (`path`, `unsafe_path`)
//! - [`FilterLens`]: array elements matching a predicate or pattern (`filter`)
//! - [`PluckLens`]: object entries selected by key (`pluck`, `recursive_pluck`)
//!
//! # Combinators
//!
//! - [`Compose`]: focus inside another focus (`compose`)
//! - [`MultiLens`]: several foci at once (`add`, `multi`, `multi_keyed`)
//! - [`Disjunctive`]: the first focus that exists (`or`)
//! - [`Conjunctive`]: both foci, only when both exist (`and`)
//! - [`Optional`]: errors replaced by a fallback (`optional`)
//! - [`Getter`] / [`Setter`]: read-only and write-only views
//!
//! # Safety
//!
//! Primitive lenses are safe by default: a missing focus reads as `null`
//! and writing to it leaves the source unchanged. Unsafe lenses report a
//! [`LensError`](crate::LensError) instead.
//!
//! # Example
//!
//! ```
//! use focal::optics::{path, Fallback};
//! use serde_json::json;
//!
//! let data = json!({"users": [{"name": "ada", "tags": ["admin"]}, {"name": "alan"}]});
//!
//! let users = path("users").unwrap().view(data.clone());
//! let names = users.each(|user| user.path("name")).unwrap();
//! assert_eq!(names.get(&data).unwrap(), json!(["ada", "alan"]));
//!
//! let shouted = names
//!     .map(data.clone(), |name| json!(name.as_str().unwrap().to_uppercase()))
//!     .unwrap();
//! assert_eq!(shouted["users"][1]["name"], json!("ALAN"));
//!
//! let first_tag = path("users").unwrap().unsafe_index(1).unsafe_path("tags.0").unwrap();
//! assert!(first_tag.get(&data).is_err());
//! assert_eq!(first_tag.optional(Fallback::Default).get(&data).unwrap(), json!(null));
//! ```
//!
//! # Lens Laws
//!
//! Every settable lens satisfies, whenever its focus exists:
//!
//! 1. **GetPut Law**: `lens.set(a.clone(), lens.get(&a)?)? == a`
//! 2. **PutGet Law**: `lens.get(&lens.set(a, b.clone())?)? == b`
//! 3. **PutPut Law**: `lens.set(lens.set(a.clone(), b)?, c.clone())? == lens.set(a, c)?`

mod choice;
mod compose;
mod filtered;
mod flags;
mod index;
mod lens;
mod multi;
mod optional;
mod path;
mod pluck;
mod restricted;
mod slice;
mod standard_optics;

pub use choice::{Conjunctive, Disjunctive, conjunction, disjunction};
pub use compose::Compose;
pub use filtered::{FilterCriterion, FilterLens, filter, filter_pattern};
pub use flags::{Flags, LensKind, LensOptions, PathSegments, Safety};
pub use index::{IndexedLens, index, unsafe_index};
pub use lens::{Focus, FunctionLens, IdentityLens, Lens, identity};
pub use multi::{Members, MultiLens, multi, multi_keyed};
pub use optional::{Fallback, Optional, optional};
pub use path::{PathLens, path, path_of, unsafe_path};
pub use pluck::{PluckCriterion, PluckLens, pluck, recursive_pluck};
pub use restricted::{Getter, Setter};
pub use slice::{SliceLens, slice, slice_spec};
pub use standard_optics::{head, last, leaves};
