//! Lens metadata and construction options.
//!
//! Every [`Lens`](super::Lens) carries [`Flags`]: a [`LensKind`] describing
//! how it was built (with the parameters needed to introspect it) plus an
//! open metadata map reserved for user extensions.
//!
//! # Examples
//!
//! ```
//! use focal::optics::{index, LensKind, Safety};
//! use serde_json::json;
//!
//! let lens = index(-1);
//! assert_eq!(lens.flags().kind(), &LensKind::Index { index: -1, safety: Safety::Safe });
//! assert_eq!(lens.flag("index"), Some(json!(-1)));
//! assert_eq!(lens.flag("kind"), Some(json!("index")));
//! ```

use serde_json::{Map, Value};
use smallvec::SmallVec;

/// The segments of a path lens. Most paths are short, so they live inline.
pub type PathSegments = SmallVec<[String; 4]>;

/// Whether a missing focus degrades gracefully or raises an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Safety {
    /// Missing targets read as `null` and writes to them are no-ops.
    #[default]
    Safe,
    /// Missing targets raise a [`LensError`](crate::LensError).
    Unsafe,
}

impl Safety {
    /// Returns `true` for [`Safety::Unsafe`].
    #[must_use]
    pub const fn is_unsafe(self) -> bool {
        matches!(self, Self::Unsafe)
    }

    /// The stricter of two safety levels.
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        if self.is_unsafe() || other.is_unsafe() {
            Self::Unsafe
        } else {
            Self::Safe
        }
    }
}

/// Options accepted by every primitive lens constructor.
///
/// # Example
///
/// ```
/// use focal::optics::{IndexedLens, LensOptions};
/// use serde_json::json;
///
/// let options = LensOptions::new().viewing(json!([1, 2, 3]));
/// let lens = IndexedLens::with_options(1, options);
/// assert_eq!(lens.get_bound().unwrap(), json!(2));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LensOptions {
    /// Safe or unsafe traversal.
    pub safety: Safety,
    /// A value to bind the constructed lens to.
    pub view: Option<Value>,
}

impl LensOptions {
    /// Default options: safe, unbound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to unsafe (error-raising) traversal.
    #[must_use]
    pub fn unsafe_access(mut self) -> Self {
        self.safety = Safety::Unsafe;
        self
    }

    /// Sets the safety level explicitly.
    #[must_use]
    pub fn safety(mut self, safety: Safety) -> Self {
        self.safety = safety;
        self
    }

    /// Binds the constructed lens to `view`.
    #[must_use]
    pub fn viewing(mut self, view: Value) -> Self {
        self.view = Some(view);
        self
    }
}

/// The construction tree of a lens.
///
/// Composite kinds box the kinds of their constituents so that a lens can be
/// inspected without access to its functions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LensKind {
    /// Focuses on the whole value.
    Identity,
    /// Built from user-supplied get/map functions.
    Custom,
    /// A single array element.
    Index {
        /// The (possibly negative) index.
        index: i64,
        /// Safe or unsafe traversal.
        safety: Safety,
    },
    /// A contiguous sub-array.
    Slice {
        /// Start bound.
        start: i64,
        /// End bound; `None` means the end of the array.
        end: Option<i64>,
        /// Safe or unsafe traversal.
        safety: Safety,
    },
    /// A value reached by following object keys.
    Path {
        /// The keys to follow.
        segments: PathSegments,
        /// Safe or unsafe traversal.
        safety: Safety,
    },
    /// Array elements selected by a predicate or pattern.
    Filter,
    /// Object entries selected by a key criterion.
    Pluck {
        /// Whether selection recurses into nested objects.
        recursive: bool,
    },
    /// Sequential composition.
    Compose {
        /// The outer lens.
        first: Box<LensKind>,
        /// The inner lens.
        second: Box<LensKind>,
    },
    /// Several foci at once.
    Multi {
        /// Whether the members are keyed by name.
        keyed: bool,
        /// The number of members.
        arity: usize,
    },
    /// The left focus if present, otherwise the right.
    Disjunctive {
        /// Tried first.
        left: Box<LensKind>,
        /// Fallback.
        right: Box<LensKind>,
    },
    /// Both foci, only when both are present.
    Conjunctive {
        /// First focus.
        left: Box<LensKind>,
        /// Second focus.
        right: Box<LensKind>,
    },
    /// Errors converted into a fallback value.
    Optional {
        /// The wrapped lens.
        inner: Box<LensKind>,
    },
    /// Read-only restriction.
    Getter {
        /// The restricted lens.
        inner: Box<LensKind>,
    },
    /// Write-only restriction.
    Setter {
        /// The restricted lens.
        inner: Box<LensKind>,
    },
}

impl LensKind {
    /// The short discriminator reported by the `kind` flag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Custom => "custom",
            Self::Index { .. } => "index",
            Self::Slice { .. } => "slice",
            Self::Path { .. } => "path",
            Self::Filter => "filter",
            Self::Pluck { .. } => "pluck",
            Self::Compose { .. } => "compose",
            Self::Multi { .. } => "multi",
            Self::Disjunctive { .. } => "disjunctive",
            Self::Conjunctive { .. } => "conjunctive",
            Self::Optional { .. } => "optional",
            Self::Getter { .. } => "getter",
            Self::Setter { .. } => "setter",
        }
    }

    /// Returns `true` if the kind reports the `getter` flag.
    ///
    /// Follows the same propagation as [`LensKind::parameters`]: through
    /// wrappers and both halves of a composition.
    #[must_use]
    pub fn is_getter(&self) -> bool {
        match self {
            Self::Getter { .. } => true,
            Self::Optional { inner } | Self::Setter { inner } => inner.is_getter(),
            Self::Compose { first, second } => first.is_getter() || second.is_getter(),
            _ => false,
        }
    }

    /// Returns `true` if the kind reports the `setter` flag.
    ///
    /// Follows the same propagation as [`LensKind::parameters`].
    #[must_use]
    pub fn is_setter(&self) -> bool {
        match self {
            Self::Setter { .. } => true,
            Self::Optional { inner } | Self::Getter { inner } => inner.is_setter(),
            Self::Compose { first, second } => first.is_setter() || second.is_setter(),
            _ => false,
        }
    }

    /// The named construction parameters of this kind.
    ///
    /// Wrapping kinds report their constituents' parameters too; the outer
    /// kind wins on collision.
    #[must_use]
    pub fn parameters(&self) -> Map<String, Value> {
        let mut parameters = Map::new();
        match self {
            Self::Identity | Self::Custom | Self::Filter => {}
            Self::Index { index, safety } => {
                parameters.insert("index".into(), Value::from(*index));
                parameters.insert("unsafe".into(), Value::Bool(safety.is_unsafe()));
            }
            Self::Slice { start, end, safety } => {
                parameters.insert("start".into(), Value::from(*start));
                parameters.insert("end".into(), Value::from(*end));
                parameters.insert("unsafe".into(), Value::Bool(safety.is_unsafe()));
            }
            Self::Path { segments, safety } => {
                parameters.insert("path".into(), Value::from(segments.join(".")));
                parameters.insert("unsafe".into(), Value::Bool(safety.is_unsafe()));
            }
            Self::Pluck { recursive } => {
                parameters.insert("recursive".into(), Value::Bool(*recursive));
            }
            Self::Compose { first, second } => {
                parameters.extend(first.parameters());
                parameters.extend(second.parameters());
            }
            Self::Multi { keyed, arity } => {
                parameters.insert("multi".into(), Value::Bool(true));
                parameters.insert("keyed".into(), Value::Bool(*keyed));
                parameters.insert("arity".into(), Value::from(*arity));
            }
            Self::Disjunctive { .. } => {
                parameters.insert("disjunctive".into(), Value::Bool(true));
            }
            Self::Conjunctive { .. } => {
                parameters.insert("conjunctive".into(), Value::Bool(true));
            }
            Self::Optional { inner } => {
                parameters.extend(inner.parameters());
                parameters.insert("optional".into(), Value::Bool(true));
            }
            Self::Getter { inner } => {
                parameters.extend(inner.parameters());
                parameters.insert("getter".into(), Value::Bool(true));
            }
            Self::Setter { inner } => {
                parameters.extend(inner.parameters());
                parameters.insert("setter".into(), Value::Bool(true));
            }
        }
        parameters.insert("kind".into(), Value::from(self.name()));
        parameters
    }
}

/// Introspectable metadata attached to every lens.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    kind: LensKind,
    metadata: Map<String, Value>,
}

impl Flags {
    /// Flags for `kind` with no extra metadata.
    #[must_use]
    pub fn new(kind: LensKind) -> Self {
        Self {
            kind,
            metadata: Map::new(),
        }
    }

    /// Flags for `kind` carrying the metadata of `left` and `right`, the
    /// right-hand side winning on key collision.
    pub(crate) fn merged(kind: LensKind, left: &Self, right: &Self) -> Self {
        let mut metadata = left.metadata.clone();
        metadata.extend(right.metadata.clone());
        Self { kind, metadata }
    }

    /// Flags for `kind` keeping the metadata of `inner`.
    pub(crate) fn wrapping(kind: LensKind, inner: &Self) -> Self {
        Self {
            kind,
            metadata: inner.metadata.clone(),
        }
    }

    /// The kind of lens.
    #[must_use]
    pub const fn kind(&self) -> &LensKind {
        &self.kind
    }

    /// User-supplied metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Looks up a flag: user metadata first, then the kind's parameters.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.metadata
            .get(name)
            .cloned()
            .or_else(|| self.kind.parameters().remove(name))
    }

    /// Merges `extra` into the metadata, overwriting existing keys.
    pub fn extend(&mut self, extra: Map<String, Value>) {
        self.metadata.extend(extra);
    }

    /// All flags as one mapping (kind parameters overlaid with metadata).
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        let mut all = self.kind.parameters();
        all.extend(self.metadata.clone());
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_parameters() {
        let kind = LensKind::Index {
            index: 3,
            safety: Safety::Unsafe,
        };
        let parameters = kind.parameters();
        assert_eq!(parameters["index"], json!(3));
        assert_eq!(parameters["unsafe"], json!(true));
        assert_eq!(parameters["kind"], json!("index"));
    }

    #[test]
    fn test_wrapped_kind_reports_inner_parameters() {
        let kind = LensKind::Optional {
            inner: Box::new(LensKind::Getter {
                inner: Box::new(LensKind::Path {
                    segments: PathSegments::from_vec(vec!["a".into(), "b".into()]),
                    safety: Safety::Safe,
                }),
            }),
        };
        let parameters = kind.parameters();
        assert_eq!(parameters["path"], json!("a.b"));
        assert_eq!(parameters["getter"], json!(true));
        assert_eq!(parameters["optional"], json!(true));
        assert_eq!(parameters["kind"], json!("optional"));
        assert!(kind.is_getter());
        assert!(!kind.is_setter());
    }

    #[test]
    fn test_metadata_shadows_parameters() {
        let mut flags = Flags::new(LensKind::Pluck { recursive: false });
        let mut extra = Map::new();
        extra.insert("recursive".into(), json!("custom"));
        flags.extend(extra);
        assert_eq!(flags.get("recursive"), Some(json!("custom")));
        assert_eq!(flags.get("missing"), None);
    }

    #[test]
    fn test_merged_metadata_right_wins() {
        let mut left = Flags::new(LensKind::Filter);
        let mut right = Flags::new(LensKind::Identity);
        left.extend(serde_json::from_value(json!({"tag": "left", "only_left": 1})).unwrap());
        right.extend(serde_json::from_value(json!({"tag": "right"})).unwrap());
        let merged = Flags::merged(LensKind::Custom, &left, &right);
        assert_eq!(merged.get("tag"), Some(json!("right")));
        assert_eq!(merged.get("only_left"), Some(json!(1)));
    }

    #[test]
    fn test_safety_combine() {
        assert_eq!(Safety::Safe.combine(Safety::Safe), Safety::Safe);
        assert_eq!(Safety::Safe.combine(Safety::Unsafe), Safety::Unsafe);
    }
}
