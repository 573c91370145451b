//! Annotation values.
//!
//! An annotation is an immutable value: a stable identifier, a geometric
//! target in image pixel coordinates, and arbitrary metadata. "Mutation"
//! always goes through clone-with-override constructors such as [`Annotation::with_id`].
//!
//! Draft vs. committed is a tagged variant, not a flag: a [`Annotation::Draft`]
//! is an uncommitted selection fresh off a drawing tool, discarded on
//! deselect, while a [`Annotation::Committed`] is a durable record that is
//! re-rendered as a static shape when its selection ends.

use std::collections::BTreeMap;

use annokit_core::geometry::Geometry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable annotation identifier.
///
/// Identifiers are opaque strings so callers can use server-assigned ids;
/// drafts receive a generated UUID until an id is forced onto them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationId(String);

impl AnnotationId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier for a draft annotation.
    pub fn random() -> Self {
        Self(format!("#{}", Uuid::new_v4()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AnnotationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The data shared by both annotation variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBody {
    /// Stable identifier.
    pub id: AnnotationId,
    /// Geometric target in image pixel coordinates.
    pub target: Geometry,
    /// Arbitrary caller-owned metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Whether this annotation refuses in-place editing.
    #[serde(default)]
    pub read_only: bool,
    /// Creation time.
    pub created: DateTime<Utc>,
}

/// An annotation value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    /// An in-progress, not-yet-persisted selection.
    Draft(AnnotationBody),
    /// A durable annotation record.
    Committed(AnnotationBody),
}

impl Annotation {
    /// Creates a draft annotation with a generated identifier.
    pub fn draft(target: Geometry) -> Self {
        Annotation::Draft(AnnotationBody {
            id: AnnotationId::random(),
            target,
            metadata: BTreeMap::new(),
            read_only: false,
            created: Utc::now(),
        })
    }

    /// Creates a committed annotation with the given identifier.
    pub fn committed(id: impl Into<AnnotationId>, target: Geometry) -> Self {
        Annotation::Committed(AnnotationBody {
            id: id.into(),
            target,
            metadata: BTreeMap::new(),
            read_only: false,
            created: Utc::now(),
        })
    }

    /// The shared body of either variant.
    pub fn body(&self) -> &AnnotationBody {
        match self {
            Annotation::Draft(body) | Annotation::Committed(body) => body,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &AnnotationId {
        &self.body().id
    }

    /// Geometric target.
    pub fn target(&self) -> &Geometry {
        &self.body().target
    }

    /// Caller-owned metadata.
    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.body().metadata
    }

    /// Whether this annotation refuses in-place editing.
    pub fn is_read_only(&self) -> bool {
        self.body().read_only
    }

    /// Whether this is an uncommitted selection.
    pub fn is_draft(&self) -> bool {
        matches!(self, Annotation::Draft(_))
    }

    /// Clone-with-override: same value under a new identifier.
    pub fn with_id(&self, id: impl Into<AnnotationId>) -> Annotation {
        self.map_body(|mut body| {
            body.id = id.into();
            body
        })
    }

    /// Clone-with-override: same value with a new geometric target.
    pub fn with_target(&self, target: Geometry) -> Annotation {
        self.map_body(|mut body| {
            body.target = target;
            body
        })
    }

    /// Clone-with-override: same value with a metadata entry set.
    pub fn with_metadata(
        &self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Annotation {
        self.map_body(|mut body| {
            body.metadata.insert(key.into(), value);
            body
        })
    }

    /// Clone-with-override: same value marked read-only.
    pub fn with_read_only(&self, read_only: bool) -> Annotation {
        self.map_body(|mut body| {
            body.read_only = read_only;
            body
        })
    }

    /// Promotes a draft to a committed annotation. Committed values pass
    /// through unchanged.
    pub fn commit(self) -> Annotation {
        match self {
            Annotation::Draft(body) | Annotation::Committed(body) => Annotation::Committed(body),
        }
    }

    fn map_body(&self, f: impl FnOnce(AnnotationBody) -> AnnotationBody) -> Annotation {
        match self {
            Annotation::Draft(body) => Annotation::Draft(f(body.clone())),
            Annotation::Committed(body) => Annotation::Committed(f(body.clone())),
        }
    }
}

/// Anything that can stand in for an annotation identifier in lookups:
/// the identifier itself, or an annotation-like value exposing one.
pub trait AnnotationRef {
    /// The identifier this value refers to.
    fn id_ref(&self) -> &AnnotationId;
}

impl AnnotationRef for AnnotationId {
    fn id_ref(&self) -> &AnnotationId {
        self
    }
}

impl AnnotationRef for Annotation {
    fn id_ref(&self) -> &AnnotationId {
        self.id()
    }
}

impl<T: AnnotationRef + ?Sized> AnnotationRef for &T {
    fn id_ref(&self) -> &AnnotationId {
        (**self).id_ref()
    }
}
