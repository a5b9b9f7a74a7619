//! Dotted field paths resolved against entity metadata.

use crate::entity::{EntityNode, Related};
use crate::error::{CoreError, CoreResult};
use crate::schema::{EntitySchema, FieldKind, SchemaRegistry};
use unitwork_store::FieldValue;

/// Sort direction for an order clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// A parsed dotted field path, e.g. `contract.length`.
///
/// Parsing checks only the shape; [`FieldPath::resolve`] validates
/// every segment against declared metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path.
    ///
    /// Fails on an empty path or an empty segment (`a..b`).
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CoreError::invalid_sort_field(raw, ""));
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if let Some(empty) = segments.iter().find(|s| s.is_empty()) {
            return Err(CoreError::invalid_sort_field(raw, empty.clone()));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Returns the path as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Resolves this path as an order/aggregate clause.
    ///
    /// Every segment but the last must be a nested navigation; the
    /// last must be a scalar field. Fails with
    /// [`CoreError::InvalidSortField`] on the first segment that does
    /// not resolve.
    pub fn resolve(
        &self,
        root: &'static EntitySchema,
        registry: &SchemaRegistry,
    ) -> CoreResult<ResolvedPath> {
        let mut schema = root;
        let last = self.segments.len() - 1;
        for (index, segment) in self.segments.iter().enumerate() {
            let field = schema
                .field(segment)
                .ok_or_else(|| CoreError::invalid_sort_field(&self.raw, segment))?;
            if index == last {
                if !field.kind().is_scalar() {
                    return Err(CoreError::invalid_sort_field(&self.raw, segment));
                }
            } else {
                // Collections cannot be traversed by an order clause.
                let target = match field.kind() {
                    FieldKind::Nested { target } => target,
                    FieldKind::Scalar { .. } | FieldKind::Collection { .. } => {
                        return Err(CoreError::invalid_sort_field(&self.raw, segment))
                    }
                };
                schema = registry
                    .get(target)
                    .ok_or_else(|| CoreError::invalid_sort_field(&self.raw, segment))?;
            }
        }
        Ok(ResolvedPath {
            raw: self.raw.clone(),
            segments: self.segments.clone(),
        })
    }

    /// Validates this path as an include directive.
    ///
    /// Every segment must be a navigation field.
    pub(crate) fn validate_navigation(
        &self,
        root: &'static EntitySchema,
        registry: &SchemaRegistry,
    ) -> CoreResult<()> {
        let mut schema = root;
        for segment in &self.segments {
            let target = schema
                .navigation(segment)
                .and_then(|f| f.kind().navigation_target())
                .ok_or_else(|| {
                    CoreError::invalid_operation(format!(
                        "include path `{}` does not resolve: unknown navigation `{segment}`",
                        self.raw
                    ))
                })?;
            schema = registry.get(target).ok_or_else(|| {
                CoreError::invalid_operation(format!(
                    "include path `{}` references unregistered type `{target}`",
                    self.raw
                ))
            })?;
        }
        Ok(())
    }
}

/// A field path validated against entity metadata.
///
/// Resolution happens once at composition time; evaluation against
/// live entities can no longer fail, only come up empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    raw: String,
    segments: Vec<String>,
}

impl ResolvedPath {
    /// Returns the path as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Evaluates the path against an entity instance.
    ///
    /// Returns `None` when a navigation along the path is not loaded
    /// or the terminal field is absent from the row.
    #[must_use]
    pub fn evaluate(&self, node: &dyn EntityNode) -> Option<FieldValue> {
        let last = self.segments.len() - 1;
        let mut current = node;
        for segment in &self.segments[..last] {
            match current.node_related(segment) {
                Related::One(child) => current = child,
                Related::None | Related::Many(_) => return None,
            }
        }
        current.node_row().get(&self.segments[last]).cloned()
    }
}
