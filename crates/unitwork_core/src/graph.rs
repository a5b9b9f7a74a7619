//! Entity graph traversal for upsert.

use crate::audit::AuditAction;
use crate::entity::{EntityNode, Related};
use std::collections::HashSet;
use unitwork_store::RecordKey;

/// Identity of a node during one traversal.
///
/// Persisted nodes dedupe by type and key; transient nodes (no key
/// yet) dedupe by instance address, which also breaks cycles through
/// unsaved entities.
#[derive(Debug, PartialEq, Eq, Hash)]
enum NodeId {
    Keyed(&'static str, RecordKey),
    Transient(usize),
}

fn node_id(node: &dyn EntityNode) -> NodeId {
    match node.node_key() {
        Some(key) => NodeId::Keyed(node.node_schema().type_name(), key),
        None => NodeId::Transient(node as *const dyn EntityNode as *const () as usize),
    }
}

/// Visits a root entity and the closure of related entities reachable
/// through its declared navigation fields, in pre-order.
///
/// Each node is classified purely by whether its identity field is
/// set: unset means [`AuditAction::Insert`], set means
/// [`AuditAction::Update`]. The store is never consulted. Every node
/// is visited exactly once; revisits (including cycles) are skipped.
pub(crate) fn visit_graph<F>(root: &dyn EntityNode, mut apply: F)
where
    F: FnMut(&dyn EntityNode, AuditAction),
{
    let mut visited = HashSet::new();
    visit_node(root, &mut visited, &mut apply);
}

fn visit_node<F>(node: &dyn EntityNode, visited: &mut HashSet<NodeId>, apply: &mut F)
where
    F: FnMut(&dyn EntityNode, AuditAction),
{
    if !visited.insert(node_id(node)) {
        return;
    }

    let action = if node.node_key().is_some() {
        AuditAction::Update
    } else {
        AuditAction::Insert
    };
    apply(node, action);

    for field in node.node_schema().fields() {
        if field.kind().navigation_target().is_none() {
            continue;
        }
        match node.node_related(field.name()) {
            Related::None => {}
            Related::One(child) => visit_node(child, visited, apply),
            Related::Many(children) => {
                for child in children {
                    visit_node(child, visited, apply);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::error::CoreResult;
    use crate::schema::{EntitySchema, ScalarKind};
    use std::sync::{Arc, OnceLock};
    use unitwork_store::{FieldValue, Row, TableRef};

    struct Node {
        id: Option<i64>,
        next: OnceLock<Arc<Node>>,
    }

    impl Node {
        fn new(id: Option<i64>) -> Arc<Self> {
            Arc::new(Self {
                id,
                next: OnceLock::new(),
            })
        }
    }

    static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();

    impl Entity for Node {
        fn schema() -> &'static EntitySchema {
            SCHEMA.get_or_init(|| {
                EntitySchema::builder("Node", TableRef::new("dbo", "nodes"))
                    .key("id")
                    .scalar("id", ScalarKind::Int)
                    .nested("next", "Node")
                    .build()
            })
        }

        fn key(&self) -> Option<unitwork_store::RecordKey> {
            self.id.map(RecordKey::Int)
        }

        fn to_row(&self) -> Row {
            let mut row = Row::new();
            if let Some(id) = self.id {
                row.set("id", FieldValue::Int(id));
            }
            row
        }

        fn from_row(key: &RecordKey, _row: &Row) -> CoreResult<Self> {
            let id = match key {
                RecordKey::Int(v) => Some(*v),
                _ => None,
            };
            Ok(Node {
                id,
                next: OnceLock::new(),
            })
        }

        fn related(&self, navigation: &str) -> Related<'_> {
            match (navigation, self.next.get()) {
                ("next", Some(next)) => Related::One(next.as_ref()),
                _ => Related::None,
            }
        }
    }

    fn collect(root: &dyn EntityNode) -> Vec<(Option<i64>, AuditAction)> {
        let mut seen = Vec::new();
        visit_graph(root, |node, action| {
            let id = match node.node_key() {
                Some(RecordKey::Int(v)) => Some(v),
                _ => None,
            };
            seen.push((id, action));
        });
        seen
    }

    #[test]
    fn keyed_nodes_are_updates_and_transient_nodes_inserts() {
        let child = Node::new(None);
        let root = Node::new(Some(1));
        root.next.set(child).ok().unwrap();

        let seen = collect(root.as_ref());
        assert_eq!(
            seen,
            vec![(Some(1), AuditAction::Update), (None, AuditAction::Insert)]
        );
    }

    #[test]
    fn cycles_terminate() {
        let a = Node::new(Some(1));
        let b = Node::new(Some(2));
        b.next.set(Arc::clone(&a)).ok().unwrap();
        a.next.set(Arc::clone(&b)).ok().unwrap();

        let seen = collect(a.as_ref());
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn keyed_node_reached_twice_is_visited_once() {
        let shared = Node::new(Some(7));
        let a = Node::new(Some(1));
        a.next.set(Arc::clone(&shared)).ok().unwrap();

        // Same keyed node again through a second traversal entry.
        let seen = collect(a.as_ref());
        assert_eq!(seen.len(), 2);

        let again = collect(shared.as_ref());
        assert_eq!(again.len(), 1);
    }
}
