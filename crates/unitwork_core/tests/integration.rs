//! End-to-end tests for the unit-of-work layer over the in-memory
//! backend.

use rust_decimal::Decimal;
use std::sync::{Arc, OnceLock};
use unitwork_core::{
    Anonymous, AuditAction, AuditSink, CoreConfig, CoreResult, Entity, EntitySchema, FieldValue,
    InMemoryBackend, MemoryAuditSink, PageRequest, QueryCache, RecordKey, Related, Row,
    ScalarKind, SchemaRegistry, StoreBackend, TableRef, UnitOfWork,
};

struct Customer {
    id: Option<i64>,
    name: String,
}

static CUSTOMER_SCHEMA: OnceLock<EntitySchema> = OnceLock::new();

impl Entity for Customer {
    fn schema() -> &'static EntitySchema {
        CUSTOMER_SCHEMA.get_or_init(|| {
            EntitySchema::builder("Customer", TableRef::new("dbo", "customers"))
                .key("id")
                .scalar("id", ScalarKind::Int)
                .scalar("name", ScalarKind::Text)
                .build()
        })
    }

    fn key(&self) -> Option<RecordKey> {
        self.id.map(RecordKey::Int)
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new();
        if let Some(id) = self.id {
            row.set("id", FieldValue::Int(id));
        }
        row.set("name", FieldValue::text(&self.name));
        row
    }

    fn from_row(key: &RecordKey, row: &Row) -> CoreResult<Self> {
        let id = match key {
            RecordKey::Int(v) => Some(*v),
            _ => None,
        };
        let name = row
            .get("name")
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string();
        Ok(Customer { id, name })
    }
}

struct Order {
    id: Option<i64>,
    amount: Decimal,
    customer: Option<Arc<Customer>>,
}

static ORDER_SCHEMA: OnceLock<EntitySchema> = OnceLock::new();

impl Entity for Order {
    fn schema() -> &'static EntitySchema {
        ORDER_SCHEMA.get_or_init(|| {
            EntitySchema::builder("Order", TableRef::new("dbo", "orders"))
                .key("id")
                .scalar("id", ScalarKind::Int)
                .scalar("amount", ScalarKind::Decimal)
                .nested("customer", "Customer")
                .build()
        })
    }

    fn key(&self) -> Option<RecordKey> {
        self.id.map(RecordKey::Int)
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new();
        if let Some(id) = self.id {
            row.set("id", FieldValue::Int(id));
        }
        row.set("amount", FieldValue::Decimal(self.amount));
        if let Some(customer) = &self.customer {
            row.set("customer", FieldValue::Record(Box::new(customer.to_row())));
        }
        row
    }

    fn from_row(key: &RecordKey, row: &Row) -> CoreResult<Self> {
        let id = match key {
            RecordKey::Int(v) => Some(*v),
            _ => None,
        };
        let amount = row
            .get("amount")
            .and_then(FieldValue::as_decimal)
            .unwrap_or_default();
        let customer = match row.get("customer").and_then(FieldValue::as_record) {
            Some(inner) => {
                let key = inner
                    .get("id")
                    .and_then(FieldValue::as_int)
                    .map_or(RecordKey::Int(0), RecordKey::Int);
                Some(Customer::from_row(&key, inner).map(Arc::new)?)
            }
            None => None,
        };
        Ok(Order {
            id,
            amount,
            customer,
        })
    }

    fn related(&self, navigation: &str) -> Related<'_> {
        match (navigation, &self.customer) {
            ("customer", Some(customer)) => Related::One(customer.as_ref()),
            _ => Related::None,
        }
    }
}

fn registry() -> Arc<SchemaRegistry> {
    Arc::new(
        SchemaRegistry::builder()
            .register::<Order>()
            .register::<Customer>()
            .build(),
    )
}

fn scope(backend: &Arc<InMemoryBackend>, sink: &Arc<MemoryAuditSink>) -> UnitOfWork {
    UnitOfWork::new(
        Arc::clone(backend) as Arc<dyn StoreBackend>,
        registry(),
        Arc::new(Anonymous),
        Arc::clone(sink) as Arc<dyn AuditSink>,
    )
}

fn order(amount: i64, customer: Option<&str>) -> Order {
    Order {
        id: None,
        amount: Decimal::from(amount),
        customer: customer.map(|name| {
            Arc::new(Customer {
                id: Some(1),
                name: name.to_string(),
            })
        }),
    }
}

#[test]
fn stage_save_query_page_round_trip() {
    let backend = Arc::new(InMemoryBackend::new());
    let sink = Arc::new(MemoryAuditSink::new());
    let mut uow = scope(&backend, &sink);

    // Stage 37 orders; nothing hits the store until save.
    uow.add_all((1..=37).map(|n| order(n, None)).collect::<Vec<_>>().iter());
    assert_eq!(uow.pending_count(), 37);
    assert_eq!(backend.row_count(Order::schema().table()), 0);

    let applied = uow.save_changes().unwrap();
    assert_eq!(applied, 37);
    assert_eq!(sink.len(), 37);
    assert!(sink
        .records()
        .iter()
        .all(|r| r.action == AuditAction::Insert && r.entity_type == "Order"));

    // Every page of the same query reports the same totals.
    let expected_sum = Decimal::from((1..=37i64).sum::<i64>());
    for page_index in 1..=4 {
        let request = PageRequest::new(page_index, 10).order_by("amount", false);
        let page = uow.query::<Order>().page(&request, Some("amount")).unwrap();
        assert_eq!(page.total_count, 37);
        assert_eq!(page.aggregate_sum, Some(expected_sum));
        assert_eq!(page.items.len(), if page_index == 4 { 7 } else { 10 });
    }
}

#[test]
fn find_and_mutate_cycle() {
    let backend = Arc::new(InMemoryBackend::new());
    let sink = Arc::new(MemoryAuditSink::new());
    let mut uow = scope(&backend, &sink);

    uow.add(&Order {
        id: Some(7),
        amount: Decimal::from(100),
        customer: None,
    });
    uow.save_changes().unwrap();

    let mut loaded: Order = uow.find(&RecordKey::Int(7)).unwrap().unwrap();
    assert_eq!(loaded.amount, Decimal::from(100));

    loaded.amount = Decimal::from(250);
    uow.update(&loaded);
    uow.save_changes().unwrap();

    let reloaded: Order = uow.find(&RecordKey::Int(7)).unwrap().unwrap();
    assert_eq!(reloaded.amount, Decimal::from(250));

    uow.remove(&reloaded);
    uow.save_changes().unwrap();
    assert!(uow.find::<Order>(&RecordKey::Int(7)).unwrap().is_none());

    let actions: Vec<AuditAction> = sink.records().iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Insert, AuditAction::Update, AuditAction::Delete]
    );
}

#[test]
fn nested_path_ordering_across_the_store() {
    let backend = Arc::new(InMemoryBackend::new());
    let sink = Arc::new(MemoryAuditSink::new());
    let mut uow = scope(&backend, &sink);

    uow.add(&order(1, Some("zola")));
    uow.add(&order(2, Some("abe")));
    uow.add(&order(3, Some("mira")));
    uow.save_changes().unwrap();

    let sorted = uow
        .query::<Order>()
        .include("customer")
        .unwrap()
        .order_by("customer.name", false)
        .unwrap()
        .all()
        .unwrap();
    let names: Vec<&str> = sorted
        .iter()
        .filter_map(|o| o.customer.as_deref().map(|c| c.name.as_str()))
        .collect();
    assert_eq!(names, vec!["abe", "mira", "zola"]);
}

#[test]
fn bulk_insert_skips_staging_and_audit() {
    let backend = Arc::new(InMemoryBackend::new());
    let sink = Arc::new(MemoryAuditSink::new());
    let uow = UnitOfWork::with_config(
        Arc::clone(&backend) as Arc<dyn StoreBackend>,
        registry(),
        Arc::new(Anonymous),
        Arc::clone(&sink) as Arc<dyn AuditSink>,
        CoreConfig::new().bulk_batch_size(500),
    );

    let orders: Vec<Order> = (0..1200).map(|n| order(n, None)).collect();
    let written = uow.bulk_insert(&orders).unwrap();

    assert_eq!(written, 1200);
    assert_eq!(backend.row_count(Order::schema().table()), 1200);
    assert!(sink.is_empty());
    assert_eq!(uow.pending_count(), 0);

    let count = uow.query::<Order>().count().unwrap();
    assert_eq!(count, 1200);
}

#[test]
fn cached_query_refreshes_after_invalidation() {
    let backend = Arc::new(InMemoryBackend::new());
    let sink = Arc::new(MemoryAuditSink::new());
    let mut uow = scope(&backend, &sink);
    let cache = QueryCache::new();

    uow.add(&order(10, None));
    uow.save_changes().unwrap();

    let count = cache
        .get_or_create("orders/count", || uow.query::<Order>().count())
        .unwrap();
    assert_eq!(*count, 1);

    uow.add(&order(20, None));
    uow.save_changes().unwrap();

    // The stale entry survives until invalidation bumps the generation.
    let stale = cache
        .get_or_create("orders/count", || uow.query::<Order>().count())
        .unwrap();
    assert_eq!(*stale, 1);

    cache.invalidate_all();
    let fresh = cache
        .get_or_create("orders/count", || uow.query::<Order>().count())
        .unwrap();
    assert_eq!(*fresh, 2);
}

#[test]
fn audit_failure_never_blocks_save() {
    let backend = Arc::new(InMemoryBackend::new());
    let sink = Arc::new(MemoryAuditSink::new());
    let mut uow = scope(&backend, &sink);

    sink.set_failing(true);
    uow.add(&order(5, None));
    let applied = uow.save_changes().unwrap();

    assert_eq!(applied, 1);
    assert_eq!(backend.row_count(Order::schema().table()), 1);
    assert!(sink.is_empty());
}
