//! Dynamic field value type.

use crate::row::Row;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use time::OffsetDateTime;
use uuid::Uuid;

/// A dynamic value held by one field of a row.
///
/// This type represents any value the store can carry. Scalar variants
/// map to relational columns; the `Record`/`Records` variants carry
/// owned navigation data for document-style backends and are never
/// treated as columns by the layers above.
///
/// Floats are intentionally not supported: monetary and aggregate
/// fields use [`Decimal`], which keeps ordering and summation exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Null value (permitted only in nullable columns).
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (full i64 range).
    Int(i64),
    /// Exact decimal value.
    Decimal(Decimal),
    /// Text string (UTF-8).
    Text(String),
    /// UUID value.
    Uuid(Uuid),
    /// UTC timestamp.
    Timestamp(OffsetDateTime),
    /// An embedded related row (nested navigation).
    Record(Box<Row>),
    /// A set of embedded related rows (collection navigation).
    Records(Vec<Row>),
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the integer value, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the decimal value, widening `Int` if needed.
    ///
    /// Used by aggregate summation, where integer columns are summed
    /// into an exact decimal.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(v) => Some(*v),
            Self::Int(v) => Some(Decimal::from(*v)),
            _ => None,
        }
    }

    /// Returns the embedded row, if this is a `Record`.
    #[must_use]
    pub fn as_record(&self) -> Option<&Row> {
        match self {
            Self::Record(row) => Some(row),
            _ => None,
        }
    }

    /// Returns true if this value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Rank used to order values of different variants.
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Decimal(_) => 3,
            Self::Text(_) => 4,
            Self::Uuid(_) => 5,
            Self::Timestamp(_) => 6,
            Self::Record(_) => 7,
            Self::Records(_) => 8,
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    /// Total ordering: values of different variants order by variant
    /// rank (nulls first), values of the same variant by content.
    ///
    /// Sorting never mixes variants for well-formed columns, but the
    /// ordering must still be total so that a sort over a column with
    /// nulls is deterministic.
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = self.rank().cmp(&other.rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Decimal(a), Self::Decimal(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Uuid(a), Self::Uuid(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Record(a), Self::Record(b)) => a.cmp(b),
            (Self::Records(a), Self::Records(b)) => match a.len().cmp(&b.len()) {
                Ordering::Equal => {
                    for (av, bv) in a.iter().zip(b.iter()) {
                        let ord = av.cmp(bv);
                        if ord != Ordering::Equal {
                            return ord;
                        }
                    }
                    Ordering::Equal
                }
                ord => ord,
            },
            // Equal ranks mean equal variants; nothing reaches here.
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_orders_first() {
        assert!(FieldValue::Null < FieldValue::Int(i64::MIN));
        assert!(FieldValue::Null < FieldValue::text(""));
    }

    #[test]
    fn int_ordering() {
        assert!(FieldValue::Int(-3) < FieldValue::Int(7));
    }

    #[test]
    fn decimal_widening() {
        let sum = FieldValue::Int(3).as_decimal().unwrap()
            + FieldValue::Decimal(Decimal::new(250, 2)).as_decimal().unwrap();
        assert_eq!(sum, Decimal::new(550, 2));
    }

    #[test]
    fn text_ordering_is_lexicographic() {
        assert!(FieldValue::text("alpha") < FieldValue::text("beta"));
    }

    #[test]
    fn mixed_variants_are_total() {
        let mut values = vec![
            FieldValue::text("x"),
            FieldValue::Null,
            FieldValue::Int(1),
            FieldValue::Bool(true),
        ];
        values.sort();
        assert_eq!(values[0], FieldValue::Null);
        assert_eq!(values[1], FieldValue::Bool(true));
    }
}
