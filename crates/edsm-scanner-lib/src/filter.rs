//! Statically enumerated queryable fields and single-comparison filters.
//!
//! Every field that may appear in a filter is listed in a registry with an
//! accessor function: [`SYSTEM_FIELDS`] for whole systems and [`BODY_FIELDS`]
//! for individual bodies. A [`Filter`] compares one registered field with a
//! literal, e.g. `DiscoveredStars > 1`, `IsFullyDiscovered == false` or
//! `ReserveLevel == "Pristine"`. A value the item does not have never matches.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::system::{SystemBody, SystemDetails};

/// Type of values a field produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Number,
    Boolean,
    Text,
    /// Several text values; `==` matches when any of them is equal.
    TextList,
}

impl FieldKind {
    fn supports(self, op: CompareOp) -> bool {
        match self {
            FieldKind::Integer | FieldKind::Number => true,
            FieldKind::Boolean | FieldKind::Text | FieldKind::TextList => {
                matches!(op, CompareOp::Eq | CompareOp::Ne)
            }
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Text => "text",
            FieldKind::TextList => "text list",
        };
        f.write_str(value)
    }
}

/// A field value or filter literal.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Text(String),
    TextList(Vec<String>),
}

impl FieldValue {
    fn as_number(&self) -> Option<f64> {
        match *self {
            FieldValue::Integer(value) => Some(value as f64),
            FieldValue::Number(value) => Some(value),
            _ => None,
        }
    }

    fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::Text(a), FieldValue::Text(b)) => {
                Some(a.to_lowercase().cmp(&b.to_lowercase()))
            }
            (a, b) => a.as_number()?.partial_cmp(&b.as_number()?),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Boolean(value) => write!(f, "{value}"),
            FieldValue::Text(value) => write!(f, "\"{value}\""),
            FieldValue::TextList(values) => write!(f, "{}", values.join(", ")),
        }
    }
}

/// A named, typed accessor over `T`.
pub struct QueryableField<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    accessor: fn(&T) -> Option<FieldValue>,
}

impl<T> QueryableField<T> {
    pub fn value(&self, item: &T) -> Option<FieldValue> {
        (self.accessor)(item)
    }
}

impl<T> fmt::Debug for QueryableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryableField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Types with a static field registry that filters can be written against.
pub trait Queryable: Sized + 'static {
    /// Registered fields, sorted by name.
    fn fields() -> &'static [QueryableField<Self>];
}

impl Queryable for SystemDetails {
    fn fields() -> &'static [QueryableField<Self>] {
        SYSTEM_FIELDS
    }
}

impl Queryable for SystemBody {
    fn fields() -> &'static [QueryableField<Self>] {
        BODY_FIELDS
    }
}

fn count(value: Option<usize>) -> Option<FieldValue> {
    value.and_then(|v| i64::try_from(v).ok()).map(FieldValue::Integer)
}

fn text(value: Option<&str>) -> Option<FieldValue> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| FieldValue::Text(v.to_string()))
}

/// Fields available to system filters, sorted by name.
pub static SYSTEM_FIELDS: &[QueryableField<SystemDetails>] = &[
    QueryableField {
        name: "BodyCount",
        kind: FieldKind::Integer,
        description: "expected number of bodies",
        accessor: |d| d.body_count.map(|c| FieldValue::Integer(i64::from(c))),
    },
    QueryableField {
        name: "DiscoveredBodies",
        kind: FieldKind::Integer,
        description: "number of bodies already discovered",
        accessor: |d| count(d.discovered_bodies()),
    },
    QueryableField {
        name: "DiscoveredStars",
        kind: FieldKind::Integer,
        description: "number of discovered stars",
        accessor: |d| count(d.discovered_stars()),
    },
    QueryableField {
        name: "Id64",
        kind: FieldKind::Integer,
        description: "system identity",
        accessor: |d| {
            d.id()
                .and_then(|id| i64::try_from(id.get()).ok())
                .map(FieldValue::Integer)
        },
    },
    QueryableField {
        name: "IsFullyDiscovered",
        kind: FieldKind::Boolean,
        description: "every expected body has been discovered",
        accessor: |d| d.is_fully_discovered().map(FieldValue::Boolean),
    },
    QueryableField {
        name: "ScoopableStars",
        kind: FieldKind::Integer,
        description: "number of discovered fuel-scoopable stars",
        accessor: |d| {
            count(
                d.bodies
                    .as_ref()
                    .map(|bodies| bodies.iter().filter(|b| b.is_scoopable()).count()),
            )
        },
    },
];

/// Fields available to body filters, sorted by name.
pub static BODY_FIELDS: &[QueryableField<SystemBody>] = &[
    QueryableField {
        name: "AtmosphereType",
        kind: FieldKind::Text,
        description: "atmosphere, e.g. \"Thin Ammonia\"",
        accessor: |b| text(b.atmosphere_type.as_deref()),
    },
    QueryableField {
        name: "DistanceToArrival",
        kind: FieldKind::Number,
        description: "distance from the arrival point in light-seconds",
        accessor: |b| b.distance_to_arrival.map(FieldValue::Number),
    },
    QueryableField {
        name: "Gravity",
        kind: FieldKind::Number,
        description: "surface gravity in g",
        accessor: |b| b.gravity.map(FieldValue::Number),
    },
    QueryableField {
        name: "IsLandable",
        kind: FieldKind::Boolean,
        description: "the body can be landed on",
        accessor: |b| b.is_landable.map(FieldValue::Boolean),
    },
    QueryableField {
        name: "IsScoopable",
        kind: FieldKind::Boolean,
        description: "a star that can be fuel-scooped",
        accessor: |b| Some(FieldValue::Boolean(b.is_scoopable())),
    },
    QueryableField {
        name: "IsStar",
        kind: FieldKind::Boolean,
        description: "the body is a star",
        accessor: |b| Some(FieldValue::Boolean(b.is_star())),
    },
    QueryableField {
        name: "ReserveLevel",
        kind: FieldKind::Text,
        description: "ring reserve level, e.g. \"Pristine\"",
        accessor: |b| text(b.reserve_level.as_deref()),
    },
    QueryableField {
        name: "RingTypes",
        kind: FieldKind::TextList,
        description: "types of the body's rings, e.g. \"Icy\"",
        accessor: |b| {
            b.rings.as_ref().map(|_| {
                FieldValue::TextList(b.ring_types().map(str::to_string).collect())
            })
        },
    },
    QueryableField {
        name: "SubType",
        kind: FieldKind::Text,
        description: "detailed class, e.g. \"Earth-like world\"",
        accessor: |b| text(b.sub_type.as_deref()),
    },
    QueryableField {
        name: "SurfacePressure",
        kind: FieldKind::Number,
        description: "surface pressure in atmospheres",
        accessor: |b| b.surface_pressure.map(FieldValue::Number),
    },
    QueryableField {
        name: "SurfaceTemperature",
        kind: FieldKind::Number,
        description: "surface temperature in kelvin",
        accessor: |b| b.surface_temperature.map(FieldValue::Number),
    },
    QueryableField {
        name: "TerraformingState",
        kind: FieldKind::Text,
        description: "terraforming state, e.g. \"Candidate for terraforming\"",
        accessor: |b| text(b.terraforming_state.as_deref()),
    },
    QueryableField {
        name: "Type",
        kind: FieldKind::Text,
        description: "\"Star\" or \"Planet\"",
        accessor: |b| text(Some(b.body_type.as_str())),
    },
];

/// Look up a registered field of `T`, ignoring case.
pub fn find_field<T: Queryable>(name: &str) -> Option<&'static QueryableField<T>> {
    T::fields()
        .iter()
        .find(|field| field.name.eq_ignore_ascii_case(name))
}

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// `<Field> <op> <literal>` over a registered field of `T`.
#[derive(Debug, Clone)]
pub struct Filter<T: 'static> {
    field: &'static QueryableField<T>,
    op: CompareOp,
    literal: FieldValue,
}

/// Filter over whole systems, e.g. `DiscoveredStars > 1`.
pub type FieldFilter = Filter<SystemDetails>;

/// Filter over single bodies, e.g. `SurfacePressure > 0`.
pub type BodyFilter = Filter<SystemBody>;

impl<T: Queryable> Filter<T> {
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidFilter {
            expression: expression.to_string(),
            message,
        };

        let (position, op) = find_operator(expression)
            .ok_or_else(|| invalid("expected one of ==, !=, <, <=, >, >=".to_string()))?;
        let name = expression[..position].trim();
        let literal = expression[position + op.symbol().len()..].trim();

        let field =
            find_field::<T>(name).ok_or_else(|| invalid(format!("unknown field '{name}'")))?;
        if literal.is_empty() {
            return Err(invalid("missing value".to_string()));
        }
        let literal = parse_literal(field.kind, literal)
            .ok_or_else(|| invalid(format!("{} expects a {} value", field.name, field.kind)))?;
        if !field.kind.supports(op) {
            return Err(invalid(format!("{} only supports == and !=", field.name)));
        }

        Ok(Self { field, op, literal })
    }

    pub fn field(&self) -> &'static QueryableField<T> {
        self.field
    }

    pub fn matches(&self, item: &T) -> bool {
        let Some(value) = self.field.value(item) else {
            return false;
        };
        match (&value, &self.literal) {
            (FieldValue::TextList(values), FieldValue::Text(wanted)) => {
                let found = values
                    .iter()
                    .any(|value| value.to_lowercase() == wanted.to_lowercase());
                found == (self.op == CompareOp::Eq)
            }
            _ => value
                .compare(&self.literal)
                .is_some_and(|ordering| self.op.accepts(ordering)),
        }
    }
}

impl<T: Queryable> FromStr for Filter<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<T: 'static> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field.name, self.op.symbol(), self.literal)
    }
}

/// True when `item` satisfies every filter.
pub fn matches_all<T: Queryable>(filters: &[Filter<T>], item: &T) -> bool {
    filters.iter().all(|filter| filter.matches(item))
}

/// Bodies of `details` that satisfy every body filter.
///
/// Empty when the bodies were never fetched.
pub fn matching_bodies<'a>(
    filters: &[BodyFilter],
    details: &'a SystemDetails,
) -> Vec<&'a SystemBody> {
    details
        .bodies
        .iter()
        .flatten()
        .filter(|body| matches_all(filters, *body))
        .collect()
}

/// True when no body filter is given, or when at least one body of `details`
/// satisfies all of them.
pub fn matches_any_body(filters: &[BodyFilter], details: &SystemDetails) -> bool {
    filters.is_empty() || !matching_bodies(filters, details).is_empty()
}

fn find_operator(expression: &str) -> Option<(usize, CompareOp)> {
    for (position, c) in expression.char_indices() {
        let rest = &expression[position..];
        let op = match c {
            '=' if rest.starts_with("==") => CompareOp::Eq,
            '!' if rest.starts_with("!=") => CompareOp::Ne,
            '<' if rest.starts_with("<=") => CompareOp::Le,
            '<' => CompareOp::Lt,
            '>' if rest.starts_with(">=") => CompareOp::Ge,
            '>' => CompareOp::Gt,
            _ => continue,
        };
        return Some((position, op));
    }
    None
}

fn parse_literal(kind: FieldKind, literal: &str) -> Option<FieldValue> {
    match kind {
        FieldKind::Boolean => {
            if literal.eq_ignore_ascii_case("true") {
                Some(FieldValue::Boolean(true))
            } else if literal.eq_ignore_ascii_case("false") {
                Some(FieldValue::Boolean(false))
            } else {
                None
            }
        }
        FieldKind::Integer | FieldKind::Number => {
            if let Ok(value) = literal.parse::<i64>() {
                return Some(FieldValue::Integer(value));
            }
            literal
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(FieldValue::Number)
        }
        FieldKind::Text | FieldKind::TextList => {
            let unquoted = unquote(literal);
            (!unquoted.is_empty()).then(|| FieldValue::Text(unquoted.to_string()))
        }
    }
}

fn unquote(literal: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = literal
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    literal
}
