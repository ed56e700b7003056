//! Conference query composition
//!
//! Translates user-supplied field/operator/value filters into a validated
//! SQL query plan. The backing store permits inequality comparisons on at
//! most one field per query, and when one is present the result set must be
//! ordered by that field first; equality filters combine without restriction.

use conclave_common::db::models::Conference;
use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;

/// A raw filter as submitted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct ConferenceFilter {
    pub field: String,
    pub operator: String,
    pub value: String,
}

/// Queryable conference fields, resolved from fixed field tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    City,
    Topics,
    Month,
    MaxAttendees,
}

impl FilterField {
    /// Fixed token lookup: unknown tokens are rejected
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "CITY" => Some(FilterField::City),
            "TOPIC" => Some(FilterField::Topics),
            "MONTH" => Some(FilterField::Month),
            "MAX_ATTENDEES" => Some(FilterField::MaxAttendees),
            _ => None,
        }
    }

    /// Backing column name
    pub fn column(self) -> &'static str {
        match self {
            FilterField::City => "city",
            FilterField::Topics => "topics",
            FilterField::Month => "month",
            FilterField::MaxAttendees => "max_attendees",
        }
    }

    /// Month and maxAttendees values must coerce to integers
    fn is_integer(self) -> bool {
        matches!(self, FilterField::Month | FilterField::MaxAttendees)
    }
}

/// Comparison operators, resolved from fixed operator tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl FilterOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "EQ" => Some(FilterOp::Eq),
            "NE" => Some(FilterOp::Ne),
            "LT" => Some(FilterOp::Lt),
            "LTEQ" => Some(FilterOp::LtEq),
            "GT" => Some(FilterOp::Gt),
            "GTEQ" => Some(FilterOp::GtEq),
            _ => None,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Lt => "<",
            FilterOp::LtEq => "<=",
            FilterOp::Gt => ">",
            FilterOp::GtEq => ">=",
        }
    }

    /// Everything except "=" counts as an inequality
    fn is_equality(self) -> bool {
        matches!(self, FilterOp::Eq)
    }
}

/// A typed filter value, coerced during validation
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
}

/// A validated (field, comparator, typed value) predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: FilterField,
    pub op: FilterOp,
    pub value: FilterValue,
}

/// Filter validation failures, all surfaced to the caller as bad requests
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("Filter contains invalid field: {0}")]
    InvalidField(String),

    #[error("Filter contains invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Filter value for {field} must be an integer: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Inequality filter is allowed on only one field (got {0} and {1})")]
    MultipleInequalityFields(&'static str, &'static str),
}

/// A validated query plan: AND-composed predicates plus the ordering rule
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub inequality_field: Option<FilterField>,
}

impl QueryPlan {
    /// Validate a filter batch in input order and build the plan.
    ///
    /// A second distinct field used with a non-equality operator rejects
    /// the entire batch.
    pub fn build(filters: &[ConferenceFilter]) -> Result<Self, FilterError> {
        let mut predicates = Vec::with_capacity(filters.len());
        let mut inequality_field: Option<FilterField> = None;

        for filter in filters {
            let field = FilterField::from_token(&filter.field)
                .ok_or_else(|| FilterError::InvalidField(filter.field.clone()))?;
            let op = FilterOp::from_token(&filter.operator)
                .ok_or_else(|| FilterError::InvalidOperator(filter.operator.clone()))?;

            let value = if field.is_integer() {
                let parsed = filter.value.trim().parse::<i64>().map_err(|_| {
                    FilterError::InvalidValue {
                        field: field.column(),
                        value: filter.value.clone(),
                    }
                })?;
                FilterValue::Int(parsed)
            } else {
                FilterValue::Text(filter.value.clone())
            };

            if !op.is_equality() {
                match inequality_field {
                    Some(existing) if existing != field => {
                        return Err(FilterError::MultipleInequalityFields(
                            existing.column(),
                            field.column(),
                        ));
                    }
                    _ => inequality_field = Some(field),
                }
            }

            predicates.push(Predicate { field, op, value });
        }

        Ok(QueryPlan {
            predicates,
            inequality_field,
        })
    }

    /// Ordering rule: the inequality field (when present) must be the first
    /// sort key, with conference name as the deterministic tie-break.
    pub fn order_by(&self) -> String {
        match self.inequality_field {
            Some(field) => format!("{} ASC, name ASC", field.column()),
            None => "name ASC".to_string(),
        }
    }

    /// Render the full SELECT with positional binds.
    ///
    /// Topics is a JSON array column; predicates against it compare
    /// element-wise so an equality filter matches any contained topic.
    pub fn to_sql(&self) -> (String, Vec<FilterValue>) {
        let mut sql = String::from(
            "SELECT id, organizer_user_id, name, description, city, topics, \
             start_date, end_date, month, max_attendees, seats_available, created_at \
             FROM conferences",
        );
        let mut binds = Vec::with_capacity(self.predicates.len());

        for (i, predicate) in self.predicates.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            match predicate.field {
                FilterField::Topics => {
                    sql.push_str(&format!(
                        "EXISTS (SELECT 1 FROM json_each(conferences.topics) \
                         WHERE json_each.value {} ?)",
                        predicate.op.sql()
                    ));
                }
                _ => {
                    sql.push_str(&format!(
                        "{} {} ?",
                        predicate.field.column(),
                        predicate.op.sql()
                    ));
                }
            }
            binds.push(predicate.value.clone());
        }

        sql.push_str(&format!(" ORDER BY {}", self.order_by()));
        (sql, binds)
    }

    /// Execute the plan against the conference collection
    pub async fn fetch(&self, pool: &SqlitePool) -> sqlx::Result<Vec<Conference>> {
        let (sql, binds) = self.to_sql();
        let mut query = sqlx::query_as::<_, Conference>(&sql);
        for value in binds {
            query = match value {
                FilterValue::Text(s) => query.bind(s),
                FilterValue::Int(i) => query.bind(i),
            };
        }
        query.fetch_all(pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(field: &str, operator: &str, value: &str) -> ConferenceFilter {
        ConferenceFilter {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let plan = QueryPlan::build(&[filter("MAX_ATTENDEES", "GTEQ", "10")]).unwrap();
        assert_eq!(
            plan.predicates,
            vec![Predicate {
                field: FilterField::MaxAttendees,
                op: FilterOp::GtEq,
                value: FilterValue::Int(10),
            }]
        );
    }

    #[test]
    fn test_invalid_field_rejected() {
        let err = QueryPlan::build(&[filter("COUNTRY", "EQ", "x")]).unwrap_err();
        assert_eq!(err, FilterError::InvalidField("COUNTRY".to_string()));
    }

    #[test]
    fn test_invalid_operator_rejected() {
        let err = QueryPlan::build(&[filter("CITY", "LIKE", "x")]).unwrap_err();
        assert_eq!(err, FilterError::InvalidOperator("LIKE".to_string()));
    }

    #[test]
    fn test_non_integer_value_rejected() {
        let err = QueryPlan::build(&[filter("MONTH", "EQ", "June")]).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidValue {
                field: "month",
                value: "June".to_string(),
            }
        );
        assert!(QueryPlan::build(&[filter("MAX_ATTENDEES", "GT", "lots")]).is_err());
    }

    #[test]
    fn test_multiple_inequality_fields_rejected_regardless_of_order() {
        let a = filter("MONTH", "GT", "3");
        let b = filter("MAX_ATTENDEES", "LT", "100");
        let err = QueryPlan::build(&[a.clone(), b.clone()]).unwrap_err();
        assert_eq!(
            err,
            FilterError::MultipleInequalityFields("month", "max_attendees")
        );
        let err = QueryPlan::build(&[b, a]).unwrap_err();
        assert_eq!(
            err,
            FilterError::MultipleInequalityFields("max_attendees", "month")
        );
    }

    #[test]
    fn test_equality_between_inequalities_is_allowed() {
        let plan = QueryPlan::build(&[
            filter("MONTH", "GT", "3"),
            filter("CITY", "EQ", "London"),
            filter("MONTH", "LTEQ", "6"),
        ])
        .unwrap();
        assert_eq!(plan.inequality_field, Some(FilterField::Month));
        assert_eq!(plan.predicates.len(), 3);
    }

    #[test]
    fn test_same_field_repeated_inequality_is_allowed() {
        let plan = QueryPlan::build(&[
            filter("MAX_ATTENDEES", "GTEQ", "10"),
            filter("MAX_ATTENDEES", "LT", "500"),
        ])
        .unwrap();
        assert_eq!(plan.inequality_field, Some(FilterField::MaxAttendees));
    }

    #[test]
    fn test_ne_counts_as_inequality() {
        let err = QueryPlan::build(&[
            filter("CITY", "NE", "Paris"),
            filter("MONTH", "GT", "2"),
        ])
        .unwrap_err();
        assert_eq!(err, FilterError::MultipleInequalityFields("city", "month"));
    }

    #[test]
    fn test_inequality_field_is_primary_sort_key() {
        let plan = QueryPlan::build(&[filter("MONTH", "GT", "3")]).unwrap();
        assert_eq!(plan.order_by(), "month ASC, name ASC");

        let plan = QueryPlan::build(&[filter("CITY", "NE", "Paris")]).unwrap();
        assert_eq!(plan.order_by(), "city ASC, name ASC");
    }

    #[test]
    fn test_equality_only_orders_by_name() {
        let plan = QueryPlan::build(&[
            filter("CITY", "EQ", "London"),
            filter("TOPIC", "EQ", "Rust"),
        ])
        .unwrap();
        assert_eq!(plan.order_by(), "name ASC");
    }

    #[test]
    fn test_empty_batch_orders_by_name() {
        let plan = QueryPlan::build(&[]).unwrap();
        assert_eq!(plan.order_by(), "name ASC");
        let (sql, binds) = plan.to_sql();
        assert!(sql.ends_with("ORDER BY name ASC"));
        assert!(!sql.contains("WHERE"));
        assert!(binds.is_empty());
    }

    #[test]
    fn test_sql_rendering() {
        let plan = QueryPlan::build(&[
            filter("CITY", "EQ", "London"),
            filter("MAX_ATTENDEES", "GT", "10"),
        ])
        .unwrap();
        let (sql, binds) = plan.to_sql();
        assert!(sql.contains("WHERE city = ? AND max_attendees > ?"));
        assert!(sql.ends_with("ORDER BY max_attendees ASC, name ASC"));
        assert_eq!(
            binds,
            vec![
                FilterValue::Text("London".to_string()),
                FilterValue::Int(10)
            ]
        );
    }

    #[test]
    fn test_topic_predicate_renders_element_wise() {
        let plan = QueryPlan::build(&[filter("TOPIC", "EQ", "Rust")]).unwrap();
        let (sql, _) = plan.to_sql();
        assert!(sql.contains("json_each(conferences.topics)"));
        assert!(sql.contains("json_each.value = ?"));
    }
}
