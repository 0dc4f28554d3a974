//! Store-agnostic record filters.
//!
//! A [`Filter`] is a conjunction of conditions. The in-memory store evaluates it
//! with [`Filter::matches`]; the MongoDB store translates it with
//! [`Filter::to_document`].

use {
    crate::models::{FieldValue, Record},
    mongodb::bson::{Bson, Document, doc},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact equality.
    Equals(&'static str, FieldValue),
    /// Exact string match, ignoring case. Not a substring match.
    EqualsIgnoreCase(&'static str, String),
    /// Field value is one of the given values.
    In(&'static str, Vec<FieldValue>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// A filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(Condition::Equals(field, value.into()));
        self
    }

    pub fn eq_ignore_case(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::EqualsIgnoreCase(field, value.into()));
        self
    }

    pub fn is_in<V: Into<FieldValue>>(
        mut self,
        field: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition::In(
            field,
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Equals(field, expected) => record.field(field).as_ref() == Some(expected),
            Condition::EqualsIgnoreCase(field, expected) => match record.field(field) {
                Some(FieldValue::Text(actual)) => actual.to_lowercase() == expected.to_lowercase(),
                _ => false,
            },
            Condition::In(field, values) => record
                .field(field)
                .is_some_and(|actual| values.contains(&actual)),
        })
    }

    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();

        for condition in &self.conditions {
            match condition {
                Condition::Equals(field, value) => {
                    filter.insert(*field, to_bson(value));
                }
                Condition::EqualsIgnoreCase(field, value) => {
                    let pattern = format!("^{}$", escape_regex(value));
                    filter.insert(*field, doc! { "$regex": pattern, "$options": "i" });
                }
                Condition::In(field, values) => {
                    let values: Vec<Bson> = values.iter().map(to_bson).collect();
                    filter.insert(*field, doc! { "$in": values });
                }
            }
        }

        filter
    }
}

fn to_bson(value: &FieldValue) -> Bson {
    match value {
        FieldValue::Id(oid) => Bson::ObjectId(*oid),
        FieldValue::Text(text) => Bson::String(text.clone()),
        FieldValue::Date(date) => Bson::String(date.format("%Y-%m-%d").to_string()),
    }
}

fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
