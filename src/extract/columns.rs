/// Per-element column values and the generic column populator
use crate::element::{is_relationship_shaped, to_snake_case, MetadataElement, ReferenceableHeader};
use crate::spec::Column;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// A column bound for one element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnValue {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    /// `None` until something binds a value
    pub value: Option<Value>,
    /// snake_case form of `key`, the form element fields are stored under
    #[serde(skip)]
    pub canonical: String,
}

impl ColumnValue {
    fn unset(key: &str, label: &str, width: Option<usize>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            width,
            value: None,
            canonical: to_snake_case(key),
        }
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// True for the declared key or its snake_case form
    pub fn answers_to(&self, key: &str) -> bool {
        self.key == key || self.canonical == key
    }
}

/// The private column list for one element.
///
/// Built fresh from a spec's template for every element, so values bound for
/// one element can never show up on another.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnValues {
    columns: Vec<ColumnValue>,
}

impl ColumnValues {
    /// Copy a spec's column template with every value unset
    pub fn from_template(template: &[Column]) -> Self {
        let columns = template
            .iter()
            .map(|column| ColumnValue::unset(&column.key, column.heading(), column.width))
            .collect();
        Self { columns }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnValue> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn is_declared(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.answers_to(key))
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Bound value for `key`, if declared and set
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|c| c.answers_to(key))
            .and_then(|c| c.value.as_ref())
    }

    /// Bind a declared column, overwriting any earlier value.
    ///
    /// Undeclared keys are ignored; returns whether the key was declared.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        match self.columns.iter_mut().find(|c| c.answers_to(key)) {
            Some(column) => {
                column.value = Some(value);
                true
            }
            None => false,
        }
    }

    /// Bind a declared column only if nothing has bound it yet
    pub fn set_if_unset(&mut self, key: &str, value: Value) -> bool {
        match self.columns.iter_mut().find(|c| c.answers_to(key)) {
            Some(column) if column.value.is_none() => {
                column.value = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Bind a column, appending it when the spec did not declare it
    pub fn insert(&mut self, key: &str, value: Value) {
        if !self.set(key, value.clone()) {
            let mut column = ColumnValue::unset(key, key, None);
            column.value = Some(value);
            self.columns.push(column);
        }
    }

    /// Lay out the columns after the first `declared` ones as `appended`,
    /// adding an unset column for each key this element never received
    pub fn align_appended(&mut self, declared: usize, appended: &[String]) {
        let mut extra = self.columns.split_off(declared.min(self.columns.len()));
        for key in appended {
            match extra.iter().position(|c| c.key == *key) {
                Some(index) => self.columns.push(extra.swap_remove(index)),
                None => self.columns.push(ColumnValue::unset(key, key, None)),
            }
        }
    }

    /// Bind whatever the referenceable header carries for declared columns
    pub fn bind_header(&mut self, header: &ReferenceableHeader) {
        for (key, value) in header.column_values() {
            self.set_if_unset(key, value);
        }
    }

    /// Keys still unset
    pub fn unset_keys(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.value.is_none())
            .map(|c| c.key.as_str())
    }

    /// `{key: value}` view with `sentinel` in place of unset values
    pub fn to_map(&self, sentinel: &str) -> IndexMap<String, Value> {
        self.columns
            .iter()
            .map(|c| {
                let value = c
                    .value
                    .clone()
                    .unwrap_or_else(|| Value::String(sentinel.to_string()));
                (c.key.clone(), value)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ColumnValues {
    type Item = &'a ColumnValue;
    type IntoIter = std::slice::Iter<'a, ColumnValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Bind each declared, still-unset column from the element.
///
/// Properties are searched before the element's top level (the alternate
/// properties container was folded into `properties` at ingestion). Columns
/// are looked up by their snake_case form, so `requestType` and `request_type`
/// find the same field. Relationship collections are left for the relationship
/// augmenter; anything not found stays unset.
pub fn populate(element: &MetadataElement, columns: &mut ColumnValues) {
    for column in columns.columns.iter_mut().filter(|c| c.value.is_none()) {
        let found = element
            .property(&column.canonical)
            .into_iter()
            .chain(element.extra(&column.canonical))
            .find(|value| !is_relationship_shaped(value));
        if let Some(value) = found {
            column.value = Some(value.clone());
        }
    }
}

/// Text form of a bound value for text output formats
pub fn value_text(value: Option<&Value>, sentinel: &str) -> String {
    match value {
        None | Some(Value::Null) => sentinel.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) if items.iter().all(is_scalar) => items
            .iter()
            .map(|item| value_text(Some(item), sentinel))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
