//! Shape detection for raw outcome payloads.
//!
//! Studies report outcome groups in three historical wire shapes. Rather
//! than sniffing fields ad hoc at chart time, the payload is classified
//! once into an explicit [`OutcomeShape`] variant; anything that matches
//! none of the shapes is an [`UnrecognizedOutcomeShape`] error, never a
//! silent misread.
//!
//! [`UnrecognizedOutcomeShape`]: crate::ChartError::UnrecognizedOutcomeShape

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use panacea_model::{DosageGroup, OutcomePayload, StudyOutcome};

use crate::error::{ChartError, Result};

/// `{label, data: {category: value}}`: one record per dosage group with
/// a category-keyed value object.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedObjectEntry {
    pub label: String,
    pub data: IndexMap<String, f64>,
}

/// One `{group, value}` pair inside a pair-list record.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupValue {
    pub group: String,
    pub value: f64,
}

/// `{group, values: {group, value}[]}`: one record per dosage group with
/// an inner list of cohort/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PairListEntry {
    pub group: String,
    pub values: Vec<GroupValue>,
}

/// `{group, baseline, change}`: one record per cohort; the charted value
/// is `baseline + change`.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineDeltaEntry {
    pub group: String,
    pub baseline: f64,
    pub change: f64,
}

/// The accepted outcome source shapes, fully parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeShape {
    GroupedObject(Vec<GroupedObjectEntry>),
    PairList(Vec<PairListEntry>),
    BaselineDelta(Vec<BaselineDeltaEntry>),
}

impl OutcomeShape {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GroupedObject(_) => "grouped-object",
            Self::PairList(_) => "pair-list",
            Self::BaselineDelta(_) => "baseline-delta",
        }
    }
}

/// Classify a non-empty record list into one of the accepted shapes.
///
/// Every record must parse under the variant the first record selects;
/// a mixed or unreadable list is reported with its record index. Callers
/// handle the empty list before detection (it normalizes to "no data").
pub fn detect_shape(metric: &str, records: &[Value]) -> Result<OutcomeShape> {
    let first = records
        .first()
        .ok_or_else(|| ChartError::shape(metric, "empty record list has no shape"))?;
    let Some(object) = first.as_object() else {
        return Err(ChartError::shape(metric, "record 0 is not an object"));
    };

    let shape = if object.contains_key("data") {
        let entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| parse_grouped_object(metric, index, record))
            .collect::<Result<Vec<_>>>()?;
        OutcomeShape::GroupedObject(entries)
    } else if object.contains_key("values") {
        let entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| parse_pair_list(metric, index, record))
            .collect::<Result<Vec<_>>>()?;
        OutcomeShape::PairList(entries)
    } else if object.contains_key("baseline") && object.contains_key("change") {
        let entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| parse_baseline_delta(metric, index, record))
            .collect::<Result<Vec<_>>>()?;
        OutcomeShape::BaselineDelta(entries)
    } else {
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        return Err(ChartError::shape(
            metric,
            format!("record 0 keys {keys:?} match no accepted shape"),
        ));
    };

    debug!(metric, kind = shape.kind(), records = records.len(), "detected outcome shape");
    Ok(shape)
}

/// Parse a raw outcome payload into the canonical dosage-group model.
///
/// An absent or empty group list parses to an outcome with zero groups,
/// which downstream normalization treats as "no data".
pub fn parse_outcome(payload: &OutcomePayload) -> Result<StudyOutcome> {
    let records = match &payload.groups {
        Value::Null => &[][..],
        Value::Array(records) => records.as_slice(),
        other => {
            return Err(ChartError::shape(
                &payload.name,
                format!("group payload is {}, expected an array", json_kind(other)),
            ));
        }
    };

    let groups = if records.is_empty() {
        Vec::new()
    } else {
        detect_shape(&payload.name, records)?.into_groups(&payload.name)
    };

    Ok(StudyOutcome {
        metric_name: payload.name.clone(),
        units: payload.units.clone(),
        summary: payload.description.clone(),
        groups,
    })
}

impl OutcomeShape {
    /// Flatten the shape into ordered dosage groups.
    ///
    /// Baseline/delta records carry no category axis, so they become a
    /// single series named after the metric itself.
    pub fn into_groups(self, metric: &str) -> Vec<DosageGroup> {
        match self {
            Self::GroupedObject(entries) => entries
                .into_iter()
                .map(|entry| DosageGroup {
                    label: entry.label,
                    values: entry.data,
                })
                .collect(),
            Self::PairList(entries) => entries
                .into_iter()
                .map(|entry| DosageGroup {
                    label: entry.group,
                    values: entry
                        .values
                        .into_iter()
                        .map(|pair| (pair.group, pair.value))
                        .collect(),
                })
                .collect(),
            Self::BaselineDelta(entries) => entries
                .into_iter()
                .map(|entry| {
                    let mut values = IndexMap::new();
                    values.insert(metric.to_string(), entry.baseline + entry.change);
                    DosageGroup {
                        label: entry.group,
                        values,
                    }
                })
                .collect(),
        }
    }
}

fn parse_grouped_object(metric: &str, index: usize, record: &Value) -> Result<GroupedObjectEntry> {
    let label = entry_label(record)
        .ok_or_else(|| ChartError::shape(metric, format!("record {index} has no label")))?;
    let data = record
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ChartError::shape(metric, format!("record {index} has no 'data' object"))
        })?;

    let mut values = IndexMap::with_capacity(data.len());
    for (category, value) in data {
        values.insert(category.clone(), finite_number(metric, index, value)?);
    }
    Ok(GroupedObjectEntry {
        label: label.to_string(),
        data: values,
    })
}

fn parse_pair_list(metric: &str, index: usize, record: &Value) -> Result<PairListEntry> {
    let group = entry_label(record)
        .ok_or_else(|| ChartError::shape(metric, format!("record {index} has no group label")))?;
    let pairs = record
        .get("values")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ChartError::shape(metric, format!("record {index} has no 'values' array"))
        })?;

    let mut values = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let inner_group = pair.get("group").and_then(Value::as_str).ok_or_else(|| {
            ChartError::shape(metric, format!("record {index} has a pair without a group"))
        })?;
        let value = pair.get("value").ok_or_else(|| {
            ChartError::shape(metric, format!("record {index} has a pair without a value"))
        })?;
        values.push(GroupValue {
            group: inner_group.to_string(),
            value: finite_number(metric, index, value)?,
        });
    }
    Ok(PairListEntry {
        group: group.to_string(),
        values,
    })
}

fn parse_baseline_delta(metric: &str, index: usize, record: &Value) -> Result<BaselineDeltaEntry> {
    let group = entry_label(record)
        .ok_or_else(|| ChartError::shape(metric, format!("record {index} has no group label")))?;
    let baseline = record.get("baseline").ok_or_else(|| {
        ChartError::shape(metric, format!("record {index} has no 'baseline' value"))
    })?;
    let change = record.get("change").ok_or_else(|| {
        ChartError::shape(metric, format!("record {index} has no 'change' value"))
    })?;
    Ok(BaselineDeltaEntry {
        group: group.to_string(),
        baseline: finite_number(metric, index, baseline)?,
        change: finite_number(metric, index, change)?,
    })
}

/// Group labels arrive as "label" from the ETL and "group" from older
/// payloads; both name the same field.
fn entry_label(record: &Value) -> Option<&str> {
    record
        .get("label")
        .or_else(|| record.get("group"))
        .and_then(Value::as_str)
}

fn finite_number(metric: &str, index: usize, value: &Value) -> Result<f64> {
    match value.as_f64() {
        Some(number) if number.is_finite() => Ok(number),
        Some(_) => Err(ChartError::shape(
            metric,
            format!("record {index} contains a non-finite number"),
        )),
        None => Err(ChartError::shape(
            metric,
            format!("record {index} contains a non-numeric value ({})", json_kind(value)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
