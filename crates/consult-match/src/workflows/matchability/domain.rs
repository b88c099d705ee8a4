use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier wrapper for consultant profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultantId(pub String);

impl fmt::Display for ConsultantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const DEFAULT_CURRENCY: &str = "SEK";

/// Criteria a posted assignment is scored against. Defaults are already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentCriteria {
    pub required_skills: Vec<String>,
    pub budget_min: f64,
    /// `None` means the budget has no upper bound.
    pub budget_max: Option<f64>,
    pub currency: String,
}

impl AssignmentCriteria {
    pub fn new<I, S>(required_skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_skills: required_skills.into_iter().map(Into::into).collect(),
            budget_min: 0.0,
            budget_max: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn with_budget(mut self, min: f64, max: Option<f64>) -> Self {
        self.budget_min = min;
        self.budget_max = max;
        self
    }
}

/// Assignment data as posted by the front end.
///
/// Every field is optional on the wire and a value of the wrong type reads as if it were absent,
/// so a sloppy client still gets a prediction instead of an extractor rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPayload {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub required_skills: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_min: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_max: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<String>,
}

impl From<AssignmentPayload> for AssignmentCriteria {
    fn from(payload: AssignmentPayload) -> Self {
        let required_skills = payload
            .required_skills
            .into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect();

        Self {
            required_skills,
            budget_min: payload.budget_min.filter(|min| min.is_finite()).unwrap_or(0.0),
            budget_max: payload.budget_max.filter(|max| max.is_finite()),
            currency: payload
                .currency
                .map(|currency| currency.trim().to_ascii_uppercase())
                .filter(|currency| !currency.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        }
    }
}

/// Availability status as stored on the consultant profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Availability {
    Available,
    Busy,
    Unavailable,
    Other(String),
}

impl Availability {
    pub fn label(&self) -> &str {
        match self {
            Self::Available => "Available",
            Self::Busy => "Busy",
            Self::Unavailable => "Unavailable",
            Self::Other(value) => value,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl From<String> for Availability {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Self::Available,
            "busy" => Self::Busy,
            "unavailable" | "not available" => Self::Unavailable,
            _ => Self::Other(value.trim().to_string()),
        }
    }
}

impl From<Availability> for String {
    fn from(value: Availability) -> Self {
        value.label().to_string()
    }
}

/// Consultant row as returned by the backing store. Columns may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsultantRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Read-only consultant profile consumed by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantRecord {
    pub id: ConsultantId,
    pub name: Option<String>,
    pub skills: Vec<String>,
    /// Absent rates are resolved by the budget filter's configured default.
    pub hourly_rate: Option<f64>,
    pub availability: Availability,
    pub location: Option<String>,
    pub email: Option<String>,
}

impl From<ConsultantRow> for ConsultantRecord {
    fn from(row: ConsultantRow) -> Self {
        Self {
            id: ConsultantId(row.id),
            name: row.name.filter(|name| !name.trim().is_empty()),
            skills: row
                .skills
                .into_iter()
                .map(|skill| skill.trim().to_string())
                .filter(|skill| !skill.is_empty())
                .collect(),
            hourly_rate: row.hourly_rate.filter(|rate| rate.is_finite()),
            availability: row
                .availability
                .map(Availability::from)
                .unwrap_or(Availability::Unavailable),
            location: row.location.filter(|location| !location.trim().is_empty()),
            email: row.email.filter(|email| !email.trim().is_empty()),
        }
    }
}

/// Saved search a consultant wants to be notified about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAlert {
    pub consultant_id: ConsultantId,
    pub skills: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Non-array values read as empty; non-string elements are dropped.
pub(crate) fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(value) => Some(value),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        _ => None,
    })
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(value) => value.as_f64(),
        _ => None,
    })
}

pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(value) => value.as_u64().and_then(|count| usize::try_from(count).ok()),
        _ => None,
    })
}

/// Anything that is not an object reads as an empty payload.
pub(crate) fn lenient_payload<'de, D>(deserializer: D) -> Result<AssignmentPayload, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults_missing_fields() {
        let payload: AssignmentPayload = serde_json::from_str("{}").expect("empty payload parses");
        let criteria = AssignmentCriteria::from(payload);

        assert!(criteria.required_skills.is_empty());
        assert_eq!(criteria.budget_min, 0.0);
        assert_eq!(criteria.budget_max, None);
        assert_eq!(criteria.currency, "SEK");
    }

    #[test]
    fn payload_tolerates_null_skills_and_trims_blanks() {
        let payload: AssignmentPayload =
            serde_json::from_str(r#"{"requiredSkills":null,"budgetMax":1200}"#).expect("parses");
        assert!(payload.required_skills.is_empty());

        let payload: AssignmentPayload = serde_json::from_str(
            r#"{"requiredSkills":[" React ",""," "],"budgetMin":800,"currency":"eur"}"#,
        )
        .expect("parses");
        let criteria = AssignmentCriteria::from(payload);
        assert_eq!(criteria.required_skills, vec!["React".to_string()]);
        assert_eq!(criteria.budget_min, 800.0);
        assert_eq!(criteria.currency, "EUR");
    }

    #[test]
    fn payload_reads_wrongly_typed_fields_as_absent() {
        let payload: AssignmentPayload = serde_json::from_str(
            r#"{"title":42,"requiredSkills":"React","budgetMin":"800","budgetMax":true,"currency":["SEK"]}"#,
        )
        .expect("payload parses");
        assert_eq!(payload, AssignmentPayload::default());

        let payload: AssignmentPayload =
            serde_json::from_str(r#"{"requiredSkills":["React",null,7,{"name":"Go"},"Rust"]}"#)
                .expect("payload parses");
        assert_eq!(
            payload.required_skills,
            vec!["React".to_string(), "Rust".to_string()]
        );
    }

    #[test]
    fn availability_parses_case_insensitively() {
        assert_eq!(
            Availability::from("available".to_string()),
            Availability::Available
        );
        assert_eq!(Availability::from(" BUSY ".to_string()), Availability::Busy);
        assert_eq!(
            Availability::from("On leave".to_string()),
            Availability::Other("On leave".to_string())
        );
        assert_eq!(String::from(Availability::Available), "Available");
    }

    #[test]
    fn consultant_row_maps_nullable_columns() {
        let row: ConsultantRow = serde_json::from_str(
            r#"{"id":"c-1","skills":null,"availability":"Available","hourly_rate":null,"location":""}"#,
        )
        .expect("row parses");
        let record = ConsultantRecord::from(row);

        assert_eq!(record.id, ConsultantId("c-1".to_string()));
        assert!(record.skills.is_empty());
        assert_eq!(record.hourly_rate, None);
        assert!(record.availability.is_available());
        assert_eq!(record.location, None);
    }

    #[test]
    fn missing_availability_is_treated_as_unavailable() {
        let record = ConsultantRecord::from(ConsultantRow {
            id: "c-2".to_string(),
            ..ConsultantRow::default()
        });
        assert_eq!(record.availability, Availability::Unavailable);
    }
}
