use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{ConsultantRecord, ConsultantRow, SkillAlert};
use super::repository::{ConsultantDirectory, RepositoryError};

/// Errors raised while loading a consultant CSV export.
#[derive(Debug, thiserror::Error)]
pub enum ConsultantImportError {
    #[error("failed to open consultant export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse consultant export: {0}")]
    Csv(#[from] csv::Error),
}

/// Read-only directory backed by a CSV export of the consultant table.
///
/// Expected headers: `id,name,skills,availability,location,hourly_rate,email` plus an optional
/// `alert_skills` column. List cells are `;`-separated.
#[derive(Debug, Clone, Default)]
pub struct CsvConsultantDirectory {
    consultants: Vec<ConsultantRecord>,
    alerts: Vec<SkillAlert>,
}

impl CsvConsultantDirectory {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConsultantImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConsultantImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut consultants = Vec::new();
        let mut alerts = Vec::new();

        for record in csv_reader.deserialize::<CsvRow>() {
            let row = record?;
            let alert_skills = split_list(row.alert_skills.as_deref());
            let consultant = ConsultantRecord::from(ConsultantRow {
                id: row.id,
                name: row.name,
                skills: split_list(row.skills.as_deref()),
                availability: row.availability,
                location: row.location,
                hourly_rate: row.hourly_rate.as_deref().and_then(parse_rate),
                email: row.email,
            });

            if !alert_skills.is_empty() {
                alerts.push(SkillAlert {
                    consultant_id: consultant.id.clone(),
                    skills: alert_skills,
                    email: consultant.email.clone(),
                    active: true,
                });
            }
            consultants.push(consultant);
        }

        Ok(Self {
            consultants,
            alerts,
        })
    }

    /// Every imported consultant regardless of availability.
    pub fn consultants(&self) -> &[ConsultantRecord] {
        &self.consultants
    }
}

impl ConsultantDirectory for CsvConsultantDirectory {
    fn available_consultants(&self) -> Result<Vec<ConsultantRecord>, RepositoryError> {
        Ok(self
            .consultants
            .iter()
            .filter(|consultant| consultant.availability.is_available())
            .cloned()
            .collect())
    }

    fn skill_alerts(&self) -> Result<Vec<SkillAlert>, RepositoryError> {
        Ok(self.alerts.clone())
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    skills: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    availability: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    hourly_rate: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    alert_skills: Option<String>,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|raw| {
            raw.split(';')
                .map(str::trim)
                .filter(|skill| !skill.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
