use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::patients::PatientService;
use crate::scheduler::AppointmentScheduler;
use crate::status::AppointmentStatus;

pub type PatientId = i64;
pub type AppointmentId = i64;

#[derive(Clone)]
pub struct PatientState {
    pub patients: Arc<PatientService>,
}

#[derive(Clone)]
pub struct AppointmentState {
    pub scheduler: Arc<AppointmentScheduler>,
}

/* -------------------------
   Patients
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

/// Patient fields without an identity. Used for create and for full-field
/// replacement on update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<String>,
}

impl PatientDraft {
    pub fn into_patient(self, id: PatientId) -> Patient {
        Patient {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            address: self.address,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
        }
    }
}

/* -------------------------
   Appointments
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_name: String,
    pub appointment_date_time: NaiveDateTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}

/// A request to schedule. Any `status` the client sends is not read;
/// scheduling always starts at `SCHEDULED`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    #[serde(deserialize_with = "numeric_id")]
    pub patient_id: PatientId,
    pub doctor_name: String,
    #[serde(deserialize_with = "date_time")]
    pub appointment_date_time: NaiveDateTime,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub reason: Option<String>,
}

/// Record handed to the store before an id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: PatientId,
    pub doctor_name: String,
    pub appointment_date_time: NaiveDateTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}

/// Full replacement of the mutable appointment fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentChanges {
    pub doctor_name: String,
    #[serde(deserialize_with = "date_time")]
    pub appointment_date_time: NaiveDateTime,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}

/* -------------------------
   Lenient request fields
--------------------------*/

// The browser client posts form values as they are: ids as strings, blank
// inputs as "", and instants from `Date.toISOString()`.

fn numeric_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdOrText {
        Id(i64),
        Text(String),
    }

    match IdOrText::deserialize(deserializer)? {
        IdOrText::Id(id) => Ok(id),
        IdOrText::Text(t) => t
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id: {t:?}"))),
    }
}

/// An offset timestamp is read as its UTC wall-clock time; a bare local
/// date-time is taken as is.
fn date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| de::Error::custom(format!("invalid date-time: {raw:?}")))
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match blank_as_none(deserializer)? {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid date: {s:?}"))),
    }
}
