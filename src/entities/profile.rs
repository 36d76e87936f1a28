use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{profile_incomplete_error, Error};

/// Raw member fields as the identity store returns them. Any of them may be
/// missing for a partially filled in account.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub uid: i64,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<String>,
    pub member_id: Option<String>,
}

/// Snapshot of the member taken when the workflow starts. It is never
/// refreshed while the session lives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    /// Digits only, `YYYYMMDD`.
    pub date_of_birth: String,
    pub member_id: String,
}

impl TryFrom<ProfileRecord> for UserProfile {
    type Error = Error;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let display_name = required(record.display_name, "display name")?;
        let first_name = required(record.first_name, "first name")?;
        let last_name = required(record.last_name, "last name")?;
        let member_id = required(record.member_id, "member id")?;
        let birthdate = required(record.birthdate, "date of birth")?;

        Ok(Self {
            id: record.uid,
            display_name,
            first_name,
            last_name,
            date_of_birth: normalize_birthdate(&birthdate)?,
            member_id,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, Error> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(profile_incomplete_error(field)),
    }
}

/// Strips every separator from a stored birth date and checks that what is
/// left is a real `YYYYMMDD` calendar date.
pub fn normalize_birthdate(raw: &str) -> Result<String, Error> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 8 || NaiveDate::parse_from_str(&digits, "%Y%m%d").is_err() {
        return Err(profile_incomplete_error("valid date of birth"));
    }

    Ok(digits)
}
