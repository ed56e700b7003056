//! Database models

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conference {
    pub id: String,
    pub organizer_user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub city: String,
    pub topics: Json<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub month: i64,
    pub max_attendees: i64,
    pub seats_available: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub conference_id: String,
    pub name: String,
    pub highlights: Option<String>,
    pub speaker: String,
    pub duration: i64,
    pub type_of_session: String,
    pub date_time: Option<String>,
    pub start_time: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: String,
}

/// T-shirt size enumeration, stored as its canonical string form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeeShirtSize {
    NotSpecified,
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
}

impl TeeShirtSize {
    pub fn as_str(self) -> &'static str {
        match self {
            TeeShirtSize::NotSpecified => "NOT_SPECIFIED",
            TeeShirtSize::Xs => "XS",
            TeeShirtSize::S => "S",
            TeeShirtSize::M => "M",
            TeeShirtSize::L => "L",
            TeeShirtSize::Xl => "XL",
            TeeShirtSize::Xxl => "XXL",
            TeeShirtSize::Xxxl => "XXXL",
        }
    }
}

impl FromStr for TeeShirtSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NOT_SPECIFIED" => Ok(TeeShirtSize::NotSpecified),
            "XS" => Ok(TeeShirtSize::Xs),
            "S" => Ok(TeeShirtSize::S),
            "M" => Ok(TeeShirtSize::M),
            "L" => Ok(TeeShirtSize::L),
            "XL" => Ok(TeeShirtSize::Xl),
            "XXL" => Ok(TeeShirtSize::Xxl),
            "XXXL" => Ok(TeeShirtSize::Xxxl),
            other => Err(format!("Unknown tee shirt size: {}", other)),
        }
    }
}

impl fmt::Display for TeeShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session type enumeration, stored as its canonical string form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    NotSpecified,
    Lecture,
    Keynote,
    Workshop,
    Forum,
}

impl SessionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::NotSpecified => "NOT_SPECIFIED",
            SessionType::Lecture => "LECTURE",
            SessionType::Keynote => "KEYNOTE",
            SessionType::Workshop => "WORKSHOP",
            SessionType::Forum => "FORUM",
        }
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NOT_SPECIFIED" => Ok(SessionType::NotSpecified),
            "LECTURE" => Ok(SessionType::Lecture),
            "KEYNOTE" => Ok(SessionType::Keynote),
            "WORKSHOP" => Ok(SessionType::Workshop),
            "FORUM" => Ok(SessionType::Forum),
            other => Err(format!("Unknown session type: {}", other)),
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_type_case_insensitive() {
        assert_eq!("Workshop".parse::<SessionType>().unwrap(), SessionType::Workshop);
        assert_eq!("LECTURE".parse::<SessionType>().unwrap(), SessionType::Lecture);
        assert!("Concert".parse::<SessionType>().is_err());
    }

    #[test]
    fn test_tee_shirt_size_round_trip() {
        for size in ["NOT_SPECIFIED", "XS", "S", "M", "L", "XL", "XXL", "XXXL"] {
            assert_eq!(size.parse::<TeeShirtSize>().unwrap().as_str(), size);
        }
    }
}
