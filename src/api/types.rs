//! API request and response types

use crate::session::{SelectionState, Session, SessionId};
use crate::trip::{Interest, TravelStyle, TripRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Inclusive bounds of a numeric form field
#[derive(Debug, Serialize)]
pub struct FieldRange<T> {
    pub min: T,
    pub max: Option<T>,
    pub default: T,
}

/// Form metadata for the planning page
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub styles: Vec<StyleOption>,
    pub interests: Vec<&'static str>,
    pub days: FieldRange<u32>,
    pub people: FieldRange<u32>,
    pub budget: FieldRange<f64>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StyleOption {
    pub name: &'static str,
    pub accommodation: &'static str,
}

impl StyleOption {
    pub fn all() -> Vec<Self> {
        TravelStyle::ALL
            .iter()
            .map(|s| StyleOption {
                name: s.as_str(),
                accommodation: s.accommodation(),
            })
            .collect()
    }
}

pub fn interest_names() -> Vec<&'static str> {
    Interest::ALL.iter().map(|i| i.as_str()).collect()
}

/// Response for session creation
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
}

/// One line of the history sidebar
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub index: usize,
    pub id: Uuid,
    pub destination: String,
    pub days: u32,
    pub people: u32,
    pub budget: f64,
    pub style: TravelStyle,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(index: usize, trip: &TripRecord) -> Self {
        Self {
            index,
            id: trip.id,
            destination: trip.destination.clone(),
            days: trip.days,
            people: trip.people,
            budget: trip.budget,
            style: trip.style,
            created_at: trip.created_at,
        }
    }
}

/// Session history and selection
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub state: SelectionState,
    pub selected: Option<usize>,
    pub history: Vec<HistoryEntry>,
}

impl SessionResponse {
    pub fn new(session_id: SessionId, session: &Session) -> Self {
        Self {
            session_id,
            state: session.state(),
            selected: session.selected_index(),
            history: session
                .history()
                .iter()
                .enumerate()
                .map(|(i, trip)| HistoryEntry::new(i, trip))
                .collect(),
        }
    }
}

/// Response carrying one trip record
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub trip: TripRecord,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
