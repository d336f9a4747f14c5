//! Trip domain types
//!
//! `TripRequest` is what the user submits, `TripRecord` is what a successful
//! generation produces and what the session history stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub const DAYS_RANGE: (u32, u32) = (1, 30);
pub const PEOPLE_RANGE: (u32, u32) = (1, 20);
pub const MIN_BUDGET: f64 = 1000.0;

pub const DEFAULT_DAYS: u32 = 3;
pub const DEFAULT_PEOPLE: u32 = 2;
pub const DEFAULT_BUDGET: f64 = 100_000.0;

/// Travel style offered by the planning form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelStyle {
    #[serde(alias = "budget")]
    Budget,
    #[serde(alias = "luxury")]
    Luxury,
    #[serde(alias = "adventure")]
    Adventure,
    #[serde(alias = "family")]
    Family,
}

impl TravelStyle {
    pub const ALL: [TravelStyle; 4] = [
        TravelStyle::Budget,
        TravelStyle::Luxury,
        TravelStyle::Adventure,
        TravelStyle::Family,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelStyle::Budget => "Budget",
            TravelStyle::Luxury => "Luxury",
            TravelStyle::Adventure => "Adventure",
            TravelStyle::Family => "Family",
        }
    }

    /// Accommodation type recommended for this style
    pub fn accommodation(self) -> &'static str {
        match self {
            TravelStyle::Luxury => "5-star premium hotels or boutique luxury stays.",
            TravelStyle::Budget => "Affordable hotels, hostels, or Airbnb stays.",
            TravelStyle::Adventure => "Eco-lodges or adventure camps.",
            TravelStyle::Family => "Family-friendly hotels with spacious rooms.",
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interest tag from the fixed vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Interest {
    #[serde(alias = "food")]
    Food,
    #[serde(alias = "adventure")]
    Adventure,
    #[serde(alias = "history")]
    History,
    #[serde(alias = "nature")]
    Nature,
    #[serde(alias = "nightlife")]
    Nightlife,
    #[serde(alias = "shopping")]
    Shopping,
    #[serde(alias = "photography")]
    Photography,
    #[serde(alias = "relaxation")]
    Relaxation,
}

impl Interest {
    pub const ALL: [Interest; 8] = [
        Interest::Food,
        Interest::Adventure,
        Interest::History,
        Interest::Nature,
        Interest::Nightlife,
        Interest::Shopping,
        Interest::Photography,
        Interest::Relaxation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Interest::Food => "Food",
            Interest::Adventure => "Adventure",
            Interest::History => "History",
            Interest::Nature => "Nature",
            Interest::Nightlife => "Nightlife",
            Interest::Shopping => "Shopping",
            Interest::Photography => "Photography",
            Interest::Relaxation => "Relaxation",
        }
    }
}

/// Rejected form input
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Please enter a destination")]
    MissingDestination,
    #[error("Days must be between {} and {}, got {0}", DAYS_RANGE.0, DAYS_RANGE.1)]
    DaysOutOfRange(u32),
    #[error("Number of people must be between {} and {}, got {0}", PEOPLE_RANGE.0, PEOPLE_RANGE.1)]
    PeopleOutOfRange(u32),
    #[error("Budget must be at least {}, got {0}", MIN_BUDGET)]
    BudgetTooLow(f64),
}

/// Parameters of one planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_people")]
    pub people: u32,
    #[serde(default = "default_budget")]
    pub budget: f64,
    pub style: TravelStyle,
    #[serde(default)]
    pub interests: BTreeSet<Interest>,
}

fn default_days() -> u32 {
    DEFAULT_DAYS
}

fn default_people() -> u32 {
    DEFAULT_PEOPLE
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET
}

impl TripRequest {
    /// Check the form constraints. The destination is trimmed in place.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        let trimmed = self.destination.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingDestination);
        }
        if trimmed.len() != self.destination.len() {
            self.destination = trimmed.to_string();
        }
        if !(DAYS_RANGE.0..=DAYS_RANGE.1).contains(&self.days) {
            return Err(ValidationError::DaysOutOfRange(self.days));
        }
        if !(PEOPLE_RANGE.0..=PEOPLE_RANGE.1).contains(&self.people) {
            return Err(ValidationError::PeopleOutOfRange(self.people));
        }
        if !self.budget.is_finite() || self.budget < MIN_BUDGET {
            return Err(ValidationError::BudgetTooLow(self.budget));
        }
        Ok(self)
    }

    /// Budget split evenly, unrounded. `people >= 1` after validation.
    pub fn per_person_budget(&self) -> f64 {
        self.budget / f64::from(self.people)
    }

    /// Interests as a readable list, in vocabulary order
    pub fn interests_label(&self) -> String {
        if self.interests.is_empty() {
            return "no specific interests".to_string();
        }
        self.interests
            .iter()
            .map(|i| i.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A generated itinerary and the parameters that produced it
#[derive(Debug, Clone, Serialize)]
pub struct TripRecord {
    pub id: Uuid,
    pub destination: String,
    pub days: u32,
    pub people: u32,
    pub budget: f64,
    pub style: TravelStyle,
    pub interests: BTreeSet<Interest>,
    pub plan: String,
    pub created_at: DateTime<Utc>,
}

impl TripRecord {
    pub fn new(request: TripRequest, plan: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            destination: request.destination,
            days: request.days,
            people: request.people,
            budget: request.budget,
            style: request.style,
            interests: request.interests,
            plan,
            created_at: Utc::now(),
        }
    }

    pub fn budget_summary(&self) -> BudgetSummary {
        BudgetSummary::new(self.budget, self.people)
    }
}

/// Totals shown next to a plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub people: u32,
    pub total: f64,
    /// Truncated toward zero
    pub per_person: u64,
}

impl BudgetSummary {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(total: f64, people: u32) -> Self {
        Self {
            people,
            total,
            per_person: (total / f64::from(people.max(1))) as u64,
        }
    }
}
