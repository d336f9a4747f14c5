//! Trip generation and display orchestration
//!
//! generate: validate -> weather -> accommodation -> prompt -> LLM -> history
//! view:     selected trip + fresh weather and photos

use crate::export::{ExportError, ExportedPlan, Exporter};
use crate::images::ImageClient;
use crate::llm::{LlmError, LlmRequest, LlmService};
use crate::prompt;
use crate::session::{Session, SessionError, SessionId, SessionStore};
use crate::trip::{BudgetSummary, TripRecord, TripRequest, ValidationError};
use crate::weather::{WeatherClient, WeatherSnapshot};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Sampling temperature for plan generation
pub const PLAN_TEMPERATURE: f32 = 0.6;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Plan generation is unavailable: no LLM API key configured")]
    LlmUnavailable,
    #[error("Plan generation failed: {0}")]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Everything shown for the selected trip
#[derive(Debug, Serialize)]
pub struct TripView {
    pub trip: TripRecord,
    pub budget: BudgetSummary,
    pub accommodation: &'static str,
    pub weather: Option<WeatherSnapshot>,
    pub images: Vec<String>,
    pub map_url: String,
}

pub struct TripPlanner {
    llm: Option<Arc<dyn LlmService>>,
    weather: WeatherClient,
    images: ImageClient,
    exporter: Exporter,
    sessions: SessionStore,
}

impl TripPlanner {
    pub fn new(
        llm: Option<Arc<dyn LlmService>>,
        weather: WeatherClient,
        images: ImageClient,
        exporter: Exporter,
    ) -> Self {
        Self {
            llm,
            weather,
            images,
            exporter,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn model_id(&self) -> Option<&str> {
        self.llm.as_deref().map(|llm| llm.model_id())
    }

    /// Generate a plan, append it to the session history and select it.
    pub async fn generate(
        &self,
        session: SessionId,
        request: TripRequest,
    ) -> Result<Arc<TripRecord>, PlanError> {
        let request = request.validate()?;
        if !self.sessions.contains(session).await {
            return Err(SessionError::NotFound(session).into());
        }
        let llm = self.llm.as_ref().ok_or(PlanError::LlmUnavailable)?;

        let weather = self.weather.current_or_none(&request.destination).await;
        let accommodation = request.style.accommodation();
        let prompt = prompt::compose(&request, weather.as_ref(), accommodation);

        tracing::info!(
            session = %session,
            destination = %request.destination,
            days = request.days,
            people = request.people,
            style = %request.style,
            has_weather = weather.is_some(),
            "Generating travel plan"
        );

        let response = llm
            .complete(&LlmRequest::user_prompt(prompt).with_temperature(PLAN_TEMPERATURE))
            .await?;

        let record = TripRecord::new(request, response.text);
        let record = self.sessions.update(session, |s| s.record(record)).await?;
        tracing::info!(session = %session, trip = %record.id, "Travel plan recorded");
        Ok(record)
    }

    /// Select an earlier trip from the session history.
    pub async fn select(
        &self,
        session: SessionId,
        index: usize,
    ) -> Result<Arc<TripRecord>, PlanError> {
        Ok(self.sessions.update(session, |s| s.select(index)).await??)
    }

    /// Drop the selection while keeping history.
    pub async fn clear_selection(&self, session: SessionId) -> Result<(), PlanError> {
        Ok(self.sessions.update(session, Session::clear_selection).await?)
    }

    pub async fn selected(&self, session: SessionId) -> Result<Arc<TripRecord>, PlanError> {
        Ok(self
            .sessions
            .read(session, |s| s.selected().ok_or(SessionError::NoSelection))
            .await??)
    }

    /// Build the display payload, re-fetching weather and photos.
    pub async fn view(&self, trip: &TripRecord) -> TripView {
        let (weather, images) = tokio::join!(
            self.weather.current_or_none(&trip.destination),
            self.images.search_or_empty(&trip.destination),
        );

        TripView {
            trip: trip.clone(),
            budget: trip.budget_summary(),
            accommodation: trip.style.accommodation(),
            weather,
            images: images.to_vec(),
            map_url: map_embed_url(&trip.destination),
        }
    }

    /// Render the selected trip's plan to a per-request PDF.
    pub async fn export_selected(&self, session: SessionId) -> Result<ExportedPlan, PlanError> {
        let trip = self.selected(session).await?;
        Ok(self.exporter.export(session, &trip.plan).await?)
    }
}

/// Google Maps embed URL for a destination, query-encoded.
pub fn map_embed_url(destination: &str) -> String {
    match reqwest::Url::parse_with_params(
        "https://www.google.com/maps",
        &[("q", destination), ("output", "embed")],
    ) {
        Ok(url) => url.to_string(),
        Err(_) => "https://www.google.com/maps".to_string(),
    }
}
