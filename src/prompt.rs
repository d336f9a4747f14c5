//! Instruction text sent to the LLM for plan generation

use crate::trip::TripRequest;
use crate::weather::WeatherSnapshot;

#[cfg(test)]
mod proptests;

const CURRENCY: &str = "₹";

/// Fill the planning template.
///
/// `per_person` is `budget / people` printed with `f64`'s `Display`, so the
/// exact value the user will be held to appears in the prompt.
pub fn compose(
    request: &TripRequest,
    weather: Option<&WeatherSnapshot>,
    accommodation: &str,
) -> String {
    let weather_line = weather.map_or_else(
        || "no weather data available".to_string(),
        |w| format!("currently {}°C, {}", w.temperature, w.description),
    );

    format!(
        "You are a professional AI travel strategist.

Destination: {destination}
Days: {days}
Total Budget: {CURRENCY}{budget}
Number of People: {people}
Per Person Budget: {CURRENCY}{per_person}
Travel Style: {style}
Interests: {interests}

Provide:
- Optimized itinerary
- Realistic cost breakdown
- Per-person expenses
- Accommodation recommendation: {accommodation}
- Weather-aware suggestions: {weather_line}
- Smart money-saving tips
- Packing checklist
",
        destination = request.destination,
        days = request.days,
        budget = request.budget,
        people = request.people,
        per_person = request.per_person_budget(),
        style = request.style,
        interests = request.interests_label(),
    )
}
