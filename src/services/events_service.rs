//! Eventos locales por ZIP (Ticketmaster Discovery API)
//!
//! Conciertos, partidos y festivales: un evento grande en la zona anticipa
//! más demanda de alquiler.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::build_http_client;
use crate::dto::signal_dto::{EventsResponse, LocalEvent, Venue};
use crate::utils::errors::{AppError, AppResult};

pub const DEFAULT_EVENT_COUNT: u32 = 20;
pub const MAX_EVENT_COUNT: u32 = 200;
const EVENT_WINDOW_DAYS: i64 = 30;
const EVENTS_TIMEOUT_SECS: u64 = 10;
const TICKETMASTER_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Default, Deserialize)]
struct DiscoveryResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<DiscoveryEmbedded>,
    page: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct DiscoveryEmbedded {
    events: Option<Vec<DiscoveryEvent>>,
}

#[derive(Debug, Default, Deserialize)]
struct DiscoveryEvent {
    name: Option<String>,
    url: Option<String>,
    dates: Option<EventDates>,
    classifications: Option<Vec<Classification>>,
    #[serde(rename = "priceRanges")]
    price_ranges: Option<Vec<Value>>,
    #[serde(rename = "_embedded")]
    embedded: Option<EventEmbedded>,
}

#[derive(Debug, Default, Deserialize)]
struct EventDates {
    start: Option<EventStart>,
}

#[derive(Debug, Default, Deserialize)]
struct EventStart {
    #[serde(rename = "localDate")]
    local_date: Option<String>,
    #[serde(rename = "localTime")]
    local_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Classification {
    segment: Option<Named>,
    genre: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EventEmbedded {
    #[serde(default)]
    venues: Vec<DiscoveryVenue>,
}

#[derive(Debug, Default, Deserialize)]
struct DiscoveryVenue {
    name: Option<String>,
    city: Option<Named>,
    state: Option<VenueState>,
    address: Option<VenueAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct VenueState {
    #[serde(rename = "stateCode")]
    state_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VenueAddress {
    line1: Option<String>,
}

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}

impl DiscoveryVenue {
    fn into_venue(self) -> Venue {
        Venue {
            name: or_unknown(self.name),
            city: or_unknown(self.city.and_then(|c| c.name)),
            state: or_unknown(self.state.and_then(|s| s.state_code)),
            address: or_unknown(self.address.and_then(|a| a.line1)),
        }
    }
}

impl DiscoveryEvent {
    fn into_event(self) -> LocalEvent {
        let start = self.dates.and_then(|d| d.start).unwrap_or_default();
        let classification = self
            .classifications
            .and_then(|c| c.into_iter().next())
            .unwrap_or_default();
        let venue = self
            .embedded
            .and_then(|e| e.venues.into_iter().next())
            .unwrap_or_default();

        LocalEvent {
            name: or_unknown(self.name),
            date: or_unknown(start.local_date),
            time: start.local_time.unwrap_or_else(|| "TBD".to_string()),
            event_type: or_unknown(classification.segment.and_then(|s| s.name)),
            genre: or_unknown(classification.genre.and_then(|g| g.name)),
            venue: venue.into_venue(),
            url: self.url.unwrap_or_default(),
            price_ranges: self.price_ranges.unwrap_or_default(),
        }
    }
}

/// Ventana `startDateTime`/`endDateTime` en el formato de Ticketmaster.
///
/// Sin fecha de inicio se usa `now`; sin fecha de fin, inicio + 30 días.
pub fn event_window(
    now: DateTime<Utc>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> AppResult<(String, String)> {
    let parse = |raw: &str, label: &str| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest(format!("{} must be in YYYY-MM-DD format, got '{}'", label, raw))
        })
    };

    let start = match start_date {
        Some(raw) => parse(raw, "start_date")?.and_time(NaiveTime::default()).and_utc(),
        None => now,
    };

    let end = match end_date {
        Some(raw) => format!("{}T23:59:59Z", parse(raw, "end_date")?),
        None => (start + Duration::days(EVENT_WINDOW_DAYS))
            .format(TICKETMASTER_FORMAT)
            .to_string(),
    };

    Ok((start.format(TICKETMASTER_FORMAT).to_string(), end))
}

pub struct EventsService {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl EventsService {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> AppResult<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: build_http_client(EVENTS_TIMEOUT_SECS)?,
        })
    }

    pub async fn get_local_events(
        &self,
        zip_code: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        size: Option<u32>,
    ) -> AppResult<EventsResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "Ticketmaster API key not configured. Set TICKETMASTER_API_KEY environment variable."
                    .to_string(),
            )
        })?;

        let (start, end) = event_window(Utc::now(), start_date, end_date)?;
        let size = size.unwrap_or(DEFAULT_EVENT_COUNT).min(MAX_EVENT_COUNT).to_string();

        log::info!("🎫 Fetching events for ZIP {} ({} -> {}, size {})", zip_code, start, end, size);

        let data: DiscoveryResponse = self
            .client
            .get(format!("{}/discovery/v2/events.json", self.base_url))
            .query(&[
                ("apikey", api_key),
                ("postalCode", zip_code),
                ("countryCode", "US"),
                ("startDateTime", start.as_str()),
                ("endDateTime", end.as_str()),
                ("size", size.as_str()),
                ("sort", "date,asc"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::ExternalApi(format!("Failed to fetch events: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to fetch events: {}", e)))?;

        let Some(events) = data.embedded.and_then(|e| e.events) else {
            log::info!("📭 No events found for ZIP {}", zip_code);
            return Ok(EventsResponse {
                zip_code: zip_code.to_string(),
                count: 0,
                events: Vec::new(),
                page: None,
                message: Some(format!("No events found for ZIP code {}", zip_code)),
            });
        };

        let events: Vec<LocalEvent> = events.into_iter().map(DiscoveryEvent::into_event).collect();

        Ok(EventsResponse {
            zip_code: zip_code.to_string(),
            count: events.len(),
            events,
            page: Some(data.page.unwrap_or_else(|| Value::Object(Default::default()))),
            message: None,
        })
    }
}
