//! Festivos nacionales de EE. UU. (Nager.Date)

use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use super::build_http_client;
use crate::dto::signal_dto::{Holiday, HolidaysResponse, MonthSelection};
use crate::utils::errors::{AppError, AppResult};

const COUNTRY_CODE: &str = "US";
const HOLIDAYS_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Deserialize)]
struct NagerHoliday {
    date: String,
    name: String,
    #[serde(rename = "localName")]
    local_name: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    #[serde(default)]
    global: Option<bool>,
    #[serde(default)]
    types: Option<Vec<String>>,
}

impl NagerHoliday {
    fn month(&self) -> AppResult<u32> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map(|d| d.month())
            .map_err(|e| AppError::ExternalApi(format!("Unexpected holiday date '{}': {}", self.date, e)))
    }

    fn into_holiday(self) -> Holiday {
        Holiday {
            local_name: self.local_name.unwrap_or_else(|| self.name.clone()),
            country_code: self.country_code.unwrap_or_else(|| COUNTRY_CODE.to_string()),
            global: self.global.unwrap_or(true),
            types: self.types.unwrap_or_default(),
            date: self.date,
            name: self.name,
        }
    }
}

pub struct HolidayService {
    base_url: String,
    client: reqwest::Client,
}

impl HolidayService {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_http_client(HOLIDAYS_TIMEOUT_SECS)?,
        })
    }

    /// Festivos del año (por defecto el actual), opcionalmente de un solo mes
    pub async fn get_holidays(&self, year: Option<i32>, month: Option<u32>) -> AppResult<HolidaysResponse> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(AppError::BadRequest(format!("month must be between 1 and 12, got {}", m)));
            }
        }

        log::info!("📅 Fetching {} holidays for {} (month: {:?})", COUNTRY_CODE, year, month);

        let url = format!("{}/api/v3/PublicHolidays/{}/{}", self.base_url, year, COUNTRY_CODE);
        let raw: Vec<NagerHoliday> = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::ExternalApi(format!("Failed to fetch holidays: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to fetch holidays: {}", e)))?;

        let mut holidays = Vec::with_capacity(raw.len());
        for holiday in raw {
            if let Some(m) = month {
                if holiday.month()? != m {
                    continue;
                }
            }
            holidays.push(holiday.into_holiday());
        }

        Ok(HolidaysResponse {
            year,
            month: MonthSelection::from_option(month),
            count: holidays.len(),
            holidays,
        })
    }
}
