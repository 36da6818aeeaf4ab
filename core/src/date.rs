//! Best-effort Hijri date for "today"

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

const HIJRI_CONVERSION_URL: &str = "https://api.aladhan.com/v1/gToH";

#[derive(Deserialize)]
struct AlAdhanResponse {
    code: i64,
    data: Option<ConversionData>,
}

#[derive(Deserialize)]
struct ConversionData {
    hijri: Option<HijriDate>,
}

#[derive(Deserialize)]
struct HijriDate {
    day: String,
    month: HijriMonth,
    year: String,
}

#[derive(Deserialize)]
struct HijriMonth {
    en: String,
}

/// `DD-MM-YYYY`, the format the conversion endpoint expects
fn gregorian_param(date: NaiveDate) -> String {
    format!("{:02}-{:02}-{}", date.day(), date.month(), date.year())
}

/// "15 Muharram 1446" from a conversion response body
fn hijri_label(body: &str) -> Option<String> {
    let response: AlAdhanResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Error parsing Islamic date response: {}", e);
            return None;
        }
    };

    if response.code != 200 {
        tracing::error!("Islamic date lookup returned code {}", response.code);
        return None;
    }

    let Some(hijri) = response.data.and_then(|d| d.hijri) else {
        tracing::error!("Islamic date response has no hijri field");
        return None;
    };
    Some(format!("{} {} {}", hijri.day, hijri.month.en, hijri.year))
}

/// Look up the Hijri date for `date`. Any failure yields `None`.
pub async fn fetch_hijri_date(client: &reqwest::Client, date: NaiveDate) -> Option<String> {
    let url = format!("{}?date={}", HIJRI_CONVERSION_URL, gregorian_param(date));

    let response = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Error fetching Islamic date: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::error!("Failed to fetch Islamic date: HTTP {}", response.status());
        return None;
    }

    match response.text().await {
        Ok(body) => hijri_label(&body),
        Err(e) => {
            tracing::error!("Error reading Islamic date response: {}", e);
            None
        }
    }
}

/// [`fetch_hijri_date`] for the local calendar date.
pub async fn fetch_hijri_today(client: &reqwest::Client) -> Option<String> {
    fetch_hijri_date(client, chrono::Local::now().date_naive()).await
}
