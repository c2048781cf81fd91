use color_eyre::Result;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v2/all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    pub code: String,
    pub dial_code: String,
}

impl Country {
    fn new(name: &str, code: &str, dial_code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            dial_code: dial_code.to_string(),
        }
    }

    /// Picker label, e.g. "India (+91)"
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.dial_code)
    }
}

pub fn static_countries() -> Vec<Country> {
    vec![
        Country::new("India", "IN", "+91"),
        Country::new("United States", "US", "+1"),
        Country::new("United Kingdom", "GB", "+44"),
        Country::new("Canada", "CA", "+1"),
        Country::new("Australia", "AU", "+61"),
        Country::new("Germany", "DE", "+49"),
        Country::new("France", "FR", "+33"),
        Country::new("Singapore", "SG", "+65"),
        Country::new("United Arab Emirates", "AE", "+971"),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestCountry {
    name: String,
    alpha2_code: String,
    #[serde(default)]
    calling_codes: Vec<String>,
}

/// Keeps entries with a calling code and sorts them by name
fn into_countries(raw: Vec<RestCountry>) -> Vec<Country> {
    let mut countries: Vec<Country> = raw
        .into_iter()
        .filter_map(|entry| {
            let code = entry.calling_codes.into_iter().next()?;
            if code.trim().is_empty() {
                return None;
            }
            Some(Country {
                name: entry.name,
                code: entry.alpha2_code,
                dial_code: format!("+{}", code.trim()),
            })
        })
        .collect();
    countries.sort_by(|a, b| a.name.cmp(&b.name));
    countries
}

pub fn fetch_countries(url: &str) -> Result<Vec<Country>> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;
    let raw: Vec<RestCountry> = response.json()?;
    let countries = into_countries(raw);
    if countries.is_empty() {
        return Err(color_eyre::eyre::eyre!("country list from {} was empty", url));
    }
    Ok(countries)
}

/// Remote list when a URL is configured and reachable, static list otherwise
pub fn load_countries(url: Option<&str>) -> Vec<Country> {
    let Some(url) = url else {
        return static_countries();
    };
    match fetch_countries(url) {
        Ok(countries) => {
            tracing::info!(count = countries.len(), "loaded remote country list");
            countries
        }
        Err(error) => {
            tracing::warn!(%error, "country fetch failed, using built-in list");
            static_countries()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_list_has_dial_codes() {
        let countries = static_countries();
        assert_eq!(countries.len(), 9);
        assert!(countries.iter().all(|country| country.dial_code.starts_with('+')));
        assert_eq!(countries[0].label(), "India (+91)");
    }

    #[test]
    fn test_remote_payload_is_filtered_and_sorted() {
        let payload = r#"[
            {"name": "Norway", "alpha2Code": "NO", "callingCodes": ["47"]},
            {"name": "Antarctica", "alpha2Code": "AQ", "callingCodes": [""]},
            {"name": "Bouvet Island", "alpha2Code": "BV", "callingCodes": []},
            {"name": "Heard Island", "alpha2Code": "HM"},
            {"name": "Austria", "alpha2Code": "AT", "callingCodes": ["43", "999"]}
        ]"#;
        let raw: Vec<RestCountry> = serde_json::from_str(payload).unwrap();
        let countries = into_countries(raw);
        assert_eq!(
            countries,
            vec![
                Country::new("Austria", "AT", "+43"),
                Country::new("Norway", "NO", "+47"),
            ]
        );
    }

    #[test]
    fn test_no_url_means_static_list() {
        assert_eq!(load_countries(None), static_countries());
    }
}
