//! Rendering contexts and the HTML pages built from them.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;
use weather_core::{ComparisonResult, WeatherSnapshot, compare::format_duration};

const DATE_FORMAT: &str = "%A, %B %-d, %Y";
pub(crate) const TIME_FORMAT: &str = "%-I:%M %p";

/// Values shown on the single-city results page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsContext {
    pub date: String,
    pub city: String,
    pub description: String,
    pub temp: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub sunrise: String,
    pub sunset: String,
    pub units_letter: &'static str,
}

impl ResultsContext {
    pub fn new<Tz: TimeZone>(snapshot: &WeatherSnapshot, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            date: now.format(DATE_FORMAT).to_string(),
            city: snapshot.city.clone(),
            description: snapshot.description.clone(),
            temp: snapshot.temperature,
            humidity: snapshot.humidity,
            wind_speed: snapshot.wind_speed,
            sunrise: snapshot.sunrise.format(TIME_FORMAT).to_string(),
            sunset: snapshot.sunset.format(TIME_FORMAT).to_string(),
            units_letter: snapshot.units_letter(),
        }
    }
}

/// Values shown on the comparison page, phrased from `city1`'s side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonContext {
    pub date: String,
    pub city1: String,
    pub city2: String,
    pub units_letter: &'static str,
    pub warmer_or_colder: &'static str,
    pub temp_difference: f64,
    pub humidity_greater_or_less: &'static str,
    pub humidity_difference: u8,
    pub wind_greater_or_less: &'static str,
    pub wind_difference: f64,
    pub sunset_earlier_or_later: &'static str,
    pub sunset_difference: String,
}

impl ComparisonContext {
    pub fn new<Tz: TimeZone>(
        first: &WeatherSnapshot,
        second: &WeatherSnapshot,
        cmp: &ComparisonResult,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            date: now.format(DATE_FORMAT).to_string(),
            city1: first.city.clone(),
            city2: second.city.clone(),
            units_letter: first.units_letter(),
            warmer_or_colder: cmp.temp_direction.as_str(),
            temp_difference: cmp.temp_difference,
            humidity_greater_or_less: cmp.humidity_direction.as_str(),
            humidity_difference: cmp.humidity_difference,
            wind_greater_or_less: cmp.wind_direction.as_str(),
            wind_difference: cmp.wind_difference,
            sunset_earlier_or_later: cmp.sunset_direction.as_str(),
            sunset_difference: format_duration(cmp.sunset_difference),
        }
    }
}

pub fn home_page() -> String {
    let body = r#"<h1>Weather</h1>
<form action="/results" method="get">
  <h2>Current weather</h2>
  <label>City <input type="text" name="city" required></label>
  <select name="units">
    <option value="imperial">Fahrenheit</option>
    <option value="metric">Celsius</option>
    <option value="standard">Kelvin</option>
  </select>
  <button type="submit">Show</button>
</form>
<form action="/comparison_results" method="get">
  <h2>Compare two cities</h2>
  <label>City 1 <input type="text" name="city1" required></label>
  <label>City 2 <input type="text" name="city2" required></label>
  <select name="units">
    <option value="imperial">Fahrenheit</option>
    <option value="metric">Celsius</option>
    <option value="standard">Kelvin</option>
  </select>
  <button type="submit">Compare</button>
</form>"#;
    layout("Weather", body)
}

pub fn results_page(ctx: &ResultsContext) -> String {
    let body = format!(
        r#"<h1>Weather in {city}</h1>
<p class="date">{date}</p>
<p>Conditions: {description}</p>
<p>Temperature: {temp}°{letter}</p>
<p>Humidity: {humidity}%</p>
<p>Wind speed: {wind}</p>
<p>Sunrise: {sunrise}</p>
<p>Sunset: {sunset}</p>
<p><a href="/">Back</a></p>"#,
        city = escape(&ctx.city),
        date = escape(&ctx.date),
        description = escape(&ctx.description),
        temp = ctx.temp,
        letter = ctx.units_letter,
        humidity = ctx.humidity,
        wind = ctx.wind_speed,
        sunrise = escape(&ctx.sunrise),
        sunset = escape(&ctx.sunset),
    );
    layout(&format!("Weather in {}", ctx.city), &body)
}

pub fn comparison_page(ctx: &ComparisonContext) -> String {
    let city1 = escape(&ctx.city1);
    let city2 = escape(&ctx.city2);
    let body = format!(
        r#"<h1>{city1} vs. {city2}</h1>
<p class="date">{date}</p>
<p>{city1} is {temp}°{letter} {warmer} than {city2}.</p>
<p>{city1} has {humidity}% {humidity_cmp} humidity than {city2}.</p>
<p>{city1} has {wind} {wind_cmp} wind speed than {city2}.</p>
<p>The sun sets {sunset} {sunset_cmp} in {city1} than in {city2}.</p>
<p><a href="/">Back</a></p>"#,
        date = escape(&ctx.date),
        temp = ctx.temp_difference,
        letter = ctx.units_letter,
        warmer = ctx.warmer_or_colder,
        humidity = ctx.humidity_difference,
        humidity_cmp = ctx.humidity_greater_or_less,
        wind = ctx.wind_difference,
        wind_cmp = ctx.wind_greater_or_less,
        sunset = escape(&ctx.sunset_difference),
        sunset_cmp = ctx.sunset_earlier_or_later,
    );
    layout(&format!("{} vs. {}", ctx.city1, ctx.city2), &body)
}

/// Error page showing `message`, escaped.
pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>",
        escape(message)
    );
    layout("Error", &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{}</title>
<style>body{{padding:3em; font-family: sans-serif;}} .error{{color:#b00020}}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        escape(title)
    )
}

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use weather_core::{RawWeather, Units, compare};

    fn snapshot(name: &str, temp: f64, humidity: u8, sunset: i64) -> WeatherSnapshot {
        let body = format!(
            r#"{{"name": "{name}", "weather": [{{"description": "clear sky"}}],
                "main": {{"temp": {temp}, "humidity": {humidity}}}, "wind": {{"speed": 3.1}},
                "sys": {{"sunrise": 1700000000, "sunset": {sunset}}}}}"#
        );
        WeatherSnapshot::from_raw(&RawWeather::parse(&body).unwrap(), Units::Metric).unwrap()
    }

    fn noon() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2023-11-14T12:00:00+00:00").unwrap()
    }

    #[test]
    fn results_context_uses_snapshot_fields() {
        let ctx = ResultsContext::new(&snapshot("Paris", 15.0, 60, 1700040000), &noon());

        assert_eq!(ctx.city, "Paris");
        assert_eq!(ctx.temp, 15.0);
        assert_eq!(ctx.humidity, 60);
        assert_eq!(ctx.units_letter, "C");
        assert_eq!(ctx.date, "Tuesday, November 14, 2023");
        assert_eq!(ctx.sunset, "9:20 AM");
    }

    #[test]
    fn comparison_context_phrases_from_first_city() {
        let a = snapshot("Cairo", 20.0, 30, 1700043600);
        let b = snapshot("Oslo", 15.0, 70, 1700040000);
        let cmp = compare(&a, &b).unwrap();
        let ctx = ComparisonContext::new(&a, &b, &cmp, &Utc::now());

        assert_eq!(ctx.warmer_or_colder, "warmer");
        assert_eq!(ctx.temp_difference, 5.0);
        assert_eq!(ctx.humidity_greater_or_less, "less");
        assert_eq!(ctx.humidity_difference, 40);
        assert_eq!(ctx.sunset_earlier_or_later, "later");
        assert_eq!(ctx.sunset_difference, "1:00:00");

        let html = comparison_page(&ctx);
        assert!(html.contains("Cairo is 5°C warmer than Oslo."));
    }

    #[test]
    fn city_names_are_escaped() {
        let ctx = ResultsContext::new(&snapshot("<b>Nice</b>", 18.0, 50, 1700040000), &noon());
        let html = results_page(&ctx);

        assert!(html.contains("&lt;b&gt;Nice&lt;/b&gt;"));
        assert!(!html.contains("<b>Nice"));
    }

    #[test]
    fn error_page_shows_message() {
        let err = weather_core::WeatherError::MissingParameter("city");
        let html = error_page(&err.to_string());
        assert!(html.contains("Missing required parameter &#39;city&#39;"));
    }
}
