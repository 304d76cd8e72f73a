//! Plain-text rendering of places for the terminal.

use std::fmt::Write as _;

use wanderlist_core::{FlightEstimate, FlightQuote, Place, ResolvedCity, ViewMode};

const MISSING: &str = "\u{2014}";

/// Price range in euros, `"unavailable"`, or a dash when nothing is known yet.
pub(crate) fn format_price(quote: Option<&FlightQuote>) -> String {
    match quote {
        Some(FlightQuote::Estimate(FlightEstimate { min, max, .. })) => {
            format!("{min}\u{2013}{max}\u{20ac}")
        }
        Some(FlightQuote::Unavailable) => "unavailable".to_string(),
        None => MISSING.to_string(),
    }
}

/// Every place, in the layout of the chosen view mode. The selected place
/// is marked with `*`.
pub(crate) fn render_places(
    places: &[Place],
    selected_id: Option<&str>,
    departure: &str,
    mode: ViewMode,
) -> String {
    if places.is_empty() {
        return "no destinations yet; add one with `wanderlist add --lat <LAT> --lng <LNG>`\n"
            .to_string();
    }

    let mut out = String::new();
    match mode {
        ViewMode::List => {
            let _ = writeln!(
                out,
                "  {:<38}{:<20}{:<16}{:<6}PRICE FROM {departure}",
                "ID", "NAME", "COUNTRY", "CODE"
            );
            for place in places {
                let _ = writeln!(
                    out,
                    "{} {:<38}{:<20}{:<16}{:<6}{}",
                    marker(place, selected_id),
                    place.id,
                    truncate(&place.name, 19),
                    truncate(&place.country, 15),
                    place.city_code,
                    format_price(place.flight_quote(departure)),
                );
            }
        }
        ViewMode::Map => {
            for place in places {
                let _ = writeln!(
                    out,
                    "{} {:<20} ({:>9.4}, {:>9.4})  {}",
                    marker(place, selected_id),
                    truncate(&place.name, 19),
                    place.lat,
                    place.lng,
                    place.id,
                );
            }
        }
    }
    out
}

/// Detail card for one place as priced from `departure`.
pub(crate) fn render_details(place: &Place, departure: &str) -> String {
    let mut out = String::new();
    let title = if place.country.is_empty() {
        place.name.clone()
    } else {
        format!("{}, {}", place.name, place.country)
    };
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    if !place.short_description.is_empty() {
        let _ = writeln!(out, "{}", place.short_description);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Image:     {}", place.image_url.as_deref().unwrap_or(MISSING));

    let quote = place.flight_quote(departure);
    let arrival = quote
        .and_then(FlightQuote::estimate)
        .map_or(place.city_code.as_str(), |e| e.arrival_airport.as_str());
    let duration = quote
        .and_then(FlightQuote::estimate)
        .map_or(MISSING, |e| e.duration.as_str());
    let _ = writeln!(
        out,
        "Flight:    {departure} \u{2192} {arrival}  {}  ({duration})",
        format_price(quote)
    );

    if place.what_to_see.is_empty() {
        let _ = writeln!(out, "See:       {MISSING}");
    } else {
        let _ = writeln!(out, "See:");
        for sight in &place.what_to_see {
            let _ = writeln!(out, "  - {sight}");
        }
    }
    out
}

pub(crate) fn render_city(city: &ResolvedCity) -> String {
    match (&city.country_code, city.country.is_empty()) {
        (Some(code), false) => format!("{}, {} ({code})", city.name, city.country),
        (None, false) => format!("{}, {}", city.name, city.country),
        (_, true) => city.name.clone(),
    }
}

fn marker(place: &Place, selected_id: Option<&str>) -> char {
    if selected_id == Some(place.id.as_str()) {
        '*'
    } else {
        ' '
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}\u{2026}", s.chars().take(max - 1).collect::<String>())
    } else {
        s.to_string()
    }
}
