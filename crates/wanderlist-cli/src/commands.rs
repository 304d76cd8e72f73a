//! Command handlers for the CLI.
//!
//! Each handler loads the wishlist into a fresh session, performs one user
//! action and prints the result. Enrichment is awaited before printing so
//! the output shows what the session found.

use std::io::{BufRead, Write};

use wanderlist_core::{departure_code, Coordinates, FlightQuote, Place};
use wanderlist_enrich::{DeleteOutcome, EnrichOutcome, WishlistSession};
use wanderlist_gateway::{HttpGateway, TravelGateway};

use crate::render::{format_price, render_city, render_details, render_places};
use crate::repository::CliRepository;

pub(crate) type Session = WishlistSession<HttpGateway, CliRepository>;

/// Print every destination in the session's view mode.
pub(crate) async fn run_list(session: &mut Session, json: bool) -> anyhow::Result<()> {
    session.load().await?;
    log_outcome(session.wait_for_enrichment().await);

    let view = session.view().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&view.places)?);
    } else {
        print!(
            "{}",
            render_places(
                &view.places,
                view.selected_id.as_deref(),
                &view.departure,
                view.view_mode
            )
        );
    }
    Ok(())
}

/// Select one destination, enrich it and print its details.
///
/// # Errors
///
/// Returns an error if the wishlist cannot be loaded or `query` matches no
/// single place.
pub(crate) async fn run_show(session: &mut Session, query: &str, json: bool) -> anyhow::Result<()> {
    session.load().await?;
    let id = resolve_place_id(&session.view().await.places, query)?;

    session.on_select(&id).await?;
    log_outcome(session.wait_for_enrichment().await);

    let view = session.view().await;
    let place = view
        .selected
        .ok_or_else(|| anyhow::anyhow!("place '{query}' disappeared while loading"))?;
    print_place(&place, &view.departure, json)
}

/// Reverse-geocode a point, ask before saving, then enrich the new place.
///
/// # Errors
///
/// Returns an error if nothing is named at the coordinates or the place
/// cannot be saved.
pub(crate) async fn run_add(
    session: &mut Session,
    at: Coordinates,
    assume_yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    session.load().await?;

    let marker = session
        .on_map_click(at)
        .await
        .ok_or_else(|| anyhow::anyhow!("no city found at {}, {}", at.lat, at.lng))?;

    let question = format!(
        "Add {} ({}) to your wishlist?",
        if marker.country.is_empty() {
            marker.name.clone()
        } else {
            format!("{}, {}", marker.name, marker.country)
        },
        marker.city_code
    );
    if !assume_yes && !confirm(&question) {
        println!("not added");
        return Ok(());
    }

    let saved = session.on_confirm_add().await?;
    log_outcome(session.wait_for_enrichment().await);

    let departure = session.departure().to_string();
    let place = session
        .store()
        .read()
        .await
        .place(&saved.id)
        .cloned()
        .unwrap_or(saved);
    print_place(&place, &departure, json)
}

/// Delete a destination after confirmation.
///
/// # Errors
///
/// Returns an error if `query` matches no single place or the delete fails.
pub(crate) async fn run_delete(
    session: &mut Session,
    query: &str,
    assume_yes: bool,
) -> anyhow::Result<()> {
    session.load().await?;
    let id = resolve_place_id(&session.view().await.places, query)?;

    let outcome = session
        .on_delete(&id, |place| {
            assume_yes || confirm(&format!("Delete {} from your wishlist?", place.name))
        })
        .await?;

    match outcome {
        DeleteOutcome::Deleted => println!("deleted {query}"),
        DeleteOutcome::Declined => println!("kept {query}"),
    }
    Ok(())
}

/// Resolve a coordinate pair to a city without touching the wishlist.
pub(crate) async fn run_geocode(
    gateway: &HttpGateway,
    at: Coordinates,
    json: bool,
) -> anyhow::Result<()> {
    let Some(city) = gateway.city_from_coordinates(at).await else {
        anyhow::bail!("no city found at {}, {}", at.lat, at.lng);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&city)?);
    } else {
        println!("{}", render_city(&city));
    }
    Ok(())
}

/// Price a single route without touching the wishlist.
///
/// `to` may be an IATA code or a city name.
pub(crate) async fn run_flights(
    gateway: &HttpGateway,
    from: &str,
    to: &str,
    json: bool,
) -> anyhow::Result<()> {
    let origin = departure_code(from)
        .ok_or_else(|| anyhow::anyhow!("'{from}' is not a three-letter departure code"))?;

    let Some(estimate) = gateway.flight_estimates(&origin, to.trim()).await else {
        anyhow::bail!("no flight offers found from {origin} to {to}");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!(
            "{origin} \u{2192} {}  {}  ({})",
            estimate.arrival_airport,
            format_price(Some(&FlightQuote::Estimate(estimate.clone()))),
            estimate.duration,
        );
    }
    Ok(())
}

/// Look a place up by exact id, then by case-insensitive name.
pub(crate) fn resolve_place_id(places: &[Place], query: &str) -> anyhow::Result<String> {
    let query = query.trim();
    if let Some(place) = places.iter().find(|p| p.id == query) {
        return Ok(place.id.clone());
    }

    let matches: Vec<&Place> = places
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(query))
        .collect();
    match matches.as_slice() {
        [place] => Ok(place.id.clone()),
        [] => anyhow::bail!("no destination matches '{query}'"),
        many => {
            let ids: Vec<&str> = many.iter().map(|p| p.id.as_str()).collect();
            anyhow::bail!(
                "'{query}' matches {} destinations; use an id: [{}]",
                many.len(),
                ids.join(", ")
            )
        }
    }
}

fn print_place(place: &Place, departure: &str, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(place)?);
    } else {
        print!("{}", render_details(place, departure));
    }
    Ok(())
}

fn log_outcome(outcome: Option<EnrichOutcome>) {
    match outcome {
        Some(EnrichOutcome::Published(plan)) => tracing::debug!(
            place_id = %plan.place_id,
            departure = %plan.departure,
            "enrichment applied"
        ),
        Some(other) => tracing::debug!(outcome = ?other, "enrichment finished"),
        None => {}
    }
}

/// Ask a yes/no question on stderr; anything but `y`/`yes` is a no.
fn confirm(question: &str) -> bool {
    eprint!("{question} [y/N] ");
    if std::io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
