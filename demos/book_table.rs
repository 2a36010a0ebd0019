//! End-to-end demo: sign in, find a restaurant, book a table, then
//! cancel the booking.
//!
//! Requires a running TableTop backend; set `TABLETOP_API_URL` if it
//! is not on localhost.
//!
//! Run: `cargo run --example book_table`

use std::process::ExitCode;

use chrono::{Days, NaiveTime, Utc};
use tabletop_rs::models::RestaurantQuery;
use tabletop_rs::storage::FileSessionStorage;
use tabletop_rs::table_top::TableTopBlocking;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _dotenv = dotenvy::dotenv();

    let storage = FileSessionStorage::new(FileSessionStorage::default_dir()?)?;
    let mut builder = TableTopBlocking::builder().storage(storage);
    if let Ok(url) = std::env::var("TABLETOP_API_URL") {
        builder = builder.base_url(url);
    }
    let client = builder.build()?;

    let identity = client.login("john_doe", "password123")?;
    println!(
        "Signed in as {} with {} favorite(s)",
        identity.display_name(),
        identity.favorites.len()
    );

    // Pick the first match in Colombo for the demo booking.
    let listings = client.restaurants(&RestaurantQuery::new().city("Colombo"))?;
    let restaurant = listings.first().ok_or("no restaurants found")?;
    println!("Booking a table at {}", restaurant.name);

    let tomorrow = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .ok_or("calendar overflow")?;
    let seven_pm = NaiveTime::from_hms_opt(19, 0, 0).ok_or("invalid time")?;
    let booking = client.create_booking(
        restaurant.id,
        tomorrow,
        seven_pm,
        2,
        Some("window seat, please".to_owned()),
    )?;
    println!("Created booking #{} — status {:?}", booking.id, booking.status);

    let cancelled = client.cancel_booking(booking.id)?;
    println!("Cancelled booking #{} — status {:?}", cancelled.id, cancelled.status);

    client.logout()?;
    println!("Signed out");
    Ok(())
}
