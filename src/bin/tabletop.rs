//! CLI binary for the TableTop table-booking service.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabletop_rs::error::TableTopError;
use tabletop_rs::guard::{Access, Route};
use tabletop_rs::models::{
    Booking, BookingStatus, NaiveDate, NaiveTime, Restaurant, RestaurantQuery, Review,
};
use tabletop_rs::storage::{BlockingSessionStorage, FileSessionStorage};
use tabletop_rs::table_top::TableTopBlocking;

/// Environment variable overriding the API base URL.
const API_URL_ENV: &str = "TABLETOP_API_URL";

/// TableTop CLI — browse restaurants, manage favorites, book tables.
#[derive(Debug, Parser)]
#[command(name = "tabletop", version, about)]
struct Cli {
    /// Override the API base URL (default: $TABLETOP_API_URL or a
    /// local backend).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Override the session storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and persist the session.
    Login {
        /// Login name.
        username: String,
        /// Password.
        password: String,
    },
    /// Sign out and drop the persisted session.
    Logout,
    /// Show the signed-in identity.
    Whoami,
    /// List restaurants, optionally filtered.
    Restaurants(SearchArgs),
    /// Show one restaurant with its reviews.
    Show {
        /// Restaurant id.
        id: i64,
    },
    /// Show the top-rated feed.
    TopRated,
    /// List your favorite restaurants.
    Favorites,
    /// Toggle a restaurant in your favorites.
    Favorite {
        /// Restaurant id.
        id: i64,
    },
    /// List your bookings.
    Bookings,
    /// Book a table.
    Book(BookArgs),
    /// Cancel one of your bookings.
    Cancel {
        /// Booking id.
        id: i64,
    },
    /// Show the admin analytics dashboard.
    Analytics,
}

/// Arguments for the `restaurants` subcommand.
#[derive(Debug, Args)]
struct SearchArgs {
    /// Free-text search over name, cuisine, and city.
    #[arg(long)]
    search: Option<String>,
    /// Filter by city.
    #[arg(long)]
    city: Option<String>,
    /// Filter by cuisine.
    #[arg(long)]
    cuisine: Option<String>,
    /// Minimum average rating.
    #[arg(long)]
    min_rating: Option<f64>,
}

/// Arguments for the `book` subcommand.
#[derive(Debug, Args)]
struct BookArgs {
    /// Restaurant id.
    restaurant: i64,
    /// Reservation date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
    /// Reservation time (HH:MM).
    #[arg(long, value_parser = parse_time)]
    time: NaiveTime,
    /// Number of guests.
    #[arg(long, default_value_t = 2)]
    party: u32,
    /// Special requests (dietary, seating, ...).
    #[arg(long)]
    requests: Option<String>,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a time string in `HH:MM` format for clap.
fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|err| format!("{err}"))
}

/// Builds a catalog query from search arguments.
fn build_query(args: &SearchArgs) -> RestaurantQuery {
    let mut query = RestaurantQuery::new();
    if let Some(term) = args.search.as_deref() {
        query = query.search(term);
    }
    if let Some(city) = args.city.as_deref() {
        query = query.city(city);
    }
    if let Some(cuisine) = args.cuisine.as_deref() {
        query = query.cuisine(cuisine);
    }
    if let Some(rating) = args.min_rating {
        query = query.min_rating(rating);
    }
    query
}

/// Resolves the API base URL: flag first, then environment.
fn resolve_api_url(flag: Option<String>) -> Option<String> {
    flag.or_else(|| {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.is_empty())
    })
}

/// Creates the session storage, using `data_dir` if provided or the
/// default XDG data directory otherwise.
fn create_storage(data_dir: Option<PathBuf>) -> tabletop_rs::error::Result<FileSessionStorage> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileSessionStorage::default_dir()?,
    };
    FileSessionStorage::new(dir)
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let storage = match create_storage(cli.data_dir) {
        Ok(storage) => storage,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to initialize session storage: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut builder = TableTopBlocking::builder().storage(storage);
    if let Some(url) = resolve_api_url(cli.api_url) {
        builder = builder.base_url(url);
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to build client: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Err(err) = client.restore_session() {
        writeln!(
            io::stderr().lock(),
            "{} could not restore the previous session: {err}",
            "warning:".yellow().bold()
        )?;
    }

    dispatch(&client, cli.command)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: BlockingSessionStorage>(
    client: &TableTopBlocking<S>,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::Login { username, password } => cmd_login(client, username, password),
        Command::Logout => cmd_logout(client),
        Command::Whoami => cmd_whoami(client),
        Command::Restaurants(args) => cmd_restaurants(client, &args),
        Command::Show { id } => cmd_show(client, id),
        Command::TopRated => cmd_top_rated(client),
        Command::Favorites => cmd_favorites(client),
        Command::Favorite { id } => cmd_toggle_favorite(client, id),
        Command::Bookings => cmd_bookings(client),
        Command::Book(args) => cmd_book(client, &args),
        Command::Cancel { id } => cmd_cancel(client, id),
        Command::Analytics => cmd_analytics(client),
    }
}

/// Checks route access, explaining a refusal to the user.
///
/// Returns `Ok(true)` when navigation may proceed.
fn ensure_access<S: BlockingSessionStorage>(
    client: &TableTopBlocking<S>,
    route: Route,
) -> io::Result<bool> {
    let access = match client.route_access(route) {
        Ok(access) => access,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} session store failure: {err}",
                "error:".red().bold()
            )?;
            return Ok(false);
        }
    };
    match access {
        Access::Allow => Ok(true),
        Access::Redirect(target) if target == Route::Login => {
            writeln!(
                io::stderr().lock(),
                "{} this command requires signing in first (`tabletop login`)",
                "error:".red().bold()
            )?;
            Ok(false)
        }
        Access::Redirect(target) => {
            writeln!(
                io::stderr().lock(),
                "{} not available for this account (redirected to {})",
                "error:".red().bold(),
                target.path()
            )?;
            Ok(false)
        }
    }
}

/// Prints an API failure with a hint for expired sessions.
fn report_api_error(context: &str, err: &TableTopError) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{} {context}: {err}", "error:".red().bold())?;
    if err.is_auth_rejection() {
        writeln!(
            stderr,
            "  {} your session has expired — run `tabletop login` again",
            "hint:".cyan()
        )?;
    }
    Ok(())
}

// ── Subcommand handlers ──────────────────────────────────────────────

/// Executes `login`: authenticates and persists the session.
fn cmd_login<S: BlockingSessionStorage>(
    client: &TableTopBlocking<S>,
    username: String,
    password: String,
) -> io::Result<ExitCode> {
    let spinner = make_spinner("Signing in...");
    match client.login(username, password) {
        Ok(identity) => {
            spinner.finish_and_clear();
            writeln!(
                io::stdout().lock(),
                "{} signed in as {} ({:?})",
                "ok:".green().bold(),
                identity.display_name().bold(),
                identity.role
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("login failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `logout`: clears the session everywhere.
fn cmd_logout<S: BlockingSessionStorage>(client: &TableTopBlocking<S>) -> io::Result<ExitCode> {
    match client.logout() {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{} signed out", "ok:".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_api_error("logout failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `whoami`: shows the active identity.
fn cmd_whoami<S: BlockingSessionStorage>(client: &TableTopBlocking<S>) -> io::Result<ExitCode> {
    let mut out = io::stdout().lock();
    match client.identity() {
        Ok(Some(identity)) => {
            writeln!(
                out,
                "{} ({:?}), {} favorite(s)",
                identity.display_name().bold(),
                identity.role,
                identity.favorites.len()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            writeln!(out, "{}", "not signed in".dimmed())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_api_error("session read failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `restaurants`: lists the catalog with optional filters.
fn cmd_restaurants<S: BlockingSessionStorage>(
    client: &TableTopBlocking<S>,
    args: &SearchArgs,
) -> io::Result<ExitCode> {
    let query = build_query(args);
    let spinner = make_spinner("Loading restaurants...");
    match client.restaurants(&query) {
        Ok(listings) => {
            spinner.finish_and_clear();
            print_restaurants_table("Restaurants", &listings)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("failed to load restaurants", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `show`: one restaurant plus its reviews.
fn cmd_show<S: BlockingSessionStorage>(
    client: &TableTopBlocking<S>,
    id: i64,
) -> io::Result<ExitCode> {
    let restaurant_id = tabletop_rs::models::RestaurantId::new(id);
    let spinner = make_spinner("Loading restaurant...");
    let restaurant = match client.restaurant(restaurant_id) {
        Ok(found) => found,
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("failed to load restaurant", &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };
    let reviews = client.restaurant_reviews(restaurant_id).unwrap_or_default();
    spinner.finish_and_clear();
    print_restaurant_detail(&restaurant)?;
    print_reviews_table(&reviews)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `top-rated`: the analytics feed.
fn cmd_top_rated<S: BlockingSessionStorage>(client: &TableTopBlocking<S>) -> io::Result<ExitCode> {
    let spinner = make_spinner("Loading top-rated restaurants...");
    match client.top_rated() {
        Ok(listings) => {
            spinner.finish_and_clear();
            print_restaurants_table("Top Rated", &listings)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("failed to load top-rated feed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `favorites`: lists the signed-in user's favorites.
fn cmd_favorites<S: BlockingSessionStorage>(client: &TableTopBlocking<S>) -> io::Result<ExitCode> {
    if !ensure_access(client, Route::Favorites)? {
        return Ok(ExitCode::FAILURE);
    }
    let spinner = make_spinner("Loading favorites...");
    match client.favorites() {
        Ok(listings) => {
            spinner.finish_and_clear();
            print_restaurants_table("Favorites", &listings)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("failed to load favorites", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `favorite`: toggles one restaurant.
fn cmd_toggle_favorite<S: BlockingSessionStorage>(
    client: &TableTopBlocking<S>,
    id: i64,
) -> io::Result<ExitCode> {
    if !ensure_access(client, Route::Favorites)? {
        return Ok(ExitCode::FAILURE);
    }
    let spinner = make_spinner("Toggling favorite...");
    match client.toggle_favorite(tabletop_rs::models::RestaurantId::new(id)) {
        Ok(refreshed) => {
            spinner.finish_and_clear();
            writeln!(
                io::stdout().lock(),
                "{} favorites now hold {} restaurant(s)",
                "ok:".green().bold(),
                refreshed.len()
            )?;
            print_restaurants_table("Favorites", &refreshed)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("failed to toggle favorite", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `bookings`: lists the signed-in user's bookings.
fn cmd_bookings<S: BlockingSessionStorage>(client: &TableTopBlocking<S>) -> io::Result<ExitCode> {
    if !ensure_access(client, Route::MyBookings)? {
        return Ok(ExitCode::FAILURE);
    }
    let spinner = make_spinner("Loading bookings...");
    match client.bookings() {
        Ok(bookings) => {
            spinner.finish_and_clear();
            print_bookings_table(&bookings)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("failed to load bookings", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `book`: submits a booking request.
fn cmd_book<S: BlockingSessionStorage>(
    client: &TableTopBlocking<S>,
    args: &BookArgs,
) -> io::Result<ExitCode> {
    if !ensure_access(client, Route::Book)? {
        return Ok(ExitCode::FAILURE);
    }
    let spinner = make_spinner("Submitting booking...");
    match client.create_booking(
        tabletop_rs::models::RestaurantId::new(args.restaurant),
        args.date,
        args.time,
        args.party,
        args.requests.clone(),
    ) {
        Ok(booking) => {
            spinner.finish_and_clear();
            writeln!(
                io::stdout().lock(),
                "{} booking #{} submitted for {} at {} — status {:?}",
                "ok:".green().bold(),
                booking.id,
                booking.date,
                booking.time.format("%H:%M"),
                booking.status
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("booking failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `cancel`: requests cancellation of a booking.
fn cmd_cancel<S: BlockingSessionStorage>(
    client: &TableTopBlocking<S>,
    id: i64,
) -> io::Result<ExitCode> {
    if !ensure_access(client, Route::MyBookings)? {
        return Ok(ExitCode::FAILURE);
    }
    let spinner = make_spinner("Cancelling booking...");
    match client.cancel_booking(tabletop_rs::models::BookingId::new(id)) {
        Ok(booking) => {
            spinner.finish_and_clear();
            writeln!(
                io::stdout().lock(),
                "{} booking #{} is now {:?}",
                "ok:".green().bold(),
                booking.id,
                booking.status
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("cancellation failed", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `analytics`: the admin dashboard.
fn cmd_analytics<S: BlockingSessionStorage>(client: &TableTopBlocking<S>) -> io::Result<ExitCode> {
    if !ensure_access(client, Route::Analytics)? {
        return Ok(ExitCode::FAILURE);
    }
    let spinner = make_spinner("Assembling analytics...");
    match client.analytics() {
        Ok(summary) => {
            spinner.finish_and_clear();
            print_analytics(&summary)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            report_api_error("failed to load analytics", &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Maps a booking status to its badge color.
const fn status_color(status: BookingStatus) -> Color {
    match status {
        BookingStatus::Pending => Color::Yellow,
        BookingStatus::Confirmed => Color::Green,
        BookingStatus::Cancelled => Color::Red,
        BookingStatus::Completed => Color::Cyan,
    }
}

/// Formats an optional rating for display.
fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| "\u{2014}".to_owned(), |value| format!("{value:.1}"))
}

/// Prints restaurants in a table.
fn print_restaurants_table(title: &str, listings: &[Restaurant]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if listings.is_empty() {
        writeln!(out, "{}", "No restaurants found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Id").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Cuisine").fg(Color::Cyan),
        Cell::new("City").fg(Color::Cyan),
        Cell::new("Rating").fg(Color::Cyan),
        Cell::new("Price").fg(Color::Cyan),
    ]);

    for listing in listings {
        let price = listing.price_range.as_deref().unwrap_or("\u{2014}");
        _ = table.add_row(vec![
            Cell::new(listing.id),
            Cell::new(&listing.name),
            Cell::new(&listing.cuisine),
            Cell::new(&listing.city),
            Cell::new(format_rating(listing.rating)),
            Cell::new(price),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        title.green().bold(),
        format_args!("({})", listings.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints one restaurant's details.
fn print_restaurant_detail(restaurant: &Restaurant) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "{} {}",
        restaurant.name.green().bold(),
        format_args!("({})", format_rating(restaurant.rating)).dimmed()
    )?;
    writeln!(out, "  {} {}", "Cuisine:".bold(), restaurant.cuisine)?;
    writeln!(
        out,
        "  {} {}, {}",
        "Address:".bold(),
        restaurant.address,
        restaurant.city
    )?;
    if let Some(phone) = restaurant.phone.as_deref() {
        writeln!(out, "  {} {phone}", "Phone:".bold())?;
    }
    if let Some(description) = restaurant.description.as_deref() {
        writeln!(out, "  {description}")?;
    }
    if !restaurant.amenities.is_empty() {
        writeln!(out, "  {} {}", "Amenities:".bold(), restaurant.amenities.join(", "))?;
    }
    if let Some(hours) = restaurant.opening_hours.as_ref() {
        writeln!(out, "  {}", "Opening hours:".bold())?;
        for (day, window) in hours {
            writeln!(out, "    {day}: {window}")?;
        }
    }
    Ok(())
}

/// Prints reviews in a table.
fn print_reviews_table(reviews: &[Review]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if reviews.is_empty() {
        writeln!(out, "{}", "No reviews yet.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("User").fg(Color::Cyan),
        Cell::new("Rating").fg(Color::Cyan),
        Cell::new("Comment").fg(Color::Cyan),
    ]);
    for review in reviews {
        _ = table.add_row(vec![
            Cell::new(review.user_id),
            Cell::new(format!("{:.1}/5", review.rating)),
            Cell::new(review.comment.as_deref().unwrap_or("")),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Reviews".green().bold(),
        format_args!("({})", reviews.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints bookings in a table with status badges.
fn print_bookings_table(bookings: &[Booking]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if bookings.is_empty() {
        writeln!(out, "{}", "No bookings yet.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Id").fg(Color::Cyan),
        Cell::new("Restaurant").fg(Color::Cyan),
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Time").fg(Color::Cyan),
        Cell::new("Party").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
    ]);

    for booking in bookings {
        _ = table.add_row(vec![
            Cell::new(booking.id),
            Cell::new(booking.restaurant_id),
            Cell::new(booking.date),
            Cell::new(booking.time.format("%H:%M")),
            Cell::new(booking.party_size),
            Cell::new(format!("{:?}", booking.status)).fg(status_color(booking.status)),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "My Bookings".green().bold(),
        format_args!("({})", bookings.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the analytics dashboard.
fn print_analytics(summary: &tabletop_rs::analytics::AnalyticsSummary) -> io::Result<()> {
    {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", "Analytics".green().bold())?;
        writeln!(out)?;
        writeln!(out, "  {} {}", "Restaurants:".bold(), summary.total_restaurants)?;
        writeln!(out, "  {} {}", "Bookings:".bold(), summary.total_bookings)?;
        writeln!(
            out,
            "  {} {}",
            "Average rating:".bold(),
            format_rating(summary.average_rating)
        )?;
        writeln!(out)?;
    }

    print_restaurants_table("Top Rated", &summary.top_rated)?;

    let mut out = io::stdout().lock();
    if summary.most_booked.is_empty() {
        writeln!(out, "{}", "No bookings recorded yet.".dimmed())?;
        return Ok(());
    }
    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Restaurant").fg(Color::Cyan),
        Cell::new("Bookings").fg(Color::Cyan),
    ]);
    for ranked in &summary.most_booked {
        _ = table.add_row(vec![
            Cell::new(&ranked.restaurant.name),
            Cell::new(ranked.booking_count).fg(Color::Green),
        ]);
    }
    writeln!(out, "{}", "Most Booked".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output — if stderr itself failed, nothing
            // we can do.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
