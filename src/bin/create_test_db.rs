use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, OffsetDateTime, Time};

use cashbook_rs::{
    Ledger, OperationData, OperationKind, SqliteBackend, create_profile, initialize_db,
};

/// A utility for creating a test database for the web server of cashbook_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The name of the profile that owns the demo operations.
    #[arg(long, default_value = "Demo")]
    profile_name: String,
}

/// Demo operations as (kind, amount, description, account, day of month, hour).
const DEMO_OPERATIONS: [(OperationKind, f64, &str, &str, u8, u8); 6] = [
    (OperationKind::Income, 5500.0, "Salary", "Itaú", 5, 9),
    (OperationKind::Sale, 89.9, "Subscriptions", "Nubank", 8, 10),
    (OperationKind::Expense, 1200.0, "Rent", "Itaú", 10, 8),
    (OperationKind::Expense, 450.0, "Groceries", "Nubank", 12, 18),
    (OperationKind::Income, 800.0, "Freelance", "Inter", 15, 14),
    (OperationKind::Expense, 250.0, "Restaurant", "Nubank", 18, 20),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating profile {:?}...", args.profile_name);
    let profile = create_profile(&args.profile_name, None, &conn)?;

    let today = OffsetDateTime::now_utc().date();
    let mut ledger = Ledger::new(SqliteBackend::new(Arc::new(Mutex::new(conn))), profile.id);

    println!("Adding demo operations for {} {}...", today.month(), today.year());
    for (kind, amount, description, account, day, hour) in DEMO_OPERATIONS {
        // Days after today would be rejected as future operations.
        let date = Date::from_calendar_date(today.year(), today.month(), day.min(today.day()))?;

        ledger.add(&OperationData {
            kind,
            amount,
            description: description.to_owned(),
            account: account.to_owned(),
            date,
            time: Time::from_hms(hour, 0, 0)?,
        })?;
    }

    println!("Success!");

    Ok(())
}
