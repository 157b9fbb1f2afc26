use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use lodging_store::collections::OpCounters;
use lodging_store::config::Config;
use lodging_store::records::DataDir;
use lodging_store::{
    telemetry, Booking, BookingRequest, Canceller, Date, PaymentMethod, Registry, SearchCriteria,
};

/// Payment method accepted on the command line.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PaymentArg {
    /// Bank transfer (PSE).
    #[default]
    Pse,
    /// Credit card.
    Card,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Pse => PaymentMethod::Pse,
            PaymentArg::Card => PaymentMethod::CreditCard,
        }
    }
}

#[derive(Parser)]
#[command(name = "lodging")]
#[command(about = "Query and update lodging reservations stored in flat text files")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the record files (overrides the config)
    #[arg(long, global = true, env = "LODGING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Current date as DD/MM/YYYY (defaults to the system clock)
    #[arg(long, global = true)]
    today: Option<Date>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the weekday of a date and optionally shift it
    Date {
        /// Date (DD/MM/YYYY)
        date: Date,

        /// Add this many nights
        #[arg(long)]
        nights: Option<u16>,

        /// Add this many years
        #[arg(long)]
        years: Option<u8>,
    },

    #[command(flatten)]
    Records(RecordCommand),
}

/// Commands that read the data directory.
#[derive(Subcommand)]
enum RecordCommand {
    /// Check whether a lodging is free for a stay
    Available {
        /// Lodging code
        lodging: u32,

        /// Entry date (DD/MM/YYYY)
        entry: Date,

        /// Number of nights
        nights: u16,
    },

    /// Book a lodging for a guest
    Book {
        /// Lodging code
        #[arg(long)]
        lodging: u32,

        /// Guest document
        #[arg(long)]
        guest: u64,

        /// Entry date (DD/MM/YYYY)
        #[arg(long)]
        entry: Date,

        /// Number of nights
        #[arg(long)]
        nights: u16,

        /// Payment method
        #[arg(long, value_enum, default_value_t)]
        payment: PaymentArg,

        /// Payment date (defaults to today)
        #[arg(long)]
        paid_on: Option<Date>,

        /// Notes for the host
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Cancel a booking and record it in the cancellation file
    Cancel {
        /// Booking code
        code: u32,

        /// Only cancel if the booking is for one of this host's lodgings
        #[arg(long, conflicts_with = "guest")]
        host: Option<u64>,

        /// Only cancel if the booking belongs to this guest
        #[arg(long)]
        guest: Option<u64>,
    },

    /// Move bookings that ended before a date into the history file
    Archive {
        /// Cutoff date (defaults to today)
        #[arg(long)]
        before: Option<Date>,

        /// Only archive bookings of this host's lodgings
        #[arg(long)]
        host: Option<u64>,
    },

    /// List a host's bookings with entry dates in a range
    Bookings {
        /// Host document
        host: u64,

        /// First entry date (DD/MM/YYYY)
        from: Date,

        /// Last entry date (DD/MM/YYYY)
        to: Date,
    },

    /// Find lodgings free for a stay in a municipality
    Search {
        /// Municipality name (case-insensitive)
        municipality: String,

        /// Entry date (DD/MM/YYYY)
        entry: Date,

        /// Number of nights
        nights: u16,

        /// Highest nightly price
        #[arg(long)]
        max_price: Option<f32>,

        /// Lowest host rating
        #[arg(long)]
        min_rating: Option<f32>,
    },

    /// Show record counts, store shape and operation counts
    Stats,
}

fn print_booking(booking: &Booking) {
    println!(
        "#{:<6} lodging {:<6} guest {:<12} {} -> {} ({} nights) {:>10.2} {}{}",
        booking.code,
        booking.lodging_code,
        booking.guest_document,
        booking.entry,
        booking.exit(),
        booking.nights,
        booking.amount,
        booking.payment,
        if booking.notes.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", booking.notes)
        }
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    telemetry::init(&config.logging)?;

    let today = cli.today.unwrap_or_else(Date::today);
    let data = DataDir::with_names(
        cli.data_dir.clone().unwrap_or_else(|| config.data.dir.clone()),
        config.data.file_names(),
    );

    let command = match cli.command {
        Commands::Date { date, nights, years } => {
            show_date(date, nights, years);
            return Ok(());
        }
        Commands::Records(command) => command,
    };

    let counters = OpCounters::new();
    let (mut registry, report) = data
        .load_with_instrument(config.policy.into(), &counters)
        .with_context(|| format!("Failed to load records from {}", data.root().display()))?;
    if !report.skipped.is_empty() {
        eprintln!("Skipped {} malformed record(s)", report.skipped.len());
    }

    run(command, &mut registry, &data, today, &counters)
}

fn show_date(date: Date, nights: Option<u16>, years: Option<u8>) {
    println!("{} is a {}", date, date.weekday_name());
    if let Some(nights) = nights {
        let shifted = date.add_nights(nights);
        println!("+{nights} nights: {} ({})", shifted, shifted.weekday_name());
    }
    if let Some(years) = years {
        let shifted = date.add_years(years);
        println!("+{years} years: {} ({})", shifted, shifted.weekday_name());
    }
}

fn run(
    command: RecordCommand,
    registry: &mut Registry<&OpCounters>,
    data: &DataDir,
    today: Date,
    counters: &OpCounters,
) -> Result<()> {
    match command {
        RecordCommand::Available {
            lodging,
            entry,
            nights,
        } => {
            let exit = entry.add_nights(nights);
            if registry.is_available(lodging, entry, exit)? {
                println!("Lodging {lodging} is available from {entry} to {exit}");
            } else {
                println!("Lodging {lodging} is NOT available from {entry} to {exit}");
            }
        }

        RecordCommand::Book {
            lodging,
            guest,
            entry,
            nights,
            payment,
            paid_on,
            notes,
        } => {
            let request = BookingRequest {
                lodging_code: lodging,
                guest_document: guest,
                entry,
                nights,
                payment: payment.into(),
                paid_on: paid_on.unwrap_or(today),
                notes,
            };
            let booking = registry.book(request, today)?;
            println!("Booked:");
            print_booking(booking);
            data.save_bookings(registry)?;
        }

        RecordCommand::Cancel { code, host, guest } => {
            let by = host.map(Canceller::Host).or_else(|| guest.map(Canceller::Guest));
            let booking = registry.cancel(code, by)?;
            data.append_cancellation(&booking)?;
            data.save_bookings(registry)?;
            println!("Cancelled:");
            print_booking(&booking);
        }

        RecordCommand::Archive { before, host } => {
            let cutoff = before.unwrap_or(today);
            let archived = registry.archive_before(cutoff, host)?;
            data.append_history(&archived)?;
            data.save_bookings(registry)?;
            println!("Archived {} booking(s) that ended before {cutoff}", archived.len());
            for booking in &archived {
                print_booking(booking);
            }
        }

        RecordCommand::Bookings { host, from, to } => {
            let bookings = registry.host_bookings_between(host, from, to)?;
            if bookings.is_empty() {
                println!("No bookings for host {host} between {from} and {to}");
            }
            for booking in bookings {
                print_booking(booking);
            }
        }

        RecordCommand::Search {
            municipality,
            entry,
            nights,
            max_price,
            min_rating,
        } => {
            let criteria = SearchCriteria {
                entry,
                nights,
                municipality,
                max_price,
                min_rating,
            };
            let found = registry.search(&criteria);
            if found.is_empty() {
                println!("No lodgings match");
            }
            for lodging in found {
                println!(
                    "{:<6} {:<24} {:<10} {:<16} {:>10.2}/night  {}",
                    lodging.code,
                    lodging.name,
                    lodging.kind,
                    lodging.municipality,
                    lodging.nightly_price,
                    lodging.address
                );
            }
        }

        RecordCommand::Stats => {
            let load = counters.reset();
            let stats = registry.stats();
            println!("Hosts:              {}", stats.hosts);
            println!("Guests:             {}", stats.guests);
            println!("Lodgings:           {}", stats.lodgings);
            println!("Bookings:           {}", stats.bookings);
            println!("Last booking code:  {}", stats.last_booking_code);
            println!("Longest chain:      {}", stats.longest_chain);
            println!("Approx. memory:     {} bytes", stats.approx_memory_usage);
            println!(
                "Load operations:    {} inserts, {} finds, {} chain steps",
                load.inserts, load.finds, load.steps
            );
        }
    }

    Ok(())
}
