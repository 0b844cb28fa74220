// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 The staybook-rs Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use staybook_rs::{
    BlockId, DateRange, Engine, PropertyId, Reservation, ReservationId, UserId,
    Property,
};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Booking Engine - Replay booking command CSV files
///
/// Reads booking commands from a CSV file, runs them through the engine,
/// and outputs the resulting reservation states to stdout.
#[derive(Parser, Debug)]
#[command(name = "staybook-rs")]
#[command(about = "A booking engine that replays command CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with booking commands
    ///
    /// Expected format: op,property,actor,start,end,amount,id,note
    /// Example: cargo run -- bookings.csv > reservations.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let engine = match replay_commands(BufReader::new(file)) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error replaying commands: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_reservations(&engine, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, property, actor, start, end, amount, id, note`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    property: u32,
    actor: u32,
    #[serde(deserialize_with = "csv::invalid_option")]
    start: Option<chrono::NaiveDate>,
    #[serde(deserialize_with = "csv::invalid_option")]
    end: Option<chrono::NaiveDate>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
    #[serde(deserialize_with = "csv::invalid_option")]
    id: Option<u64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    note: Option<String>,
}

/// One booking command.
#[derive(Debug)]
enum Command {
    RegisterProperty {
        property: PropertyId,
        owner: UserId,
        base_price: Decimal,
    },
    Block {
        property: PropertyId,
        actor: UserId,
        range: DateRange,
        label: Option<String>,
    },
    Unblock {
        property: PropertyId,
        actor: UserId,
        block: BlockId,
    },
    Override {
        property: PropertyId,
        actor: UserId,
        range: DateRange,
        price: Decimal,
    },
    Seasonal {
        property: PropertyId,
        actor: UserId,
        range: DateRange,
        multiplier: u32,
    },
    Weekend {
        property: PropertyId,
        actor: UserId,
        range: DateRange,
        multiplier: u32,
    },
    Reserve {
        property: PropertyId,
        requester: UserId,
        range: DateRange,
    },
    Approve {
        reservation: ReservationId,
        actor: UserId,
    },
    Reject {
        reservation: ReservationId,
        actor: UserId,
        reason: Option<String>,
    },
    Cancel {
        reservation: ReservationId,
        actor: UserId,
    },
    Review {
        reservation: ReservationId,
        actor: UserId,
        rating: u8,
        comment: String,
    },
}

impl CsvRecord {
    /// Converts a CSV record to a command.
    ///
    /// Returns `None` for unknown ops or missing required fields.
    fn into_command(self) -> Option<Command> {
        let property = PropertyId(self.property);
        let actor = UserId(self.actor);
        let range = match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end).ok(),
            _ => None,
        };

        match self.op.to_lowercase().as_str() {
            "property" => Some(Command::RegisterProperty {
                property,
                owner: actor,
                base_price: self.amount?,
            }),
            "block" => Some(Command::Block {
                property,
                actor,
                range: range?,
                label: self.note,
            }),
            "unblock" => Some(Command::Unblock {
                property,
                actor,
                block: BlockId(self.id?),
            }),
            "override" => Some(Command::Override {
                property,
                actor,
                range: range?,
                price: self.amount?,
            }),
            "seasonal" => Some(Command::Seasonal {
                property,
                actor,
                range: range?,
                multiplier: self.amount?.to_u32()?,
            }),
            "weekend" => Some(Command::Weekend {
                property,
                actor,
                range: range?,
                multiplier: self.amount?.to_u32()?,
            }),
            "reserve" => Some(Command::Reserve {
                property,
                requester: actor,
                range: range?,
            }),
            "approve" => Some(Command::Approve {
                reservation: ReservationId(self.id?),
                actor,
            }),
            "reject" => Some(Command::Reject {
                reservation: ReservationId(self.id?),
                actor,
                reason: self.note,
            }),
            "cancel" => Some(Command::Cancel {
                reservation: ReservationId(self.id?),
                actor,
            }),
            "review" => Some(Command::Review {
                reservation: ReservationId(self.id?),
                actor,
                rating: self.amount?.to_u8()?,
                comment: self.note.unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

fn apply(engine: &Engine, command: Command) -> Result<(), staybook_rs::BookingError> {
    match command {
        Command::RegisterProperty {
            property,
            owner,
            base_price,
        } => {
            engine.register_property(Property::new(property, owner, base_price));
            Ok(())
        }
        Command::Block {
            property,
            actor,
            range,
            label,
        } => engine.add_block(property, actor, range, label).map(|_| ()),
        Command::Unblock {
            property,
            actor,
            block,
        } => engine.remove_block(property, actor, block),
        Command::Override {
            property,
            actor,
            range,
            price,
        } => engine.set_price_override(property, actor, range, price),
        Command::Seasonal {
            property,
            actor,
            range,
            multiplier,
        } => engine.set_seasonal_rule(property, actor, range, multiplier),
        Command::Weekend {
            property,
            actor,
            range,
            multiplier,
        } => engine.set_weekend_rule(property, actor, range, multiplier),
        Command::Reserve {
            property,
            requester,
            range,
        } => engine
            .create_reservation(property, requester, range.start, range.end)
            .map(|_| ()),
        Command::Approve { reservation, actor } => engine.approve(reservation, actor).map(|_| ()),
        Command::Reject {
            reservation,
            actor,
            reason,
        } => engine.reject(reservation, actor, reason).map(|_| ()),
        Command::Cancel { reservation, actor } => engine.cancel(reservation, actor).map(|_| ()),
        Command::Review {
            reservation,
            actor,
            rating,
            comment,
        } => engine
            .submit_review(reservation, actor, rating, comment)
            .map(|_| ()),
    }
}

/// Replays booking commands from a CSV reader.
///
/// Streaming parse; malformed rows and business-rule rejections are skipped
/// with a warning, so one bad command never aborts the replay.
///
/// # CSV Format
///
/// Expected columns: `op, property, actor, start, end, amount, id, note`
///
/// ```csv
/// op,property,actor,start,end,amount,id,note
/// property,1,10,,,100,,
/// reserve,1,7,2025-09-10,2025-09-13,,,
/// approve,1,10,,,,1,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn replay_commands<R: Read>(reader: R) -> Result<Engine, csv::Error> {
    let engine = Engine::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // Allow trailing fields to be omitted
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some(command) = record.into_command() else {
                    warn!("skipping invalid command record");
                    continue;
                };

                // Business-rule rejections don't stop the replay.
                if let Err(e) = apply(&engine, command) {
                    warn!(error = %e, "skipping rejected command");
                }
            }
            Err(e) => {
                warn!(error = %e, "skipping malformed row");
                continue;
            }
        }
    }

    Ok(engine)
}

/// Output row for a reservation.
#[derive(Debug, Serialize)]
struct ReservationRow {
    id: u64,
    property: u32,
    requester: u32,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    status: &'static str,
    total: Option<Decimal>,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        ReservationRow {
            id: r.id.0,
            property: r.property_id.0,
            requester: r.requester.0,
            start: r.range.start,
            end: r.range.end,
            status: r.status.as_str(),
            total: r.total_price,
        }
    }
}

/// Writes every reservation state to a CSV writer.
///
/// Columns: `id, property, requester, start, end, status, total`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_reservations<W: Write>(engine: &Engine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    // Reservation ids are assigned sequentially starting at 1.
    let mut id = 1u64;
    while let Some(reservation) = engine.get_reservation(ReservationId(id)) {
        wtr.serialize(ReservationRow::from(&reservation))?;
        id += 1;
    }

    wtr.flush()?;
    Ok(())
}
