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

//! # Staybook
//!
//! This library provides a reservation engine for short-term space rentals:
//! it decides whether a date range can be booked, what it costs, what state
//! a booking is in, and when a stay becomes reviewable.
//!
//! ## Core Components
//!
//! - [`Engine`]: Central coordinator holding per-property timelines
//! - [`Reservation`]: A tenant's booking request tracked through its lifecycle
//! - [`DayStatus`]: Calendar day resolution (available/booked/blocked/pending)
//! - [`PriceSchedule`]: Layered pricing rules over a base nightly price
//! - [`BookingError`]: Business-rule outcomes for booking operations
//!
//! ## Example
//!
//! ```
//! use staybook_rs::{Engine, EngineConfig, FixedClock, Property, PropertyId, UserId};
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//!
//! let clock = FixedClock::new("2025-09-01".parse().unwrap());
//! let engine = Engine::with_clock(Arc::new(clock), EngineConfig::default());
//! engine.register_property(Property::new(PropertyId(1), UserId(10), dec!(100)));
//!
//! // A tenant requests three nights.
//! let reservation = engine
//!     .create_reservation(
//!         PropertyId(1),
//!         UserId(7),
//!         "2025-09-10".parse().unwrap(),
//!         "2025-09-13".parse().unwrap(),
//!     )
//!     .unwrap();
//!
//! // The owner approves it.
//! let confirmed = engine.approve(reservation.id, UserId(10)).unwrap();
//! assert_eq!(confirmed.total_price, Some(dec!(345.00)));
//! ```
//!
//! ## Thread Safety
//!
//! Each property's timeline sits behind its own lock, so the conflict check
//! and the write it guards form one atomic unit per property while requests
//! for different properties proceed in parallel.

pub mod availability;
mod base;
pub mod calendar;
mod clock;
mod config;
mod engine;
pub mod error;
mod events;
pub mod pricing;
mod property;
pub mod reservation;
mod review;

pub use availability::{GRID_CELLS, MonthCell, MonthGrid};
pub use base::{BlockId, DateRange, PropertyId, ReservationId, ReviewId, UserId};
pub use calendar::{CalendarBlock, DayStatus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{Engine, ReservationStats};
pub use error::BookingError;
pub use events::{BookingEvent, EventOutbox};
pub use pricing::{FeeSchedule, PriceSchedule, PricingRule, Quote, RuleClass};
pub use property::Property;
pub use reservation::{Reservation, ReservationStatus};
pub use review::{Review, ReviewLog};
