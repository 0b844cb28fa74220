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

//! Reservation lifecycle.
//!
//! Reservations follow a state machine:
//! - [`Requested`] → [`Confirmed`] (owner approves) or [`Rejected`] (owner rejects)
//! - [`Requested`] | [`Confirmed`] → [`Cancelled`] (either party cancels)
//!
//! `Rejected` and `Cancelled` are terminal. Reservations are never deleted,
//! only transitioned; cancelling a terminal reservation is a no-op success.
//!
//! [`Requested`]: ReservationStatus::Requested
//! [`Confirmed`]: ReservationStatus::Confirmed
//! [`Rejected`]: ReservationStatus::Rejected
//! [`Cancelled`]: ReservationStatus::Cancelled

use crate::base::{DateRange, PropertyId, ReservationId, UserId};
use crate::error::BookingError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical reservation status.
///
/// This enum is the single source of truth for the lifecycle. External
/// vocabularies (the legacy backend used `EN_ATTENTE`, `CONFIRMEE`,
/// `REFUSEE`, `ANNULEE`) are handled at the encode/decode boundary in
/// [`FromStr`], never as separate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Requested,
    Confirmed,
    Rejected,
    Cancelled,
}

impl ReservationStatus {
    /// True for states with no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// True for states that withhold the dates from new requests.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, Self::Requested | Self::Confirmed)
    }

    /// Canonical wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    /// Decodes canonical names plus the legacy backend vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" | "pending" | "EN_ATTENTE" => Ok(Self::Requested),
            "confirmed" | "CONFIRMEE" => Ok(Self::Confirmed),
            "rejected" | "REFUSEE" => Ok(Self::Rejected),
            "cancelled" | "canceled" | "ANNULEE" => Ok(Self::Cancelled),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// A tenant's request to occupy a property for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub property_id: PropertyId,
    pub requester: UserId,
    pub range: DateRange,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    /// Quote computed at creation time (nightly subtotal + fees).
    pub total_price: Option<Decimal>,
    /// Advisory note supplied on rejection, not validated.
    pub rejection_reason: Option<String>,
}

impl Reservation {
    pub fn new(
        id: ReservationId,
        property_id: PropertyId,
        requester: UserId,
        range: DateRange,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            property_id,
            requester,
            range,
            status: ReservationStatus::Requested,
            created_at,
            total_price: None,
            rejection_reason: None,
        }
    }

    /// Requested → Confirmed.
    pub fn approve(&mut self) -> Result<(), BookingError> {
        match self.status {
            ReservationStatus::Requested => {
                self.status = ReservationStatus::Confirmed;
                Ok(())
            }
            from => Err(BookingError::InvalidTransition {
                from,
                action: "approve",
            }),
        }
    }

    /// Requested → Rejected.
    pub fn reject(&mut self, reason: Option<String>) -> Result<(), BookingError> {
        match self.status {
            ReservationStatus::Requested => {
                self.status = ReservationStatus::Rejected;
                self.rejection_reason = reason;
                Ok(())
            }
            from => Err(BookingError::InvalidTransition {
                from,
                action: "reject",
            }),
        }
    }

    /// Requested | Confirmed → Cancelled.
    ///
    /// Returns `Ok(false)` when the reservation is already terminal:
    /// re-cancelling is treated as a no-op success, not an error.
    pub fn cancel(&mut self) -> Result<bool, BookingError> {
        match self.status {
            ReservationStatus::Requested | ReservationStatus::Confirmed => {
                self.status = ReservationStatus::Cancelled;
                Ok(true)
            }
            ReservationStatus::Rejected | ReservationStatus::Cancelled => Ok(false),
        }
    }
}
