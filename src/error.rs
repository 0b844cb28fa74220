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

//! Error types for booking operations.
//!
//! Every variant is an expected, user-facing outcome of a business rule,
//! not a system failure. Callers can match on them to drive UI feedback;
//! none of them warrant a retry.

use crate::reservation::ReservationStatus;
use thiserror::Error;

/// Booking and review processing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Start date is not strictly after today, or end <= start
    #[error("invalid date range (start must be after today, end after start)")]
    InvalidDateRange,

    /// Requested range conflicts with an existing reservation or block
    #[error("requested dates are not available")]
    DateRangeUnavailable,

    /// State machine operation not legal from the current status
    #[error("cannot {action} a reservation in status {from}")]
    InvalidTransition {
        from: ReservationStatus,
        action: &'static str,
    },

    /// Actor does not own the resource or lacks the required role
    #[error("actor is not authorized for this operation")]
    NotAuthorized,

    /// Referenced property does not exist
    #[error("property not found")]
    PropertyNotFound,

    /// Property exists but is not accepting reservations
    #[error("property is not active")]
    PropertyInactive,

    /// Referenced reservation does not exist
    #[error("reservation not found")]
    ReservationNotFound,

    /// Referenced calendar block does not exist
    #[error("calendar block not found")]
    BlockNotFound,

    /// Reservation is not confirmed-and-ended, so it cannot be reviewed
    #[error("reservation is not eligible for review")]
    NotEligible,

    /// A review already exists for this reservation
    #[error("reservation has already been reviewed")]
    DuplicateReview,

    /// Rating outside the 1-5 scale
    #[error("rating must be between 1 and 5")]
    InvalidRating,

    /// Multiplier or price outside the accepted range
    #[error("invalid price or multiplier (must be positive)")]
    InvalidPrice,
}
