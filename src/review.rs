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

//! Reviews and the append-only review log.
//!
//! A review is a 1:1 derivative of a completed, confirmed reservation. The
//! log enforces the one-review-per-reservation constraint with an atomic
//! check-and-insert; reviews are never edited or deleted.

use crate::base::{PropertyId, ReservationId, ReviewId, UserId};
use crate::error::BookingError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A rating and comment tied to one reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub property_id: PropertyId,
    pub reservation_id: ReservationId,
    pub reviewer: UserId,
    /// 1-5 inclusive.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe append-only review storage.
///
/// Combines a map keyed by review id with a uniqueness index on the
/// originating reservation. All operations are safe for concurrent access.
#[derive(Debug, Default)]
pub struct ReviewLog {
    reviews: DashMap<ReviewId, Arc<Review>>,
    /// Uniqueness constraint: at most one review per reservation.
    by_reservation: DashMap<ReservationId, ReviewId>,
}

impl ReviewLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a review.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::DuplicateReview`] if the reservation already
    /// has a review. The reservation index is claimed first via the entry
    /// API so two concurrent submissions cannot both succeed.
    pub fn append(&self, review: Review) -> Result<Arc<Review>, BookingError> {
        match self.by_reservation.entry(review.reservation_id) {
            Entry::Occupied(_) => Err(BookingError::DuplicateReview),
            Entry::Vacant(entry) => {
                entry.insert(review.id);
                let review = Arc::new(review);
                self.reviews.insert(review.id, Arc::clone(&review));
                Ok(review)
            }
        }
    }

    pub fn get(&self, id: ReviewId) -> Option<Arc<Review>> {
        self.reviews.get(&id).map(|r| Arc::clone(&r))
    }

    /// True when the reservation already has a review.
    pub fn has_review_for(&self, reservation_id: ReservationId) -> bool {
        self.by_reservation.contains_key(&reservation_id)
    }

    /// All reviews for a property, newest first.
    pub fn for_property(&self, property_id: PropertyId) -> Vec<Arc<Review>> {
        let mut reviews: Vec<Arc<Review>> = self
            .reviews
            .iter()
            .filter(|r| r.property_id == property_id)
            .map(|r| Arc::clone(r.value()))
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        reviews
    }

    pub fn count_for_property(&self, property_id: PropertyId) -> usize {
        self.reviews
            .iter()
            .filter(|r| r.property_id == property_id)
            .count()
    }

    /// Mean rating for a property, `None` when unreviewed.
    pub fn average_rating(&self, property_id: PropertyId) -> Option<Decimal> {
        let ratings: Vec<u8> = self
            .reviews
            .iter()
            .filter(|r| r.property_id == property_id)
            .map(|r| r.rating)
            .collect();
        if ratings.is_empty() {
            return None;
        }
        let sum: u64 = ratings.iter().map(|&r| r as u64).sum();
        Some((Decimal::from(sum) / Decimal::from(ratings.len() as u64)).round_dp(2))
    }
}
