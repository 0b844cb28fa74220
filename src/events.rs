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

//! Notification boundary.
//!
//! Every committed transition publishes an event to a lock-free outbox. The
//! notification system consumes them fire-and-forget; publishing never
//! blocks a state transition and never fails it.

use crate::base::{PropertyId, ReservationId, ReviewId, UserId};
use crossbeam::queue::SegQueue;
use serde::Serialize;

/// Events emitted by committed booking operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BookingEvent {
    ReservationCreated {
        reservation_id: ReservationId,
        property_id: PropertyId,
        requester: UserId,
        owner: UserId,
    },
    ReservationApproved {
        reservation_id: ReservationId,
        property_id: PropertyId,
        requester: UserId,
        owner: UserId,
    },
    ReservationRejected {
        reservation_id: ReservationId,
        property_id: PropertyId,
        requester: UserId,
        owner: UserId,
    },
    ReservationCancelled {
        reservation_id: ReservationId,
        property_id: PropertyId,
        requester: UserId,
        cancelled_by: UserId,
    },
    ReviewSubmitted {
        review_id: ReviewId,
        reservation_id: ReservationId,
        property_id: PropertyId,
        reviewer: UserId,
    },
}

/// Lock-free FIFO outbox for booking events.
#[derive(Debug, Default)]
pub struct EventOutbox {
    queue: SegQueue<BookingEvent>,
}

impl EventOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes an event. Never blocks, never fails.
    pub fn publish(&self, event: BookingEvent) {
        self.queue.push(event);
    }

    /// Drains all queued events in publication order.
    pub fn drain(&self) -> Vec<BookingEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.queue.pop() {
            events.push(event);
        }
        events
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
