// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Events organised under signed contracts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crm_auth::{Guard, Keyed};
use crm_core::{CrmError, CrmResult, Database, Event, RecordId, Role};

use crate::fields;
use crate::rules;

/// An event to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event name.
    pub name: String,
    /// Location.
    pub location: String,
    /// Expected attendees.
    pub attendees: u32,
    /// Start time.
    pub start_date: DateTime<Utc>,
    /// End time.
    pub end_date: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// Event fields to change; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventChanges {
    /// Event name.
    pub name: Option<String>,
    /// Location.
    pub location: Option<String>,
    /// Expected attendees.
    pub attendees: Option<u32>,
    /// Start time.
    pub start_date: Option<DateTime<Utc>>,
    /// End time.
    pub end_date: Option<DateTime<Utc>>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl EventChanges {
    fn apply(self, event: &mut Event) -> CrmResult<()> {
        if let Some(name) = self.name {
            fields::non_empty("name", &name)?;
            event.name = name;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(attendees) = self.attendees {
            event.attendees = attendees;
        }
        if let Some(start_date) = self.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            event.end_date = end_date;
        }
        if let Some(notes) = self.notes {
            event.notes = notes;
        }
        event.validate()
    }
}

// =============================================================================
// EventService
// =============================================================================

/// Event operations.
#[derive(Debug, Clone)]
pub struct EventService {
    db: Arc<Database>,
    guard: Guard,
}

impl EventService {
    /// Creates the service.
    pub fn new(db: Arc<Database>, guard: Guard) -> Self {
        Self { db, guard }
    }

    /// Lists events.
    pub fn list(&self) -> CrmResult<Vec<Event>> {
        self.guard.call(&rules::EVENT_READ, (), |_| {
            Ok(self.db.read().events().cloned().collect())
        })
    }

    /// Returns one event.
    pub fn get(&self, pk: RecordId) -> CrmResult<Event> {
        self.guard.call(&rules::EVENT_READ, pk, |inv| {
            self.db
                .read()
                .event(inv.args)
                .cloned()
                .ok_or_else(|| CrmError::not_found("Event", inv.args))
        })
    }

    /// Creates an event under a signed contract of the calling salesman.
    pub fn create(&self, contract_id: RecordId, new: NewEvent) -> CrmResult<Event> {
        self.guard
            .call(&rules::EVENT_CREATE, Keyed::new(contract_id, new), |inv| {
                let Keyed { pk, data } = inv.args;
                fields::non_empty("name", &data.name)?;

                let mut scope = self.db.write();
                let id = scope.insert_event(Event {
                    id: 0,
                    contract_id: pk,
                    support_id: None,
                    name: data.name,
                    location: data.location,
                    attendees: data.attendees,
                    start_date: data.start_date,
                    end_date: data.end_date,
                    notes: data.notes,
                })?;
                let created = scope.event_mut(id)?.clone();
                scope.commit()?;
                info!(event = id, contract = pk, "Event created");
                Ok(created)
            })
    }

    /// Updates an event the caller supports, or an unstaffed one of their contract.
    pub fn update(&self, pk: RecordId, changes: EventChanges) -> CrmResult<Event> {
        self.guard
            .call(&rules::EVENT_UPDATE, Keyed::new(pk, changes), |inv| {
                let mut scope = self.db.write();
                let event = scope.event_mut(inv.args.pk)?;
                inv.args.data.apply(event)?;
                let updated = event.clone();
                scope.commit()?;
                info!(event = pk, "Event updated");
                Ok(updated)
            })
    }

    /// Assigns or clears the support collaborator.
    pub fn modify_support(&self, pk: RecordId, support: Option<RecordId>) -> CrmResult<Event> {
        self.guard
            .call(&rules::EVENT_MODIFY_SUPPORT, Keyed::new(pk, support), |inv| {
                let Keyed { pk, data: support } = inv.args;
                let mut scope = self.db.write();
                if let Some(support) = support {
                    let collaborator = scope.require_collaborator(support)?;
                    if collaborator.role != Role::Support {
                        return Err(CrmError::validation(
                            "support_id",
                            format!("{} is not in support", collaborator.username),
                        ));
                    }
                }
                let event = scope.event_mut(pk)?;
                event.support_id = support;
                let updated = event.clone();
                scope.commit()?;
                info!(event = pk, support = ?support, "Event support changed");
                Ok(updated)
            })
    }

    /// Deletes an event.
    pub fn delete(&self, pk: RecordId) -> CrmResult<Event> {
        self.guard.call(&rules::EVENT_DELETE, pk, |inv| {
            let mut scope = self.db.write();
            let removed = scope.remove_event(inv.args)?;
            scope.commit()?;
            info!(event = pk, "Event deleted");
            Ok(removed)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
