//! Aggregate building blocks: staged domain events, identity and the
//! initialization guard.
//!
//! Aggregates compose these pieces instead of inheriting them:
//!
//! - `EventBuffer` - ordered, instance-owned queue of uncommitted events with
//!   an initialization guard that suppresses non-forced events
//! - `AggregateCore` - identity + event buffer + persistence marker, embedded
//!   as a field of each aggregate root
//! - `AggregateRoot` - trait exposing the core, with the queries the unit of
//!   work needs (`is_new`, `uncommitted_events`, `take_events`, ...)
//!
//! # Flush contract
//!
//! The buffer is drained by the unit of work strictly after a durable commit.
//! It is never truncated partially: either `take_events`/`clear` empties it,
//! or the whole aggregate instance is discarded after a failed transaction.

use std::fmt;

use super::{DomainEvent, TypedEvent};

/// Ordered queue of domain events staged during in-memory mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBuffer<E> {
    events: Vec<E>,
    initializing: bool,
}

impl<E: DomainEvent> EventBuffer<E> {
    /// Creates an empty buffer outside of initialization.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            initializing: false,
        }
    }

    /// Opens the initialization guard.
    pub fn begin_init(&mut self) {
        self.initializing = true;
    }

    /// Closes the initialization guard.
    pub fn end_init(&mut self) {
        self.initializing = false;
    }

    /// True only between `begin_init` and `end_init`.
    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    /// Stages an event unless the initialization guard is open.
    ///
    /// Returns whether the event was appended.
    #[must_use = "the event is dropped while the initialization guard is open"]
    pub fn add_event(&mut self, event: E) -> bool {
        if self.initializing {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Stages an event even while the initialization guard is open.
    pub fn add_event_forced(&mut self, event: E) {
        self.events.push(event);
    }

    /// Stages a batch of events. Either all are appended or, when the
    /// initialization guard is open, none are.
    #[must_use = "the events are dropped while the initialization guard is open"]
    pub fn add_events<I>(&mut self, events: I) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        if self.initializing {
            return false;
        }
        self.events.extend(events);
        true
    }

    /// Stages a batch of events regardless of the initialization guard.
    pub fn add_events_forced<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = E>,
    {
        self.events.extend(events);
    }

    /// Returns true if an event of kind `T` is staged.
    pub fn is_event_added<T: TypedEvent>(&self) -> bool {
        self.events.iter().any(|e| e.event_type() == T::EVENT_TYPE)
    }

    /// Returns true if an event with the given routing key is staged.
    pub fn has_event_type(&self, event_type: &str) -> bool {
        self.events.iter().any(|e| e.event_type() == event_type)
    }

    /// Staged events, oldest first.
    pub fn events(&self) -> &[E] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Empties the buffer. Idempotent.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Drains every staged event, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}

impl<E: DomainEvent + PartialEq> EventBuffer<E> {
    /// Returns true if an event equal by value to `event` is staged.
    pub fn contains_event(&self, event: &E) -> bool {
        self.events.iter().any(|e| e == event)
    }
}

impl<E: DomainEvent> Default for EventBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity, staged events and persistence marker shared by aggregate roots.
///
/// The id is fixed at construction; there is no setter.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCore<Id, E> {
    id: Id,
    events: EventBuffer<E>,
    persisted: bool,
}

impl<Id, E> AggregateCore<Id, E>
where
    Id: Copy + fmt::Display,
    E: DomainEvent,
{
    /// Creates the core of a brand-new aggregate.
    ///
    /// Opens the initialization guard, runs `init` against the aggregate
    /// under construction (events it stages without forcing are dropped),
    /// force-stages the creation event built by `created`, then closes the
    /// guard.
    pub fn create<A, Err>(
        id: Id,
        build: impl FnOnce(Self) -> A,
        init: impl FnOnce(&mut A) -> Result<(), Err>,
        created: impl FnOnce(&A) -> E,
    ) -> Result<A, Err>
    where
        A: AggregateRoot<Id = Id, Event = E>,
    {
        let core = Self {
            id,
            events: EventBuffer::new(),
            persisted: false,
        };
        let mut aggregate = build(core);

        aggregate.core_mut().events.begin_init();
        let outcome = init(&mut aggregate);
        if outcome.is_ok() {
            let event = created(&aggregate);
            aggregate.core_mut().events.add_event_forced(event);
        }
        aggregate.core_mut().events.end_init();

        outcome.map(|()| aggregate)
    }

    /// Rebuilds the core of an aggregate loaded from storage.
    ///
    /// No events are staged and the aggregate counts as persisted.
    pub fn reconstitute(id: Id) -> Self {
        Self {
            id,
            events: EventBuffer::new(),
            persisted: true,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn events(&self) -> &EventBuffer<E> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBuffer<E> {
        &mut self.events
    }

    /// Stages an event. Inside `create` the creation event stands for the
    /// whole initial state, so events recorded by the init step are dropped.
    pub fn record(&mut self, event: E) {
        if !self.events.is_initializing() {
            self.events.add_event_forced(event);
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn mark_persisted(&mut self) {
        self.persisted = true;
    }
}

/// An aggregate root built on `AggregateCore`.
///
/// Implementors only wire up the core accessors and name their creation event;
/// the event-buffer queries come for free.
pub trait AggregateRoot {
    type Id: Copy + fmt::Display;
    type Event: DomainEvent;
    /// Event kind staged by `AggregateCore::create`.
    type Created: TypedEvent;

    fn core(&self) -> &AggregateCore<Self::Id, Self::Event>;

    fn core_mut(&mut self) -> &mut AggregateCore<Self::Id, Self::Event>;

    fn id(&self) -> Self::Id {
        self.core().id()
    }

    /// True while the creation event is still staged.
    ///
    /// Becomes false as soon as the buffer is cleared, even without a save.
    /// Use `is_persisted` when the durable new-vs-loaded answer is needed.
    fn is_new(&self) -> bool {
        self.core().events().is_event_added::<Self::Created>()
    }

    /// True once the aggregate was loaded from, or committed to, storage.
    fn is_persisted(&self) -> bool {
        self.core().is_persisted()
    }

    fn mark_persisted(&mut self) {
        self.core_mut().mark_persisted();
    }

    fn is_initializing(&self) -> bool {
        self.core().events().is_initializing()
    }

    /// Snapshot of the staged events, oldest first.
    fn uncommitted_events(&self) -> &[Self::Event] {
        self.core().events().events()
    }

    fn is_event_added<T: TypedEvent>(&self) -> bool {
        self.core().events().is_event_added::<T>()
    }

    fn clear_domain_events(&mut self) {
        self.core_mut().events_mut().clear();
    }

    fn take_events(&mut self) -> Vec<Self::Event> {
        self.core_mut().events_mut().take()
    }
}
