//! Command handling infrastructure.

use std::marker::PhantomData;

use common::AggregateId;
use event_store::{AppendOptions, EventEnvelope, EventStore, Version};

use crate::aggregate::{Aggregate, DomainEvent};
use crate::error::DomainError;
use crate::log::EventLog;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate> {
    /// The aggregate value after the command.
    pub aggregate: A,

    /// The events the command generated (at most one per command).
    pub events: Vec<A::Event>,

    /// The envelopes that were persisted, ready for publication.
    pub envelopes: Vec<EventEnvelope>,

    /// The stream head version after the command.
    pub new_version: Version,
}

/// Trait for commands targeting one aggregate instance.
///
/// Commands represent an intention; the aggregate may reject them against
/// its current state.
pub trait Command: Send + Sync {
    /// The type of aggregate this command targets.
    type Aggregate: Aggregate;

    /// Returns the ID of the aggregate this command targets.
    fn aggregate_id(&self) -> AggregateId;
}

/// Executes commands against aggregates loaded from an event store.
///
/// The handler replays the stream, runs the command against the replayed
/// value, extracts the event delta the command recorded, and appends it with
/// an expected-version check so commands racing from the same snapshot
/// cannot both land.
pub struct CommandHandler<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    store: S,
    _phantom: PhantomData<A>,
}

impl<S, A> CommandHandler<S, A>
where
    S: EventStore,
    A: Aggregate,
{
    /// Creates a new command handler over the given event store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying event store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replays an aggregate from its stream.
    ///
    /// An aggregate with no events replays to its empty state.
    pub async fn load(&self, aggregate_id: AggregateId) -> Result<A, DomainError> {
        let envelopes = self.store.events_for_aggregate(aggregate_id).await?;

        let mut events = Vec::with_capacity(envelopes.len());
        for envelope in envelopes {
            let event: A::Event = serde_json::from_value(envelope.payload)?;
            events.push(event);
        }

        let log = EventLog::from_events(events)?;
        Ok(A::load_from_events(log))
    }

    /// Replays an aggregate, returning None if it has no creation event.
    pub async fn load_existing(&self, aggregate_id: AggregateId) -> Result<Option<A>, DomainError> {
        let aggregate = self.load(aggregate_id).await?;
        if aggregate.id().is_some() {
            Ok(Some(aggregate))
        } else {
            Ok(None)
        }
    }

    /// Executes a command and persists the events it produced.
    ///
    /// The command function receives the replayed aggregate and returns the
    /// new aggregate value (its log extended by the events it recorded), or
    /// a validation error.
    pub async fn execute<F>(
        &self,
        aggregate_id: AggregateId,
        command_fn: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: FnOnce(&A) -> Result<A, A::Error>,
        DomainError: From<A::Error>,
    {
        let current = self.load(aggregate_id).await?;
        let replayed = current.events().len();
        // Full-stream replay: the head version equals the event count.
        let current_version = Version::new(replayed as i64);

        let aggregate = command_fn(&current)?;

        // The produced log must start with the replayed history. A creation
        // command re-issued against an existing stream rebuilds the aggregate
        // from scratch and fails this check; reporting it as success would
        // hand back state contradicting the store.
        let prior = current.events().as_slice();
        let produced = aggregate.events().as_slice();
        if produced.len() < prior.len() || produced[..prior.len()] != *prior {
            return Err(DomainError::HistoryMismatch { aggregate_id });
        }

        let new_events: Vec<A::Event> = aggregate.events().events_from(replayed).to_vec();
        if new_events.is_empty() {
            return Ok(CommandResult {
                aggregate,
                events: vec![],
                envelopes: vec![],
                new_version: current_version,
            });
        }

        let envelopes = build_envelopes::<A>(aggregate_id, current_version, &new_events)?;

        let options = if current_version == Version::initial() {
            AppendOptions::expect_new()
        } else {
            AppendOptions::expect_version(current_version)
        };

        let new_version = self.store.append(envelopes.clone(), options).await?;

        Ok(CommandResult {
            aggregate,
            events: new_events,
            envelopes,
            new_version,
        })
    }
}

/// Builds sequentially versioned envelopes for a command's event delta.
fn build_envelopes<A: Aggregate>(
    aggregate_id: AggregateId,
    current_version: Version,
    events: &[A::Event],
) -> Result<Vec<EventEnvelope>, DomainError> {
    let mut envelopes = Vec::with_capacity(events.len());
    let mut version = current_version;

    for event in events {
        version = version.next();
        let envelope = EventEnvelope::builder()
            .aggregate_id(aggregate_id)
            .aggregate_type(A::aggregate_type())
            .event_type(event.event_type())
            .version(version)
            .payload(event)?
            .build();
        envelopes.push(envelope);
    }

    Ok(envelopes)
}
