use crate::domain::models::event::{Event, EventPatch, RegistrationOutcome};
use crate::domain::ports::EventRepository;
use crate::domain::services::notifier::Notifier;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Enforces the event lifecycle: ownership checks, the Active -> Canceled
/// state machine, and the registration invariants (capacity, no duplicates,
/// no mutation after cancellation).
pub struct EventService {
    events: Arc<dyn EventRepository>,
    notifier: Arc<Notifier>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, notifier: Arc<Notifier>) -> Self {
        Self { events, notifier }
    }

    pub async fn create_event(&self, event: Event) -> Result<Event, AppError> {
        let created = self.events.create(&event).await?;
        info!("Event created: {} by {}", created.id, created.creator_id);
        Ok(created)
    }

    pub async fn update_event(
        &self,
        caller_id: &str,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<Event, AppError> {
        let mut event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if event.creator_id != caller_id {
            return Err(AppError::Forbidden("Only the event creator may update this event".into()));
        }
        if event.is_canceled {
            return Err(AppError::EventCanceled);
        }

        if let Some(val) = patch.title { event.title = val; }
        if let Some(val) = patch.description { event.description = val; }
        if let Some(val) = patch.date { event.date = val; }
        if let Some(val) = patch.capacity { event.capacity = val; }
        if let Some(val) = patch.price { event.price = val; }

        // The store applies the update only while the new capacity still
        // covers every registered attendee.
        let updated = self.events.update(&event).await?.ok_or(AppError::Conflict(
            "Capacity cannot be lowered below the current attendee count".into(),
        ))?;
        self.notifier.broadcast_event_update(&updated);

        Ok(updated)
    }

    pub async fn register(&self, user_id: &str, event_id: &str) -> Result<(), AppError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if event.is_canceled {
            return Err(AppError::EventCanceled);
        }

        match self.events.register_attendee(event_id, user_id, Utc::now()).await? {
            RegistrationOutcome::Registered => {
                info!("User {} registered for event {}", user_id, event_id);
                Ok(())
            }
            RegistrationOutcome::AlreadyRegistered => Err(AppError::AlreadyRegistered),
            RegistrationOutcome::SoldOut => Err(AppError::SoldOut),
            RegistrationOutcome::Canceled => Err(AppError::EventCanceled),
        }
    }

    pub async fn cancel_registration(&self, user_id: &str, event_id: &str) -> Result<(), AppError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if event.is_canceled {
            return Err(AppError::EventCanceled);
        }

        if !self.events.remove_attendee(event_id, user_id).await? {
            return Err(AppError::NotRegistered);
        }

        info!("User {} unregistered from event {}", user_id, event_id);
        Ok(())
    }

    pub async fn cancel_event(&self, caller_id: &str, event_id: &str) -> Result<(), AppError> {
        let mut event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        if event.creator_id != caller_id {
            return Err(AppError::Forbidden("Only the event creator may cancel this event".into()));
        }

        // One-way transition; a repeated cancel is a no-op without a second fan-out.
        if event.is_canceled {
            return Ok(());
        }

        self.events.mark_canceled(event_id).await?;

        // Recipients are read after the flip: a registration racing the
        // cancellation either lost to the store guard or is included here.
        let recipients = self.events.attendee_emails(event_id).await?;

        info!(
            "Event {} canceled by {}, notifying {} attendees",
            event_id,
            caller_id,
            recipients.len()
        );

        self.notifier.notify_cancellation(&event.title, recipients);

        event.is_canceled = true;
        self.notifier.broadcast_event_update(&event);

        Ok(())
    }

    pub async fn attendees(&self, event_id: &str) -> Result<Vec<String>, AppError> {
        self.events.attendee_ids(event_id).await
    }
}
