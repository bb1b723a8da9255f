// src/calendar/google.rs

use google_calendar3::api::{Event, Scope};
use google_calendar3::hyper_rustls::HttpsConnector;
use google_calendar3::yup_oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod};
use google_calendar3::CalendarHub;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, info};

use crate::calendar::auth::{NonInteractiveDelegate, ensure_token_cached, read_client_secret};
use crate::calendar::{CalendarEvent, CalendarGateway, GatewayFuture, PollWindow};
use crate::config::{CALENDAR_SCOPE, Settings};
use crate::errors::{GcalcronError, Result};
use crate::types::ListOrder;

/// Calendar Gateway backed by the Google Calendar v3 API.
pub struct GoogleCalendarGateway {
    hub: CalendarHub<HttpsConnector<HttpConnector>>,
}

impl GoogleCalendarGateway {
    /// Gateway factory: authenticate with the stored credentials and return a
    /// ready handle.
    ///
    /// An access token is fetched eagerly so that missing or revoked
    /// credentials abort startup instead of failing the first tick.
    pub async fn connect(settings: &Settings) -> Result<Self> {
        ensure_token_cached(settings.token_path())?;
        let secret = read_client_secret(settings.credentials_path()).await?;

        let auth = InstalledFlowAuthenticator::builder(
            secret,
            InstalledFlowReturnMethod::Interactive,
        )
        .persist_tokens_to_disk(settings.token_path())
        .flow_delegate(Box::new(NonInteractiveDelegate))
        .build()
        .await
        .map_err(|e| GcalcronError::AuthError {
            message: "failed to build authenticator".to_string(),
            source: Some(Box::new(e)),
        })?;

        auth.token(&[CALENDAR_SCOPE])
            .await
            .map_err(|e| GcalcronError::AuthError {
                message: format!(
                    "stored token at {:?} is not usable",
                    settings.token_path()
                ),
                source: Some(Box::new(e)),
            })?;

        let connector = google_calendar3::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| GcalcronError::AuthError {
                message: "failed to load native TLS roots".to_string(),
                source: Some(Box::new(e)),
            })?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);
        let hub = CalendarHub::new(client, auth);

        info!(calendar_id = %settings.calendar_id(), "connected to Google Calendar");
        Ok(Self { hub })
    }

    async fn list_all_pages(
        &self,
        window: &PollWindow,
        calendar_id: &str,
        order: ListOrder,
    ) -> Result<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut call = self
                .hub
                .events()
                .list(calendar_id)
                .time_min(window.start)
                .time_max(window.end)
                .single_events(true)
                .order_by(order.as_api_str())
                .add_scope(Scope::Full);
            if let Some(ref token) = page_token {
                call = call.page_token(token);
            }

            let (_, page) = call.doit().await.map_err(|e| GcalcronError::FetchError {
                calendar_id: calendar_id.to_string(),
                source: Box::new(e),
            })?;

            events.extend(page.items.unwrap_or_default().into_iter().filter_map(to_calendar_event));

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    debug!(calendar_id, fetched = events.len(), "following next page");
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(events)
    }

    async fn patch_summary(&self, calendar_id: &str, event_id: &str, new_title: &str) -> Result<()> {
        let patch = Event {
            summary: Some(new_title.to_string()),
            ..Default::default()
        };

        self.hub
            .events()
            .patch(patch, calendar_id, event_id)
            .add_scope(Scope::Full)
            .doit()
            .await
            .map_err(|e| GcalcronError::PatchError {
                event_id: event_id.to_string(),
                source: Box::new(e),
            })?;

        Ok(())
    }
}

impl CalendarGateway for GoogleCalendarGateway {
    fn list_events<'a>(
        &'a self,
        window: &'a PollWindow,
        calendar_id: &'a str,
        order: ListOrder,
    ) -> GatewayFuture<'a, Vec<CalendarEvent>> {
        Box::pin(self.list_all_pages(window, calendar_id, order))
    }

    fn patch_title<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        new_title: &'a str,
    ) -> GatewayFuture<'a, ()> {
        Box::pin(self.patch_summary(calendar_id, event_id, new_title))
    }
}

/// Convert an API event; events without an id cannot be patched and are
/// dropped.
fn to_calendar_event(event: Event) -> Option<CalendarEvent> {
    let id = event.id?;
    Some(CalendarEvent {
        id,
        title: event.summary.unwrap_or_default(),
        body: event.description,
        start: event.start.and_then(|s| s.date_time),
        end: event.end.and_then(|e| e.date_time),
    })
}
