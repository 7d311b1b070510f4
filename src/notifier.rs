use crate::api::client::{Delivery, WebhookClient};
use crate::api::events::{
    AppointmentBookedData, AppointmentData, AppointmentRescheduledData, BusinessConfigUpdatedData,
    CallCompletedData, CallMissedData, ClientCreatedData, ClientUpdatedData, DailyMetricsData,
    EventKind, FollowUpTriggeredData, IntegrationConfiguredData, SystemTestData, WebhookEvent,
};
use crate::api::models::{
    Appointment, BusinessConfig, Call, Client, ClientChanges, DailyMetrics, FollowUp,
    IntegrationSettings,
};
use crate::config::{ConfigResolver, Environment, TenantConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_TENANT: &str = "default";

/// Everything an [`EventNotifier`] needs, resolved once up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifierSettings {
    pub webhook_url: String,
    pub tenant_slug: String,
    pub user_id: Option<String>,
}

impl NotifierSettings {
    pub fn resolve(env: &Environment, config: &TenantConfig) -> Self {
        Self {
            webhook_url: env.webhook_url().to_string(),
            tenant_slug: config.tenant_slug.clone(),
            user_id: None,
        }
    }

    pub fn from_resolver(resolver: &ConfigResolver) -> Self {
        Self::resolve(resolver.environment(), &resolver.load())
    }
}

/// Turns dashboard occurrences into webhook envelopes and posts them.
///
/// Cheap to clone; clones share the HTTP connection pool. Every send stamps
/// the envelope with the time of the call, not of the occurrence it reports.
#[derive(Debug, Clone)]
pub struct EventNotifier {
    client: WebhookClient,
    tenant_slug: String,
    user_id: Option<String>,
}

impl EventNotifier {
    pub fn new(settings: NotifierSettings) -> Self {
        let client = WebhookClient::new(settings.webhook_url.clone());
        Self::with_client(client, settings)
    }

    pub fn with_client(client: WebhookClient, settings: NotifierSettings) -> Self {
        let tenant_slug = if settings.tenant_slug.is_empty() {
            DEFAULT_TENANT.to_string()
        } else {
            settings.tenant_slug
        };
        Self {
            client,
            tenant_slug,
            user_id: settings.user_id,
        }
    }

    pub fn tenant_slug(&self) -> &str {
        &self.tenant_slug
    }

    pub fn webhook_url(&self) -> &str {
        self.client.url()
    }

    fn envelope<T: Serialize>(
        &self,
        kind: EventKind,
        data: T,
        at: DateTime<Utc>,
    ) -> WebhookEvent<T> {
        WebhookEvent::new(kind, self.tenant_slug.as_str(), data, at)
            .with_user_id(self.user_id.clone())
    }

    async fn dispatch<T: Serialize>(&self, kind: EventKind, data: T) -> Delivery {
        let event = self.envelope(kind, data, Utc::now());
        self.client.post(&event).await
    }

    /// The reported date is the UTC day of the envelope timestamp.
    fn daily_metrics_event(
        &self,
        metrics: &DailyMetrics,
        at: DateTime<Utc>,
    ) -> WebhookEvent<DailyMetricsData> {
        let data = DailyMetricsData::new(metrics, at.date_naive());
        self.envelope(EventKind::DailyMetrics, data, at)
    }

    pub async fn send_call_completed(&self, call: &Call) -> Delivery {
        self.dispatch(EventKind::CallCompleted, CallCompletedData::new(call))
            .await
    }

    pub async fn send_call_missed(&self, call: &Call) -> Delivery {
        self.dispatch(EventKind::CallMissed, CallMissedData::new(call))
            .await
    }

    pub async fn send_appointment_booked(&self, appointment: &Appointment) -> Delivery {
        self.dispatch(
            EventKind::AppointmentBooked,
            AppointmentBookedData::new(appointment),
        )
        .await
    }

    pub async fn send_appointment_confirmed(&self, appointment: &Appointment) -> Delivery {
        self.dispatch(
            EventKind::AppointmentConfirmed,
            AppointmentData::new(appointment),
        )
        .await
    }

    pub async fn send_appointment_rescheduled(
        &self,
        appointment: &Appointment,
        old_date_time: &str,
    ) -> Delivery {
        self.dispatch(
            EventKind::AppointmentRescheduled,
            AppointmentRescheduledData::new(appointment, old_date_time),
        )
        .await
    }

    pub async fn send_client_created(&self, client: &Client) -> Delivery {
        self.dispatch(EventKind::ClientCreated, ClientCreatedData::new(client))
            .await
    }

    pub async fn send_client_updated(&self, client: &Client, changes: &ClientChanges) -> Delivery {
        self.dispatch(
            EventKind::ClientUpdated,
            ClientUpdatedData { client, changes },
        )
        .await
    }

    pub async fn send_follow_up_triggered(&self, follow_up: &FollowUp) -> Delivery {
        self.dispatch(
            EventKind::FollowUpTriggered,
            FollowUpTriggeredData::new(follow_up),
        )
        .await
    }

    pub async fn send_daily_metrics(&self, metrics: &DailyMetrics) -> Delivery {
        let event = self.daily_metrics_event(metrics, Utc::now());
        self.client.post(&event).await
    }

    /// Reports whether secrets are set, never their values.
    pub async fn send_integration_configured(
        &self,
        service: &str,
        settings: &IntegrationSettings,
    ) -> Delivery {
        self.dispatch(
            EventKind::IntegrationConfigured,
            IntegrationConfiguredData::new(service, settings),
        )
        .await
    }

    pub async fn send_business_config_updated(&self, config: &BusinessConfig) -> Delivery {
        self.dispatch(
            EventKind::BusinessConfigUpdated,
            BusinessConfigUpdatedData {
                business_config: config,
            },
        )
        .await
    }

    pub async fn test_connection(&self) -> Delivery {
        self.dispatch(EventKind::SystemTest, SystemTestData::default())
            .await
    }
}
