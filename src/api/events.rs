use crate::api::models::{
    Appointment, BusinessConfig, Call, CallStatus, Client, ClientChanges, ContactInfo,
    DailyMetrics, FollowUp, FollowUpKind, IntegrationSettings, serialize_amount,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

pub const EVENT_SOURCE: &str = "dashboard";
pub const EVENT_VERSION: &str = "1.0";
pub const TEST_MESSAGE: &str = "Test webhook connection from AI Receptionist Dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    #[serde(rename = "call.completed")]
    CallCompleted,
    #[serde(rename = "call.missed")]
    CallMissed,
    #[serde(rename = "appointment.booked")]
    AppointmentBooked,
    #[serde(rename = "appointment.confirmed")]
    AppointmentConfirmed,
    #[serde(rename = "appointment.rescheduled")]
    AppointmentRescheduled,
    #[serde(rename = "client.created")]
    ClientCreated,
    #[serde(rename = "client.updated")]
    ClientUpdated,
    #[serde(rename = "followup.triggered")]
    FollowUpTriggered,
    #[serde(rename = "analytics.daily_metrics")]
    DailyMetrics,
    #[serde(rename = "integration.configured")]
    IntegrationConfigured,
    #[serde(rename = "business.config_updated")]
    BusinessConfigUpdated,
    #[serde(rename = "system.test")]
    SystemTest,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::CallCompleted => "call.completed",
            EventKind::CallMissed => "call.missed",
            EventKind::AppointmentBooked => "appointment.booked",
            EventKind::AppointmentConfirmed => "appointment.confirmed",
            EventKind::AppointmentRescheduled => "appointment.rescheduled",
            EventKind::ClientCreated => "client.created",
            EventKind::ClientUpdated => "client.updated",
            EventKind::FollowUpTriggered => "followup.triggered",
            EventKind::DailyMetrics => "analytics.daily_metrics",
            EventKind::IntegrationConfigured => "integration.configured",
            EventKind::BusinessConfigUpdated => "business.config_updated",
            EventKind::SystemTest => "system.test",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub source: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            source: EVENT_SOURCE,
            version: EVENT_VERSION,
            user_id: None,
        }
    }
}

/// The envelope every webhook body is wrapped in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent<T> {
    pub event: EventKind,
    pub timestamp: String,
    pub tenant_slug: String,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> WebhookEvent<T> {
    pub fn new(
        kind: EventKind,
        tenant_slug: impl Into<String>,
        data: T,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            event: kind,
            timestamp: iso_timestamp(at),
            tenant_slug: tenant_slug.into(),
            data,
            metadata: Metadata::default(),
        }
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.metadata.user_id = user_id;
        self
    }
}

/// Millisecond precision with a `Z` suffix, e.g. `2025-01-16T10:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize)]
pub struct CallMetrics<'a> {
    pub duration: &'a str,
    pub successful: bool,
}

#[derive(Debug, Serialize)]
pub struct CallCompletedData<'a> {
    pub call: &'a Call,
    pub metrics: CallMetrics<'a>,
}

impl<'a> CallCompletedData<'a> {
    pub fn new(call: &'a Call) -> Self {
        Self {
            call,
            metrics: CallMetrics {
                duration: &call.duration,
                successful: call.status == CallStatus::Completed,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMissedData<'a> {
    pub call: &'a Call,
    pub follow_up_required: bool,
}

impl<'a> CallMissedData<'a> {
    pub fn new(call: &'a Call) -> Self {
        Self {
            call,
            follow_up_required: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingDetails<'a> {
    pub service: &'a str,
    pub datetime: &'a str,
    pub duration: u32,
}

#[derive(Debug, Serialize)]
pub struct AppointmentBookedData<'a> {
    pub appointment: &'a Appointment,
    pub client: &'a ContactInfo,
    pub booking: BookingDetails<'a>,
}

impl<'a> AppointmentBookedData<'a> {
    pub fn new(appointment: &'a Appointment) -> Self {
        Self {
            appointment,
            client: &appointment.client,
            booking: BookingDetails {
                service: &appointment.service,
                datetime: &appointment.datetime,
                duration: appointment.duration,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppointmentData<'a> {
    pub appointment: &'a Appointment,
    pub client: &'a ContactInfo,
}

impl<'a> AppointmentData<'a> {
    pub fn new(appointment: &'a Appointment) -> Self {
        Self {
            appointment,
            client: &appointment.client,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeChange<'a> {
    pub old_date_time: &'a str,
    pub new_date_time: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AppointmentRescheduledData<'a> {
    pub appointment: &'a Appointment,
    pub client: &'a ContactInfo,
    pub changes: DateTimeChange<'a>,
}

impl<'a> AppointmentRescheduledData<'a> {
    pub fn new(appointment: &'a Appointment, old_date_time: &'a str) -> Self {
        Self {
            appointment,
            client: &appointment.client,
            changes: DateTimeChange {
                old_date_time,
                new_date_time: &appointment.datetime,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientCreatedData<'a> {
    pub client: &'a Client,
    pub source: &'static str,
}

impl<'a> ClientCreatedData<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            source: "manual_entry",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientUpdatedData<'a> {
    pub client: &'a Client,
    pub changes: &'a ClientChanges,
}

#[derive(Debug, Serialize)]
pub struct FollowUpContact<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpTrigger {
    #[serde(rename = "type")]
    pub kind: FollowUpKind,
    pub hours_elapsed: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpTriggeredData<'a> {
    pub follow_up: &'a FollowUp,
    pub client: FollowUpContact<'a>,
    pub trigger: FollowUpTrigger,
}

impl<'a> FollowUpTriggeredData<'a> {
    pub fn new(follow_up: &'a FollowUp) -> Self {
        Self {
            follow_up,
            client: FollowUpContact {
                name: &follow_up.client,
                phone: &follow_up.phone,
                email: &follow_up.email,
            },
            trigger: FollowUpTrigger {
                kind: follow_up.kind,
                hours_elapsed: follow_up.hours_elapsed,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CallCounts {
    pub total: u32,
    pub completed: u32,
    pub missed: u32,
}

#[derive(Debug, Serialize)]
pub struct AppointmentCounts {
    pub total: u32,
    pub confirmed: u32,
    pub pending: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    #[serde(serialize_with = "serialize_amount")]
    pub total: f64,
    pub conversions: u32,
    #[serde(serialize_with = "serialize_amount")]
    pub conversion_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct MetricsBreakdown {
    pub calls: CallCounts,
    pub appointments: AppointmentCounts,
    pub revenue: RevenueSummary,
}

#[derive(Debug, Serialize)]
pub struct DailyMetricsData {
    pub date: String,
    pub metrics: MetricsBreakdown,
}

impl DailyMetricsData {
    pub fn new(metrics: &DailyMetrics, date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            metrics: MetricsBreakdown {
                calls: CallCounts {
                    total: metrics.total_calls,
                    completed: metrics.completed_calls,
                    missed: metrics.missed_calls,
                },
                appointments: AppointmentCounts {
                    total: metrics.total_appointments,
                    confirmed: metrics.confirmed_appointments,
                    pending: metrics.pending_appointments,
                },
                revenue: RevenueSummary {
                    total: metrics.total_revenue,
                    conversions: metrics.total_conversions,
                    conversion_rate: metrics.conversion_rate,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSummary {
    pub connected: bool,
    pub has_api_key: bool,
    pub has_webhook_url: bool,
}

#[derive(Debug, Serialize)]
pub struct IntegrationConfiguredData<'a> {
    pub service: &'a str,
    pub configuration: IntegrationSummary,
}

impl<'a> IntegrationConfiguredData<'a> {
    pub fn new(service: &'a str, settings: &IntegrationSettings) -> Self {
        Self {
            service,
            configuration: IntegrationSummary {
                connected: settings.connected,
                has_api_key: settings.has_api_key(),
                has_webhook_url: settings.has_webhook_url(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessConfigUpdatedData<'a> {
    pub business_config: &'a BusinessConfig,
}

#[derive(Debug, Serialize)]
pub struct SystemTestData {
    pub message: &'static str,
    pub status: &'static str,
}

impl Default for SystemTestData {
    fn default() -> Self {
        Self {
            message: TEST_MESSAGE,
            status: "healthy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{
        AppointmentStatus, CallDirection, Caller, ClientStatus, FollowUpStatus,
    };
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn keys(value: &Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    fn call(status: CallStatus) -> Call {
        Call {
            id: "call-1".into(),
            direction: CallDirection::Inbound,
            caller: Caller {
                name: "Dana Reyes".into(),
                phone: "+15550101".into(),
            },
            duration: "4:32".into(),
            status,
            timestamp: "2025-01-15T09:12:00Z".into(),
            transcript: None,
            recording: None,
        }
    }

    fn appointment() -> Appointment {
        Appointment {
            id: "appt-7".into(),
            client: ContactInfo {
                name: "Dana Reyes".into(),
                phone: "+15550101".into(),
                email: "dana@example.com".into(),
            },
            service: "Consultation".into(),
            datetime: "2025-01-17T10:00:00Z".into(),
            duration: 60,
            status: AppointmentStatus::Scheduled,
            notes: None,
        }
    }

    #[test]
    fn envelope_has_fixed_metadata_and_millisecond_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 1, 16, 10, 0, 0).unwrap();
        let event = WebhookEvent::new(EventKind::SystemTest, "salon", SystemTestData::default(), at);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "system.test",
                "timestamp": "2025-01-16T10:00:00.000Z",
                "tenantSlug": "salon",
                "data": {"message": TEST_MESSAGE, "status": "healthy"},
                "metadata": {"source": "dashboard", "version": "1.0"}
            })
        );
    }

    #[test]
    fn user_id_is_stamped_when_given() {
        let event = WebhookEvent::new(EventKind::SystemTest, "t", SystemTestData::default(), Utc::now())
            .with_user_id(Some("admin-1".into()));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["metadata"]["userId"], "admin-1");
    }

    #[test]
    fn kind_serializes_as_its_string() {
        for kind in [
            EventKind::CallCompleted,
            EventKind::AppointmentRescheduled,
            EventKind::FollowUpTriggered,
            EventKind::DailyMetrics,
            EventKind::BusinessConfigUpdated,
        ] {
            assert_eq!(json!(kind), json!(kind.as_str()));
        }
    }

    #[test]
    fn call_completed_reports_success_from_status() {
        let done = call(CallStatus::Completed);
        let value = serde_json::to_value(CallCompletedData::new(&done)).unwrap();
        assert_eq!(keys(&value), ["call", "metrics"]);
        assert_eq!(value["metrics"], json!({"duration": "4:32", "successful": true}));
        assert_eq!(value["call"]["type"], "inbound");

        let ongoing = call(CallStatus::Ongoing);
        let value = serde_json::to_value(CallCompletedData::new(&ongoing)).unwrap();
        assert_eq!(value["metrics"]["successful"], false);
    }

    #[test]
    fn call_missed_requires_follow_up() {
        let missed = call(CallStatus::Missed);
        let value = serde_json::to_value(CallMissedData::new(&missed)).unwrap();
        assert_eq!(keys(&value), ["call", "followUpRequired"]);
        assert_eq!(value["followUpRequired"], true);
    }

    #[test]
    fn appointment_booked_repeats_booking_details() {
        let appt = appointment();
        let value = serde_json::to_value(AppointmentBookedData::new(&appt)).unwrap();
        assert_eq!(keys(&value), ["appointment", "booking", "client"]);
        assert_eq!(
            value["booking"],
            json!({"service": "Consultation", "datetime": "2025-01-17T10:00:00Z", "duration": 60})
        );
        assert_eq!(value["client"]["email"], "dana@example.com");
    }

    #[test]
    fn appointment_rescheduled_records_both_times() {
        let appt = appointment();
        let value =
            serde_json::to_value(AppointmentRescheduledData::new(&appt, "2025-01-16T10:00:00Z"))
                .unwrap();
        assert_eq!(keys(&value), ["appointment", "changes", "client"]);
        assert_eq!(
            value["changes"],
            json!({"oldDateTime": "2025-01-16T10:00:00Z", "newDateTime": "2025-01-17T10:00:00Z"})
        );
    }

    #[test]
    fn client_payloads() {
        let client = Client {
            id: "c-1".into(),
            name: "Dana Reyes".into(),
            phone: "+15550101".into(),
            email: "dana@example.com".into(),
            status: ClientStatus::Prospect,
            tags: vec!["vip".into()],
            total_appointments: 2,
            total_spent: 320.0,
            last_contact: "2025-01-10".into(),
            notes: String::new(),
        };
        let created = serde_json::to_value(ClientCreatedData::new(&client)).unwrap();
        assert_eq!(keys(&created), ["client", "source"]);
        assert_eq!(created["source"], "manual_entry");
        assert_eq!(created["client"]["totalSpent"], json!(320));

        let changes = ClientChanges {
            status: Some(ClientStatus::Active),
            ..Default::default()
        };
        let updated = serde_json::to_value(ClientUpdatedData {
            client: &client,
            changes: &changes,
        })
        .unwrap();
        assert_eq!(keys(&updated), ["changes", "client"]);
        assert_eq!(updated["changes"], json!({"status": "active"}));
    }

    #[test]
    fn follow_up_lifts_contact_and_trigger() {
        let follow_up = FollowUp {
            id: "f-1".into(),
            client: "Sam Lee".into(),
            phone: "+15550123".into(),
            email: "sam@example.com".into(),
            last_contact: "2025-01-14T16:00:00Z".into(),
            hours_elapsed: 26,
            status: FollowUpStatus::Pending,
            kind: FollowUpKind::NoBooking,
            next_action: "Send SMS".into(),
        };
        let value = serde_json::to_value(FollowUpTriggeredData::new(&follow_up)).unwrap();
        assert_eq!(keys(&value), ["client", "followUp", "trigger"]);
        assert_eq!(
            value["client"],
            json!({"name": "Sam Lee", "phone": "+15550123", "email": "sam@example.com"})
        );
        assert_eq!(value["trigger"], json!({"type": "no-booking", "hoursElapsed": 26}));
        assert_eq!(value["followUp"]["nextAction"], "Send SMS");
    }

    #[test]
    fn daily_metrics_are_regrouped() {
        let metrics = DailyMetrics {
            total_calls: 40,
            completed_calls: 34,
            missed_calls: 6,
            total_appointments: 12,
            confirmed_appointments: 9,
            pending_appointments: 3,
            total_revenue: 1800.0,
            total_conversions: 9,
            conversion_rate: 22.5,
        };
        let date = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();
        let value = serde_json::to_value(DailyMetricsData::new(&metrics, date)).unwrap();
        assert_eq!(
            value,
            json!({
                "date": "2025-01-16",
                "metrics": {
                    "calls": {"total": 40, "completed": 34, "missed": 6},
                    "appointments": {"total": 12, "confirmed": 9, "pending": 3},
                    "revenue": {"total": 1800, "conversions": 9, "conversionRate": 22.5}
                }
            })
        );
    }

    #[test]
    fn integration_payload_never_carries_secrets() {
        let settings = IntegrationSettings {
            connected: true,
            api_key: Some("sk_live_secret".into()),
            webhook_url: Some("https://n8n.example/hook/secret".into()),
        };
        let value = serde_json::to_value(IntegrationConfiguredData::new("stripe", &settings)).unwrap();
        assert_eq!(
            value,
            json!({
                "service": "stripe",
                "configuration": {"connected": true, "hasApiKey": true, "hasWebhookUrl": true}
            })
        );
        let text = value.to_string();
        assert!(!text.contains("sk_live_secret"));
        assert!(!text.contains("apiKey\""));
    }

    #[test]
    fn business_config_is_sent_whole() {
        let config = BusinessConfig::default();
        let value = serde_json::to_value(BusinessConfigUpdatedData {
            business_config: &config,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "businessConfig": {
                    "businessType": "general",
                    "businessName": "Your Business",
                    "serviceName": "consultation",
                    "averageServicePrice": 100,
                    "currency": "USD"
                }
            })
        );
    }
}
