use serde::{Deserialize, Serialize, Serializer};

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Whole amounts go out as integers (`100`, not `100.0`), matching what the
/// dashboard's own JSON encoder writes.
pub fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub fn serialize_optional_amount<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_amount(v, serializer),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Completed,
    Missed,
    Ongoing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caller {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: String,
    #[serde(rename = "type")]
    pub direction: CallDirection,
    pub caller: Caller,
    /// Display duration such as `"4:32"`.
    pub duration: String,
    pub status: CallStatus,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub client: ContactInfo,
    pub service: String,
    pub datetime: String,
    /// Minutes.
    pub duration: u32,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
    Prospect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub status: ClientStatus,
    pub tags: Vec<String>,
    pub total_appointments: u32,
    #[serde(serialize_with = "serialize_amount")]
    pub total_spent: f64,
    pub last_contact: String,
    pub notes: String,
}

/// The fields of a [`Client`] that changed. Unset fields are left out of the
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_appointments: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_amount"
    )]
    pub total_spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    Pending,
    Sent,
    Responded,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FollowUpKind {
    NoBooking,
    MissedAppointment,
    FollowUpCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: String,
    /// Client display name.
    pub client: String,
    pub phone: String,
    pub email: String,
    pub last_contact: String,
    pub hours_elapsed: u32,
    pub status: FollowUpStatus,
    #[serde(rename = "type")]
    pub kind: FollowUpKind,
    pub next_action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    pub total_calls: u32,
    pub completed_calls: u32,
    pub missed_calls: u32,
    pub total_appointments: u32,
    pub confirmed_appointments: u32,
    pub pending_appointments: u32,
    #[serde(serialize_with = "serialize_amount")]
    pub total_revenue: f64,
    pub total_conversions: u32,
    #[serde(serialize_with = "serialize_amount")]
    pub conversion_rate: f64,
}

/// Connection settings of one third-party integration. Only whether the
/// secrets are present ever leaves the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationSettings {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl IntegrationSettings {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn has_webhook_url(&self) -> bool {
        self.webhook_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessConfig {
    pub business_type: String,
    pub business_name: String,
    pub service_name: String,
    #[serde(serialize_with = "serialize_amount")]
    pub average_service_price: f64,
    pub currency: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            business_type: "general".into(),
            business_name: "Your Business".into(),
            service_name: "consultation".into(),
            average_service_price: 100.0,
            currency: "USD".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessConfigPatch {
    pub business_type: Option<String>,
    pub business_name: Option<String>,
    pub service_name: Option<String>,
    pub average_service_price: Option<f64>,
    pub currency: Option<String>,
}

impl BusinessConfig {
    /// Shallow merge: every field the patch carries replaces the current one.
    pub fn apply(&mut self, patch: BusinessConfigPatch) {
        if let Some(v) = patch.business_type {
            self.business_type = v;
        }
        if let Some(v) = patch.business_name {
            self.business_name = v;
        }
        if let Some(v) = patch.service_name {
            self.service_name = v;
        }
        if let Some(v) = patch.average_service_price {
            self.average_service_price = v;
        }
        if let Some(v) = patch.currency {
            self.currency = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_use_dashboard_spelling() {
        assert_eq!(json!(AppointmentStatus::NoShow), json!("no-show"));
        assert_eq!(json!(FollowUpKind::FollowUpCall), json!("follow-up-call"));
        assert_eq!(json!(CallDirection::Inbound), json!("inbound"));
    }

    #[test]
    fn client_changes_only_carry_set_fields() {
        let changes = ClientChanges {
            phone: Some("+15550100".into()),
            total_spent: Some(250.0),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({"phone": "+15550100", "totalSpent": 250})
        );
    }

    #[test]
    fn empty_secrets_do_not_count_as_present() {
        let settings = IntegrationSettings {
            connected: false,
            api_key: Some(String::new()),
            webhook_url: None,
        };
        assert!(!settings.has_api_key());
        assert!(!settings.has_webhook_url());
    }

    #[test]
    fn whole_amounts_serialize_without_fraction() {
        let config = BusinessConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"averageServicePrice\":100,"), "{text}");

        let config = BusinessConfig {
            average_service_price: 99.5,
            ..Default::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"averageServicePrice\":99.5,"), "{text}");

        let changes = ClientChanges {
            total_spent: Some(-0.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&changes).unwrap(), r#"{"totalSpent":0}"#);
    }

    #[test]
    fn business_patch_is_shallow() {
        let mut config = BusinessConfig::default();
        let patch: BusinessConfigPatch =
            serde_json::from_value(json!({"businessName": "Bright Smiles", "averageServicePrice": 180}))
                .unwrap();
        config.apply(patch);
        assert_eq!(config.business_name, "Bright Smiles");
        assert_eq!(config.average_service_price, 180.0);
        assert_eq!(config.service_name, "consultation");
        assert_eq!(config.currency, "USD");
    }
}
