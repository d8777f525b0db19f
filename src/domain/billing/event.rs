//! Inbound gateway events and their typed payloads.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::event_kind::{PaymentEventKind, SubscriptionEventKind};
use super::webhook_errors::WebhookError;

/// Wire date format for due and payment dates.
const GATEWAY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A decoded gateway callback. Lives for one request only.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    Payment {
        kind: PaymentEventKind,
        payload: PaymentPayload,
    },
    Subscription {
        kind: SubscriptionEventKind,
        payload: SubscriptionPayload,
    },
    /// A kind this service does not know. Acknowledged, never processed.
    Unhandled { kind: String },
}

/// Payload objects stay untyped until the kind says which one is used.
#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    payment: Option<Value>,
    #[serde(default)]
    subscription: Option<Value>,
}

impl WebhookEvent {
    /// Decodes a raw callback body.
    ///
    /// # Errors
    ///
    /// `WebhookError::Decode` when the body is not a JSON object, has no
    /// string `event` field, or the object a known kind reads is malformed.
    /// Unknown kinds decode to `Unhandled` without reading any payload.
    pub fn decode(raw: &[u8]) -> Result<Self, WebhookError> {
        let value: Value =
            serde_json::from_slice(raw).map_err(|e| WebhookError::Decode(e.to_string()))?;
        if !value.is_object() {
            return Err(WebhookError::Decode("body is not a JSON object".to_string()));
        }
        let envelope: Envelope =
            serde_json::from_value(value).map_err(|e| WebhookError::Decode(e.to_string()))?;

        if let Some(kind) = PaymentEventKind::parse(&envelope.event) {
            return Ok(WebhookEvent::Payment {
                kind,
                payload: typed_payload(envelope.payment)?,
            });
        }
        if let Some(kind) = SubscriptionEventKind::parse(&envelope.event) {
            return Ok(WebhookEvent::Subscription {
                kind,
                payload: typed_payload(envelope.subscription)?,
            });
        }
        Ok(WebhookEvent::Unhandled {
            kind: envelope.event,
        })
    }

    /// Wire name of the event kind.
    pub fn kind(&self) -> &str {
        match self {
            WebhookEvent::Payment { kind, .. } => kind.as_str(),
            WebhookEvent::Subscription { kind, .. } => kind.as_str(),
            WebhookEvent::Unhandled { kind } => kind,
        }
    }
}

/// Payment object of a payment event.
///
/// Every field may be absent or `null` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subscription: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer: String,
    /// Tenant key set by this platform when the charge was created.
    #[serde(deserialize_with = "null_as_default")]
    pub external_reference: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub net_value: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub billing_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub due_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub client_payment_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub invoice_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Gateway-side status. Informational only.
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

impl PaymentPayload {
    pub fn amount_cents(&self) -> i64 {
        to_cents(self.value)
    }

    pub fn net_amount_cents(&self) -> i64 {
        to_cents(self.net_value)
    }

    /// Settlement date, falling back to the date the client paid.
    pub fn paid_on(&self) -> Option<NaiveDate> {
        parse_gateway_date(&self.payment_date)
            .or_else(|| parse_gateway_date(&self.client_payment_date))
    }

    /// Due date, or `fallback` when absent or unparsable.
    pub fn due_on_or(&self, fallback: NaiveDate) -> NaiveDate {
        parse_gateway_date(&self.due_date).unwrap_or(fallback)
    }
}

/// Subscription object of a subscription event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub external_reference: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub billing_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cycle: String,
    #[serde(deserialize_with = "null_as_default")]
    pub next_due_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

impl SubscriptionPayload {
    /// Ledger view of a subscription, keyed by the subscription id.
    pub fn to_ledger_payload(&self) -> PaymentPayload {
        PaymentPayload {
            id: self.id.clone(),
            subscription: self.id.clone(),
            customer: self.customer.clone(),
            external_reference: self.external_reference.clone(),
            value: self.value,
            net_value: self.value,
            billing_type: self.billing_type.clone(),
            due_date: self.next_due_date.clone(),
            payment_date: String::new(),
            client_payment_date: String::new(),
            invoice_url: String::new(),
            description: self.description.clone(),
            status: self.status.clone(),
        }
    }
}

/// Absent or `null` objects become the default payload.
fn typed_payload<T>(object: Option<Value>) -> Result<T, WebhookError>
where
    T: DeserializeOwned + Default,
{
    match object {
        Some(value) => {
            serde_json::from_value(value).map_err(|e| WebhookError::Decode(e.to_string()))
        }
        None => Ok(T::default()),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Converts a gateway decimal amount to cents, rounding half away from zero.
pub fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Parses a `YYYY-MM-DD` gateway date. Empty or malformed input is `None`.
pub fn parse_gateway_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, GATEWAY_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ══════════════════════════════════════════════════════════════
    // Decoding
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn decodes_payment_event_with_camel_case_fields() {
        let raw = br#"{
            "event": "PAYMENT_RECEIVED",
            "payment": {
                "id": "pay_1",
                "subscription": "sub_1",
                "customer": "cus_1",
                "externalReference": "org-1",
                "value": 29.9,
                "netValue": 28.41,
                "billingType": "PIX",
                "dueDate": "2025-01-10",
                "paymentDate": "2025-01-09",
                "invoiceUrl": "https://pay.example/i/1",
                "description": "Plano Pro",
                "status": "RECEIVED"
            }
        }"#;

        let event = WebhookEvent::decode(raw).unwrap();

        let WebhookEvent::Payment { kind, payload } = event else {
            panic!("expected payment event");
        };
        assert_eq!(kind, PaymentEventKind::Received);
        assert_eq!(payload.id, "pay_1");
        assert_eq!(payload.external_reference, "org-1");
        assert_eq!(payload.amount_cents(), 2990);
        assert_eq!(payload.net_amount_cents(), 2841);
        assert_eq!(payload.billing_type, "PIX");
        assert_eq!(payload.paid_on(), NaiveDate::from_ymd_opt(2025, 1, 9));
    }

    #[test]
    fn decodes_subscription_event() {
        let raw = br#"{"event":"SUBSCRIPTION_DELETED","subscription":{"id":"sub_9","externalReference":"org-2","cycle":"MONTHLY","nextDueDate":"2025-02-01"}}"#;

        let event = WebhookEvent::decode(raw).unwrap();

        let WebhookEvent::Subscription { kind, payload } = event else {
            panic!("expected subscription event");
        };
        assert_eq!(kind, SubscriptionEventKind::Deleted);
        assert_eq!(payload.id, "sub_9");
        assert_eq!(payload.cycle, "MONTHLY");
    }

    #[test]
    fn unknown_kind_is_unhandled_not_an_error() {
        let event = WebhookEvent::decode(br#"{"event":"PAYMENT_TELEPORTED"}"#).unwrap();
        assert_eq!(
            event,
            WebhookEvent::Unhandled {
                kind: "PAYMENT_TELEPORTED".to_string()
            }
        );
        assert_eq!(event.kind(), "PAYMENT_TELEPORTED");
    }

    #[test]
    fn unknown_kind_ignores_payload_shape() {
        let bodies: [&[u8]; 3] = [
            br#"{"event":"PAYMENT_SOMETHING_NEW","payment":{"id":"pay_1","value":"29.90"}}"#,
            br#"{"event":"INVOICE_CREATED","payment":"pay_1"}"#,
            br#"{"event":"TRANSFER_DONE","subscription":[1,2],"payment":{"value":"x"}}"#,
        ];

        for raw in bodies {
            let event = WebhookEvent::decode(raw).unwrap();
            assert!(matches!(event, WebhookEvent::Unhandled { .. }), "{:?}", event);
        }
    }

    #[test]
    fn subscription_kind_ignores_malformed_payment_object() {
        let raw = br#"{"event":"SUBSCRIPTION_CREATED","subscription":{"id":"sub_1"},"payment":{"value":"x"}}"#;

        let WebhookEvent::Subscription { kind, payload } = WebhookEvent::decode(raw).unwrap() else {
            panic!("expected subscription event");
        };
        assert_eq!(kind, SubscriptionEventKind::Created);
        assert_eq!(payload.id, "sub_1");
    }

    #[test]
    fn known_kind_with_malformed_payload_is_a_decode_error() {
        let raw = br#"{"event":"PAYMENT_RECEIVED","payment":{"id":"pay_1","value":"29.90"}}"#;
        assert!(matches!(
            WebhookEvent::decode(raw),
            Err(WebhookError::Decode(_))
        ));
    }

    #[test]
    fn missing_payload_object_decodes_to_empty_payload() {
        let event = WebhookEvent::decode(br#"{"event":"PAYMENT_OVERDUE"}"#).unwrap();
        assert_eq!(
            event,
            WebhookEvent::Payment {
                kind: PaymentEventKind::Overdue,
                payload: PaymentPayload::default()
            }
        );
    }

    #[test]
    fn null_fields_decode_to_defaults() {
        let raw = br#"{"event":"PAYMENT_CREATED","payment":{"id":"pay_3","externalReference":null,"value":null,"paymentDate":null}}"#;

        let WebhookEvent::Payment { payload, .. } = WebhookEvent::decode(raw).unwrap() else {
            panic!("expected payment event");
        };
        assert_eq!(payload.id, "pay_3");
        assert_eq!(payload.external_reference, "");
        assert_eq!(payload.value, 0.0);
        assert_eq!(payload.paid_on(), None);
    }

    #[test]
    fn null_payment_object_decodes_to_empty_payload() {
        let raw = br#"{"event":"PAYMENT_CREATED","payment":null}"#;
        let WebhookEvent::Payment { payload, .. } = WebhookEvent::decode(raw).unwrap() else {
            panic!("expected payment event");
        };
        assert_eq!(payload, PaymentPayload::default());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let result = WebhookEvent::decode(b"{\"event\": ");
        assert!(matches!(result, Err(WebhookError::Decode(_))));
    }

    #[test]
    fn non_object_body_is_a_decode_error() {
        let result = WebhookEvent::decode(br#"["PAYMENT_RECEIVED"]"#);
        assert!(matches!(result, Err(WebhookError::Decode(_))));
    }

    #[test]
    fn missing_event_field_is_a_decode_error() {
        let result = WebhookEvent::decode(br#"{"payment":{"id":"pay_1"}}"#);
        assert!(matches!(result, Err(WebhookError::Decode(_))));
    }

    #[test]
    fn non_string_event_field_is_a_decode_error() {
        let result = WebhookEvent::decode(br#"{"event":42}"#);
        assert!(matches!(result, Err(WebhookError::Decode(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Payload Helpers
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn paid_on_falls_back_to_client_payment_date() {
        let payload = PaymentPayload {
            payment_date: String::new(),
            client_payment_date: "2025-03-02".to_string(),
            ..Default::default()
        };
        assert_eq!(payload.paid_on(), NaiveDate::from_ymd_opt(2025, 3, 2));
    }

    #[test]
    fn due_on_uses_fallback_when_unparsable() {
        let fallback = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        let payload = PaymentPayload {
            due_date: "05/05/2025".to_string(),
            ..Default::default()
        };
        assert_eq!(payload.due_on_or(fallback), fallback);
    }

    #[test]
    fn subscription_ledger_view_is_keyed_by_subscription_id() {
        let sub = SubscriptionPayload {
            id: "sub_1".to_string(),
            customer: "cus_1".to_string(),
            external_reference: "org-1".to_string(),
            value: 49.9,
            next_due_date: "2025-02-01".to_string(),
            ..Default::default()
        };

        let payload = sub.to_ledger_payload();

        assert_eq!(payload.id, "sub_1");
        assert_eq!(payload.subscription, "sub_1");
        assert_eq!(payload.external_reference, "org-1");
        assert_eq!(payload.amount_cents(), 4990);
        assert_eq!(payload.due_date, "2025-02-01");
        assert_eq!(payload.paid_on(), None);
    }

    #[test]
    fn to_cents_rounds_half_away_from_zero() {
        assert_eq!(to_cents(0.005), 1);
        assert_eq!(to_cents(-0.005), -1);
        assert_eq!(to_cents(29.9), 2990);
        assert_eq!(to_cents(0.0), 0);
    }

    #[test]
    fn parse_gateway_date_rejects_other_formats() {
        assert_eq!(parse_gateway_date(""), None);
        assert_eq!(parse_gateway_date("2025-13-01"), None);
        assert_eq!(parse_gateway_date("2025-01-10T00:00:00Z"), None);
        assert_eq!(
            parse_gateway_date(" 2025-01-10 "),
            NaiveDate::from_ymd_opt(2025, 1, 10)
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Properties
    // ══════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn whole_cent_amounts_convert_exactly(cents in -1_000_000_000i64..1_000_000_000i64) {
            let value = cents as f64 / 100.0;
            prop_assert_eq!(to_cents(value), cents);
        }

        #[test]
        fn formatted_dates_parse_back(days in 0i64..40_000) {
            let base = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            let date = base + chrono::Duration::days(days);
            let raw = date.format("%Y-%m-%d").to_string();
            prop_assert_eq!(parse_gateway_date(&raw), Some(date));
        }

        #[test]
        fn arbitrary_date_strings_never_panic(raw in ".*") {
            let _ = parse_gateway_date(&raw);
        }

        #[test]
        fn arbitrary_bodies_never_panic(raw in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = WebhookEvent::decode(&raw);
        }
    }
}
