//! API session client
//!
//! One `ApiSession` lives for the whole process. It owns the base URL, the
//! custom field registry, the quest tracker and the two trace slots, and is
//! the only thing that talks to the API.
//!
//! Every CRUD request runs the same fixed sequence:
//!
//! ```text
//! trace request ──► send ──► trace response ──► quest credit ──► Ok / Err
//! ```
//!
//! Credit is awarded even when the request fails.

use crate::demo::random_item;
use crate::fields::CustomFieldRegistry;
use crate::quest::QuestTracker;
use crate::transport::{HttpResponse, HttpTransport, Transport};
use quest_config::ConfigStore;
use quest_core::{
    ActionKind, CustomField, Error, FieldType, FieldValue, HttpMethod, Item, PresentationSink,
    QuestProgress, RequestTrace, ResponseTrace, Result,
};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Message used when a failed response carries no `detail`
pub const GENERIC_FAILURE: &str = "Request failed";

/// Stand-in for bodies that are not JSON
pub fn no_json_body() -> Value {
    json!({ "note": "No JSON body" })
}

/// Fields of a new item
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

impl NewItem {
    /// Base payload before custom fields are merged
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("name".to_string(), Value::from(self.name.clone()));
        if let Some(description) = self.description.as_ref().filter(|d| !d.is_empty()) {
            payload.insert("description".to_string(), Value::from(description.clone()));
        }
        payload.insert("price".to_string(), FieldValue::Number(self.price).to_json());
        payload.insert("quantity".to_string(), Value::from(self.quantity));
        payload
    }
}

/// Fields to change on an existing item; `None` means leave untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }

    /// Write the provided fields into `payload`, overriding what is there
    pub fn apply_to(&self, payload: &mut Map<String, Value>) {
        if let Some(name) = &self.name {
            payload.insert("name".to_string(), Value::from(name.clone()));
        }
        if let Some(description) = &self.description {
            payload.insert("description".to_string(), Value::from(description.clone()));
        }
        if let Some(price) = self.price {
            payload.insert("price".to_string(), FieldValue::Number(price).to_json());
        }
        if let Some(quantity) = self.quantity {
            payload.insert("quantity".to_string(), Value::from(quantity));
        }
    }
}

/// Pull the `items` array out of a list response; anything else is empty
pub fn items_from(data: &Value) -> Vec<Item> {
    data.get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().cloned().map(Item::from_value).collect())
        .unwrap_or_default()
}

/// Process-wide session context
pub struct ApiSession {
    config: RwLock<ConfigStore>,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn PresentationSink>,
    fields: RwLock<CustomFieldRegistry>,
    quests: RwLock<QuestTracker>,
    last_request: RwLock<Option<RequestTrace>>,
    last_response: RwLock<Option<ResponseTrace>>,
    request_count: AtomicU64,
}

impl ApiSession {
    pub fn new(
        config: ConfigStore,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            transport,
            sink,
            fields: RwLock::new(CustomFieldRegistry::new()),
            quests: RwLock::new(QuestTracker::new()),
            last_request: RwLock::new(None),
            last_response: RwLock::new(None),
            request_count: AtomicU64::new(0),
        }
    }

    /// Session over the real HTTP transport
    pub fn with_http(config: ConfigStore, sink: Arc<dyn PresentationSink>) -> Self {
        Self::new(config, Arc::new(HttpTransport::new()), sink)
    }

    // ============== Config ==============

    pub async fn base_url(&self) -> String {
        self.config.read().await.get().to_string()
    }

    /// Set and persist the base URL, then re-render it
    pub async fn set_base_url(&self, url: &str) -> Result<String> {
        let stored = self.config.write().await.set(url)?.to_string();
        self.sink.render_base_url(&stored);
        Ok(stored)
    }

    // ============== Custom fields ==============

    pub async fn add_field(&self, field: &str, field_type: FieldType, raw_value: &str) -> Result<()> {
        let mut fields = self.fields.write().await;
        fields.add(field, field_type, raw_value)?;
        debug!(field = field.trim(), %field_type, "custom field added");
        self.sink.render_custom_fields(fields.fields(), &fields.preview());
        Ok(())
    }

    /// Remove a field by index; out of range is a no-op
    pub async fn remove_field(&self, index: usize) -> Option<CustomField> {
        let mut fields = self.fields.write().await;
        let removed = fields.remove_at(index);
        if removed.is_some() {
            self.sink.render_custom_fields(fields.fields(), &fields.preview());
        }
        removed
    }

    pub async fn custom_fields(&self) -> Vec<CustomField> {
        self.fields.read().await.fields().to_vec()
    }

    pub async fn field_preview(&self) -> Map<String, Value> {
        self.fields.read().await.preview()
    }

    pub async fn merge_custom_fields(&self, base: &Map<String, Value>) -> Map<String, Value> {
        self.fields.read().await.merge_into(base)
    }

    // ============== Progress and traces ==============

    pub async fn quest_progress(&self) -> QuestProgress {
        self.quests.read().await.progress()
    }

    pub async fn is_quest_completed(&self, kind: ActionKind) -> bool {
        self.quests.read().await.is_completed(kind)
    }

    pub async fn last_request(&self) -> Option<RequestTrace> {
        self.last_request.read().await.clone()
    }

    pub async fn last_response(&self) -> Option<ResponseTrace> {
        self.last_response.read().await.clone()
    }

    /// CRUD requests issued so far, failed ones included
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    // ============== Requests ==============

    /// Issue one request against `base_url + path`
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
        action: ActionKind,
    ) -> Result<Value> {
        let url = format!("{}{}", self.config.read().await.get(), path);
        let request = RequestTrace {
            method,
            url,
            body: payload,
        };

        *self.last_request.write().await = Some(request.clone());
        // The response slot always belongs to the request slot
        *self.last_response.write().await = None;
        self.sink.render_request_trace(&request);
        debug!(%method, url = %request.url, "dispatching request");

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%method, url = %request.url, error = %err, "transport failure");
                self.credit(action).await;
                return Err(err);
            }
        };

        let data = decode_body(&response);
        let trace = ResponseTrace {
            status_line: response.status_line(),
            data: data.clone(),
        };
        *self.last_response.write().await = Some(trace.clone());
        self.sink.render_response_trace(&trace);

        self.credit(action).await;

        if !response.is_success() {
            let message = failure_message(&data);
            warn!(status = response.status, %message, "request failed");
            return Err(Error::Request {
                status: response.status,
                message,
            });
        }
        Ok(data)
    }

    async fn credit(&self, action: ActionKind) {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.sink.render_request_count(count);

        let progress = self.quests.write().await.record_action(action);
        if progress.is_new_credit {
            info!(quest = %action, xp = progress.xp, "quest completed");
        }
        self.sink
            .render_quest_progress(&progress, progress.is_new_credit.then_some(action));
    }

    /// `GET /items`
    pub async fn list(&self) -> Result<Value> {
        self.request(HttpMethod::Get, "/items", None, ActionKind::List).await
    }

    /// `POST /items` with custom fields merged over the item
    pub async fn create(&self, item: &NewItem) -> Result<Value> {
        let payload = self.merge_custom_fields(&item.to_payload()).await;
        self.request(
            HttpMethod::Post,
            "/items",
            Some(Value::Object(payload)),
            ActionKind::Create,
        )
        .await
    }

    /// Create a generated demo item
    pub async fn create_random(&self) -> Result<Value> {
        let item = random_item(&mut rand::thread_rng());
        self.create(&item).await
    }

    /// `PUT /items/{id}`: custom fields first, explicitly provided fields on top
    pub async fn update(&self, id: i64, patch: &ItemPatch) -> Result<Value> {
        let mut payload = self.merge_custom_fields(&Map::new()).await;
        patch.apply_to(&mut payload);
        self.request(
            HttpMethod::Put,
            &format!("/items/{id}"),
            Some(Value::Object(payload)),
            ActionKind::Update,
        )
        .await
    }

    /// `DELETE /items/{id}`
    pub async fn delete(&self, id: i64) -> Result<Value> {
        self.request(
            HttpMethod::Delete,
            &format!("/items/{id}"),
            None,
            ActionKind::Delete,
        )
        .await
    }

    /// Full item collection for the dashboard.
    ///
    /// A plain `GET /items`: no traces, no quest credit, and the status is
    /// not checked; a body without an `items` array is an empty collection.
    pub async fn fetch_collection(&self) -> Result<Vec<Item>> {
        let request = RequestTrace {
            method: HttpMethod::Get,
            url: format!("{}/items", self.config.read().await.get()),
            body: None,
        };
        let response = self.transport.send(&request).await?;
        let data: Value = serde_json::from_slice(&response.body)?;
        Ok(items_from(&data))
    }
}

fn decode_body(response: &HttpResponse) -> Value {
    match serde_json::from_slice(&response.body) {
        Ok(data) => data,
        Err(err) => {
            warn!(error = %err, "response body is not JSON");
            no_json_body()
        }
    }
}

/// `detail` from an error body, or the generic message
fn failure_message(data: &Value) -> String {
    match data.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(detail @ (Value::Array(_) | Value::Object(_) | Value::Bool(true))) => detail.to_string(),
        _ => GENERIC_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message() {
        assert_eq!(failure_message(&json!({"detail": "not found"})), "not found");
        assert_eq!(failure_message(&json!({"detail": ""})), GENERIC_FAILURE);
        assert_eq!(failure_message(&json!({"error": "x"})), GENERIC_FAILURE);
        assert_eq!(failure_message(&no_json_body()), GENERIC_FAILURE);
        assert_eq!(
            failure_message(&json!({"detail": [{"msg": "field required"}]})),
            r#"[{"msg":"field required"}]"#
        );
    }

    #[test]
    fn test_new_item_payload() {
        let item = NewItem {
            name: "Lamp".to_string(),
            description: Some(String::new()),
            price: 19.5,
            quantity: 0,
        };
        assert_eq!(
            Value::Object(item.to_payload()),
            json!({"name": "Lamp", "price": 19.5, "quantity": 0})
        );
    }

    #[test]
    fn test_patch_only_includes_provided_fields() {
        let patch = ItemPatch {
            price: Some(12.0),
            ..Default::default()
        };
        let mut payload = Map::new();
        patch.apply_to(&mut payload);
        assert_eq!(Value::Object(payload), json!({"price": 12}));
        assert!(ItemPatch::default().is_empty());
    }

    #[test]
    fn test_items_from() {
        let data = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(items_from(&data).len(), 2);
        assert!(items_from(&json!({"detail": "boom"})).is_empty());
        assert!(items_from(&json!([1, 2])).is_empty());
    }
}
