use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::{error, instrument};

use crate::models::answer::Answer;
use crate::models::assignment_option::AssignmentOption;
use crate::models::failure::Failure;
use crate::services::error_formatter;
use crate::services::remote::RemoteBoundary;

/// Command names and payload key of one remotely persisted record kind.
pub trait RecordKind: Send + Sync + 'static {
    type Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    const LABEL: &'static str;
    const PAYLOAD_KEY: &'static str;
    const CREATE: &'static str;
    const UPDATE: &'static str;
    const DELETE: &'static str;
}

pub struct AnswerRecords;

impl RecordKind for AnswerRecords {
    type Record = Answer;

    const LABEL: &'static str = "answer";
    const PAYLOAD_KEY: &'static str = "answer";
    const CREATE: &'static str = "create_answer";
    const UPDATE: &'static str = "update_answer";
    const DELETE: &'static str = "delete_answer";
}

pub struct AssignmentOptionRecords;

impl RecordKind for AssignmentOptionRecords {
    type Record = AssignmentOption;

    const LABEL: &'static str = "assignment option";
    const PAYLOAD_KEY: &'static str = "option";
    const CREATE: &'static str = "create_assignment_option";
    const UPDATE: &'static str = "update_assignment_option";
    const DELETE: &'static str = "delete_assignment_option";
}

pub type AnswerGateway = CrudGateway<AnswerRecords>;
pub type AssignmentOptionGateway = CrudGateway<AssignmentOptionRecords>;

#[derive(Debug, Default)]
struct GatewayState {
    loading: bool,
    errors: Vec<String>,
}

/// Single choke point for remote create/update/delete of one record kind.
///
/// Failures never escape as panics: they are logged, formatted into the
/// error list and handed back as `Err(Failure)`.
pub struct CrudGateway<K: RecordKind> {
    boundary: Arc<dyn RemoteBoundary>,
    state: Arc<Mutex<GatewayState>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: RecordKind> Clone for CrudGateway<K> {
    fn clone(&self) -> Self {
        Self {
            boundary: Arc::clone(&self.boundary),
            state: Arc::clone(&self.state),
            _kind: PhantomData,
        }
    }
}

impl<K: RecordKind> CrudGateway<K> {
    pub fn new(boundary: Arc<dyn RemoteBoundary>) -> Self {
        Self {
            boundary,
            state: Arc::new(Mutex::new(GatewayState::default())),
            _kind: PhantomData,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn errors(&self) -> Vec<String> {
        self.state().errors.clone()
    }

    pub async fn create(&self, record: &K::Record) -> Result<K::Record, Failure> {
        let payload = Self::record_payload(record)?;
        self.call(K::CREATE, payload).await
    }

    pub async fn update(&self, record: &K::Record) -> Result<K::Record, Failure> {
        let payload = Self::record_payload(record)?;
        self.call(K::UPDATE, payload).await
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<u64, Failure> {
        self.call(K::DELETE, json!({ "id": id })).await
    }

    #[instrument(level = "debug", skip(self, payload), fields(kind = K::LABEL))]
    async fn call<T: DeserializeOwned>(&self, command: &str, payload: JsonValue) -> Result<T, Failure> {
        self.begin();

        let result = self
            .boundary
            .invoke(command, payload)
            .await
            .and_then(|value| serde_json::from_value::<T>(value).map_err(Failure::native));

        let mut state = self.state();
        state.loading = false;
        if let Err(failure) = &result {
            error!(command, failure = ?failure, "remote command failed");
            state.errors.push(error_formatter::format(failure));
        }

        result
    }

    fn record_payload(record: &K::Record) -> Result<JsonValue, Failure> {
        let mut payload = serde_json::Map::new();
        payload.insert(
            K::PAYLOAD_KEY.to_string(),
            serde_json::to_value(record).map_err(Failure::native)?,
        );
        Ok(JsonValue::Object(payload))
    }

    fn begin(&self) {
        let mut state = self.state();
        state.errors.clear();
        state.loading = true;
    }

    fn state(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
