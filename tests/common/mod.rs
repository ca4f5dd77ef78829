#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use exam_editor::models::failure::Failure;
use exam_editor::services::remote::RemoteBoundary;
use serde_json::{json, Value};

#[derive(Default)]
struct Store {
    next_id: i32,
    records: HashMap<i32, Value>,
    calls: Vec<(String, Value)>,
    failures: VecDeque<Value>,
}

/// In-memory persistence service speaking the remote command contract.
#[derive(Clone, Default)]
pub struct FakeBoundary {
    store: Arc<Mutex<Store>>,
}

impl FakeBoundary {
    pub fn new() -> Self {
        let boundary = Self::default();
        boundary.store.lock().unwrap().next_id = 100;
        boundary
    }

    /// The next command fails with `failure` instead of running.
    pub fn fail_next(&self, failure: Value) {
        self.store.lock().unwrap().failures.push_back(failure);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|(command, _)| command).collect()
    }

    pub fn record(&self, id: i32) -> Option<Value> {
        self.store.lock().unwrap().records.get(&id).cloned()
    }

    pub fn seed(&self, id: i32, record: Value) {
        self.store.lock().unwrap().records.insert(id, record);
    }
}

#[async_trait]
impl RemoteBoundary for FakeBoundary {
    async fn invoke(&self, command: &str, payload: Value) -> Result<Value, Failure> {
        tokio::task::yield_now().await;

        let mut store = self.store.lock().unwrap();
        store.calls.push((command.to_string(), payload.clone()));

        if let Some(failure) = store.failures.pop_front() {
            return Err(Failure::from_value(failure));
        }

        let (verb, _) = command.split_once('_').unwrap_or((command, ""));
        match verb {
            "create" | "update" => {
                let mut record = payload
                    .as_object()
                    .and_then(|o| o.values().next().cloned())
                    .ok_or_else(|| Failure::Message("missing record".into()))?;
                let id = match record["id"].as_i64() {
                    Some(id) => id as i32,
                    None => {
                        store.next_id += 1;
                        store.next_id
                    }
                };
                record["id"] = json!(id);
                store.records.insert(id, record.clone());
                Ok(record)
            }
            "delete" => {
                let id = payload["id"].as_i64().unwrap_or_default() as i32;
                let removed = store.records.remove(&id).map_or(0, |_| 1);
                Ok(json!(removed))
            }
            _ => Err(Failure::Message(format!("unknown command {}", command))),
        }
    }
}
