//! Decision audit reporting.
//!
//! Gates never log. The facade reports granted decisions to a caller-supplied
//! sink; denials surface as errors to the caller, which owns failure-side
//! handling. Sinks must not influence decisions.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_catalog::RoleName;
use storekeep_core::UserId;

/// The protected operation classes the facade exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationClass {
    ReadRecords,
    MutateRecords,
    DeleteRecords,
    UserDeletion,
    Statistics,
    BulkMutation,
    ResourceRequest,
}

impl OperationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationClass::ReadRecords => "read_records",
            OperationClass::MutateRecords => "mutate_records",
            OperationClass::DeleteRecords => "delete_records",
            OperationClass::UserDeletion => "user_deletion",
            OperationClass::Statistics => "statistics",
            OperationClass::BulkMutation => "bulk_mutation",
            OperationClass::ResourceRequest => "resource_request",
        }
    }
}

/// One granted decision, as reported upward.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub operation: OperationClass,
    pub principal: UserId,
    pub role: RoleName,
    pub occurred_at: DateTime<Utc>,
}

/// Caller-supplied audit collaborator.
pub trait AuditSink: Send + Sync {
    /// Record a granted decision. Must be infallible from the decision
    /// pipeline's point of view.
    fn record(&self, decision: DecisionRecord);
}

/// Sink emitting one `tracing` event per granted decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, decision: DecisionRecord) {
        tracing::info!(
            target: "storekeep::audit",
            operation = decision.operation.as_str(),
            principal = %decision.principal,
            role = %decision.role,
            "authorization granted"
        );
    }
}

/// Collecting sink for tests.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<DecisionRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DecisionRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, decision: DecisionRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(decision);
        }
    }
}
