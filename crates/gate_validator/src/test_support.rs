//! In-memory platform used by the unit tests of this crate.

use async_trait::async_trait;
use gate_core::{
    GateError, JobSummary, Platform, Result, StatementHandle, StatementRequest, StatementState,
    TableRef,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Script {
    id: String,
    states: Vec<StatementHandle>,
    payload: Value,
}

/// Platform fake keyed by table. Tables without a lookup entry are absent.
#[derive(Default)]
pub(crate) struct FakePlatform {
    lookups: HashMap<String, Result<()>>,
    scripts: HashMap<String, Script>,
    jobs: Option<Result<Vec<JobSummary>>>,
    cancel_error: Option<GateError>,
    polls: Mutex<HashMap<String, usize>>,
    pub(crate) lookup_calls: AtomicUsize,
    pub(crate) submit_calls: AtomicUsize,
    pub(crate) poll_calls: AtomicUsize,
    pub(crate) job_list_calls: AtomicUsize,
    pub(crate) cancel_calls: AtomicUsize,
}

impl FakePlatform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Existing table whose count statement succeeds immediately.
    pub(crate) fn with_table(self, table: &TableRef, rows: u64) -> Self {
        self.with_script(
            table,
            vec![StatementState::Succeeded],
            json!({ "result": [[rows]] }),
        )
    }

    /// Existing table whose count statement goes through `states`.
    pub(crate) fn with_script(
        mut self,
        table: &TableRef,
        states: Vec<StatementState>,
        payload: Value,
    ) -> Self {
        let id = format!("stmt-{}", table.full_name());
        let states = states
            .into_iter()
            .map(|state| StatementHandle::new(id.clone(), state))
            .collect();
        self.lookups.insert(table.full_name(), Ok(()));
        self.scripts.insert(
            table.quoted(),
            Script {
                id,
                states,
                payload,
            },
        );
        self
    }

    /// Existing table whose count statement fails on the platform.
    pub(crate) fn with_failing_statement(mut self, table: &TableRef, message: &str) -> Self {
        let id = format!("stmt-{}", table.full_name());
        self.lookups.insert(table.full_name(), Ok(()));
        self.scripts.insert(
            table.quoted(),
            Script {
                id: id.clone(),
                states: vec![
                    StatementHandle::new(id.clone(), StatementState::Running),
                    StatementHandle::new(id, StatementState::Failed).with_error(message),
                ],
                payload: Value::Null,
            },
        );
        self
    }

    pub(crate) fn with_lookup_error(mut self, table: &TableRef, error: GateError) -> Self {
        self.lookups.insert(table.full_name(), Err(error));
        self
    }

    pub(crate) fn with_jobs(mut self, names: &[&str]) -> Self {
        let jobs = names
            .iter()
            .enumerate()
            .map(|(i, name)| JobSummary::new(i as i64 + 1, *name))
            .collect();
        self.jobs = Some(Ok(jobs));
        self
    }

    pub(crate) fn with_job_list_error(mut self, error: GateError) -> Self {
        self.jobs = Some(Err(error));
        self
    }

    pub(crate) fn with_cancel_error(mut self, error: GateError) -> Self {
        self.cancel_error = Some(error);
        self
    }

    pub(crate) fn submits(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    fn script_by_id(&self, statement_id: &str) -> Result<&Script> {
        self.scripts
            .values()
            .find(|s| s.id == statement_id)
            .ok_or_else(|| GateError::NotFound(statement_id.to_string()))
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn get_table(&self, table: &TableRef) -> Result<()> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.lookups
            .get(&table.full_name())
            .cloned()
            .unwrap_or_else(|| Err(GateError::NotFound(table.full_name())))
    }

    async fn submit_statement(&self, request: &StatementRequest) -> Result<StatementHandle> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let script = self
            .scripts
            .iter()
            .find(|(quoted, _)| request.statement.contains(quoted.as_str()))
            .map(|(_, script)| script)
            .ok_or_else(|| GateError::transport("no script for statement"))?;
        Ok(script.states[0].clone())
    }

    async fn get_statement(&self, statement_id: &str) -> Result<StatementHandle> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script_by_id(statement_id)?;
        let mut polls = self.polls.lock().unwrap();
        let index = polls.entry(statement_id.to_string()).or_insert(0);
        *index += 1;
        let state = script.states[(*index).min(script.states.len() - 1)].clone();
        Ok(state)
    }

    async fn get_statement_result(&self, statement_id: &str) -> Result<Value> {
        Ok(self.script_by_id(statement_id)?.payload.clone())
    }

    async fn cancel_statement(&self, statement_id: &str) -> Result<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.script_by_id(statement_id)?;
        match &self.cancel_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        self.job_list_calls.fetch_add(1, Ordering::SeqCst);
        self.jobs.clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}
