use esnap_core::{Acknowledgement, CreateResponse, Result, Snapshot, SnapshotApi, SnapshotError};
use std::cell::RefCell;

/// A call observed by the fake service
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(String),
    Delete(String),
    Create(String),
    Status(String),
}

/// In-memory snapshot repository with scriptable failures
#[allow(dead_code)]
pub struct FakeService {
    snapshots: RefCell<Vec<Snapshot>>,
    calls: RefCell<Vec<Call>>,
    list_error: Option<SnapshotError>,
    unacknowledged: Vec<String>,
    created_state: String,
}

#[allow(dead_code)]
impl FakeService {
    pub fn with_snapshots(ids: &[&str]) -> Self {
        Self {
            snapshots: RefCell::new(ids.iter().map(|id| Snapshot::new(*id, "SUCCESS")).collect()),
            calls: RefCell::new(Vec::new()),
            list_error: None,
            unacknowledged: Vec::new(),
            created_state: "SUCCESS".to_string(),
        }
    }

    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> Self {
        let fake = Self::with_snapshots(&[]);
        *fake.snapshots.borrow_mut() = snapshots;
        fake
    }

    pub fn failing_list(mut self, error: SnapshotError) -> Self {
        self.list_error = Some(error);
        self
    }

    pub fn refusing_delete_of(mut self, id: &str) -> Self {
        self.unacknowledged.push(id.to_string());
        self
    }

    pub fn creating_with_state(mut self, state: &str) -> Self {
        self.created_state = state.to_string();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn remaining_ids(&self) -> Vec<String> {
        self.snapshots
            .borrow()
            .iter()
            .map(|s| s.snapshot.clone())
            .collect()
    }
}

impl SnapshotApi for FakeService {
    fn list_snapshots(&self, repository: &str) -> Result<Vec<Snapshot>> {
        self.calls.borrow_mut().push(Call::List(repository.to_string()));
        match &self.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.snapshots.borrow().clone()),
        }
    }

    fn delete_snapshot(&self, _repository: &str, snapshot_id: &str) -> Result<Acknowledgement> {
        self.calls
            .borrow_mut()
            .push(Call::Delete(snapshot_id.to_string()));
        if self.unacknowledged.iter().any(|id| id == snapshot_id) {
            return Ok(Acknowledgement {
                acknowledged: false,
            });
        }
        self.snapshots
            .borrow_mut()
            .retain(|s| s.snapshot != snapshot_id);
        Ok(Acknowledgement { acknowledged: true })
    }

    fn create_snapshot(&self, _repository: &str, snapshot_id: &str) -> Result<CreateResponse> {
        self.calls
            .borrow_mut()
            .push(Call::Create(snapshot_id.to_string()));
        self.snapshots
            .borrow_mut()
            .push(Snapshot::new(snapshot_id, self.created_state.clone()));
        Ok(CreateResponse { http_status: 200 })
    }

    fn snapshot_status(&self, _repository: &str, snapshot_id: &str) -> Result<Vec<Snapshot>> {
        self.calls
            .borrow_mut()
            .push(Call::Status(snapshot_id.to_string()));
        Ok(self
            .snapshots
            .borrow()
            .iter()
            .filter(|s| s.snapshot == snapshot_id)
            .cloned()
            .collect())
    }
}
