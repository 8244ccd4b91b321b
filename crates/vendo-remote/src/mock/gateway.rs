use crate::gateway::{MachineRecord, RemoteGateway, SlotRecord};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use vendo_core::{Error, MachineId, Mode, Result, SlotName};

/// One recorded gateway call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    GetMachine(String),
    RegisterMachine(String),
    SetMachineMode(String, Mode),
    SetMachineName(String, String),
    GetInventory(String),
    /// Upsert with the number of slot records in the batch.
    UpsertInventory(String, usize),
}

#[derive(Debug, Default)]
struct GatewayState {
    machines: HashMap<String, MachineRecord>,
    inventories: HashMap<String, BTreeMap<SlotName, SlotRecord>>,
    calls: Vec<GatewayCall>,
    fail_next: Option<Error>,
}

/// In-memory machine registry with call recording.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl MockGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway pre-seeded with one idle machine.
    #[must_use]
    pub fn with_machine(id: &MachineId, row_count: u8, column_count: u8) -> Self {
        let gateway = Self::new();
        gateway.seed_machine(MachineRecord {
            id: id.clone(),
            name: None,
            row_count,
            column_count,
            mode: Mode::Idle,
        });
        gateway
    }

    fn lock(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().expect("mock gateway state poisoned")
    }

    /// Insert or replace a machine record directly, bypassing call recording.
    pub fn seed_machine(&self, record: MachineRecord) {
        let mut state = self.lock();
        let id = record.id.as_str().to_string();
        state.inventories.entry(id.clone()).or_default();
        state.machines.insert(id, record);
    }

    /// Insert or replace a slot record directly, bypassing call recording.
    pub fn seed_slot(&self, id: &MachineId, record: SlotRecord) {
        self.lock()
            .inventories
            .entry(id.as_str().to_string())
            .or_default()
            .insert(record.slot_name, record);
    }

    /// Overwrite a machine's stored mode behind the caller's back,
    /// simulating another session having changed it.
    pub fn force_mode(&self, id: &MachineId, mode: Mode) {
        if let Some(record) = self.lock().machines.get_mut(id.as_str()) {
            record.mode = mode;
        }
    }

    /// The stored record for a machine, if registered.
    #[must_use]
    pub fn machine(&self, id: &MachineId) -> Option<MachineRecord> {
        self.lock().machines.get(id.as_str()).cloned()
    }

    /// The stored inventory for a machine, in slot order.
    #[must_use]
    pub fn inventory(&self, id: &MachineId) -> Vec<SlotRecord> {
        self.lock()
            .inventories
            .get(id.as_str())
            .map(|slots| slots.values().cloned().collect())
            .unwrap_or_default()
    }

    /// All recorded calls so far.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Drain and return the recorded calls.
    pub fn take_calls(&self) -> Vec<GatewayCall> {
        std::mem::take(&mut self.lock().calls)
    }

    /// Make the next gateway call fail with `error`.
    pub fn fail_next(&self, error: Error) {
        self.lock().fail_next = Some(error);
    }

    fn begin(&self, call: GatewayCall) -> Result<MutexGuard<'_, GatewayState>> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        Ok(state)
    }
}

impl RemoteGateway for MockGateway {
    async fn get_machine(&self, id: &MachineId) -> Result<MachineRecord> {
        let state = self.begin(GatewayCall::GetMachine(id.as_str().to_string()))?;
        state
            .machines
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Error::not_found(format!("machine {id}")))
    }

    async fn register_machine(
        &self,
        id: &MachineId,
        row_count: u8,
        column_count: u8,
    ) -> Result<MachineRecord> {
        let mut state = self.begin(GatewayCall::RegisterMachine(id.as_str().to_string()))?;
        if state.machines.contains_key(id.as_str()) {
            return Err(Error::query_failure(
                400,
                format!("machine {id} already registered"),
            ));
        }
        let record = MachineRecord {
            id: id.clone(),
            name: None,
            row_count,
            column_count,
            mode: Mode::Idle,
        };
        state
            .inventories
            .entry(id.as_str().to_string())
            .or_default();
        state
            .machines
            .insert(id.as_str().to_string(), record.clone());
        Ok(record)
    }

    async fn set_machine_mode(&self, id: &MachineId, mode: Mode) -> Result<MachineRecord> {
        let mut state = self.begin(GatewayCall::SetMachineMode(id.as_str().to_string(), mode))?;
        let record = state
            .machines
            .get_mut(id.as_str())
            .ok_or_else(|| Error::not_found(format!("machine {id}")))?;
        record.mode = mode;
        Ok(record.clone())
    }

    async fn set_machine_name(&self, id: &MachineId, name: &str) -> Result<MachineRecord> {
        let mut state = self.begin(GatewayCall::SetMachineName(
            id.as_str().to_string(),
            name.to_string(),
        ))?;
        let record = state
            .machines
            .get_mut(id.as_str())
            .ok_or_else(|| Error::not_found(format!("machine {id}")))?;
        record.name = Some(name.to_string());
        Ok(record.clone())
    }

    async fn get_inventory(&self, id: &MachineId) -> Result<Vec<SlotRecord>> {
        let state = self.begin(GatewayCall::GetInventory(id.as_str().to_string()))?;
        if !state.machines.contains_key(id.as_str()) {
            return Err(Error::not_found(format!("machine {id}")));
        }
        Ok(state
            .inventories
            .get(id.as_str())
            .map(|slots| slots.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_inventory(&self, id: &MachineId, changes: &[SlotRecord]) -> Result<()> {
        let mut state = self.begin(GatewayCall::UpsertInventory(
            id.as_str().to_string(),
            changes.len(),
        ))?;
        if !state.machines.contains_key(id.as_str()) {
            return Err(Error::not_found(format!("machine {id}")));
        }
        let slots = state
            .inventories
            .entry(id.as_str().to_string())
            .or_default();
        for change in changes {
            if change.is_cleared() {
                slots.remove(&change.slot_name);
            } else {
                slots.insert(change.slot_name, change.clone());
            }
        }
        Ok(())
    }
}
