//! Shared test fixtures: member constructors and in-memory fakes for the
//! collaborator seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::approval::{ApprovalRequest, Decision, ReviewSurface, SurfaceError};
use crate::directory::{
    DirectoryError, EditError, Member, MemberDirectory, MemberEditor, MemberId, Role, RoleId,
};
use crate::ledger::{Ledger, MedalStats};

pub const REQUESTER_ROLE: RoleId = RoleId(9001);
pub const APPROVER_ROLE: RoleId = RoleId(9002);
pub const DISCHARGE_ROLES: [RoleId; 2] = [RoleId(9003), RoleId(9004)];

pub fn role(id: u64, position: i64) -> Role {
    Role {
        id: RoleId(id),
        name: format!("role-{id}"),
        position,
    }
}

pub fn member_with_roles(id: u64, roles: Vec<Role>) -> Member {
    Member {
        id: MemberId(id),
        display_name: format!("member-{id}"),
        roles,
        is_administrator: false,
    }
}

/// A member holding the requester capability
pub fn requester() -> Member {
    member_with_roles(
        100,
        vec![Role {
            id: REQUESTER_ROLE,
            name: "requester".to_string(),
            position: 5,
        }],
    )
}

/// A member holding the approver capability
pub fn approver() -> Member {
    member_with_roles(
        101,
        vec![Role {
            id: APPROVER_ROLE,
            name: "approver".to_string(),
            position: 6,
        }],
    )
}

/// A member holding neither capability
pub fn bystander() -> Member {
    member_with_roles(102, vec![])
}

// ============================================================================
// Fakes
// ============================================================================

/// In-memory member directory
pub struct FakeDirectory {
    members: HashMap<MemberId, Member>,
}

impl FakeDirectory {
    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            members: members.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

#[async_trait]
impl MemberDirectory for FakeDirectory {
    async fn fetch_member(&self, id: MemberId) -> Result<Member, DirectoryError> {
        self.members
            .get(&id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }
}

/// In-memory ledger recording every call
pub struct FakeLedger {
    rows: Mutex<HashMap<MemberId, i64>>,
    next_row: AtomicI64,
    medal_types: Mutex<Vec<String>>,
    medals: Mutex<HashMap<MemberId, Vec<String>>>,
    updates: Mutex<Vec<(MemberId, String, bool)>>,
    add_user_count: AtomicUsize,
    fail_add: AtomicBool,
    fail_update: AtomicBool,
    stats: Mutex<Option<MedalStats>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            next_row: AtomicI64::new(2),
            medal_types: Mutex::new(Vec::new()),
            medals: Mutex::new(HashMap::new()),
            updates: Mutex::new(Vec::new()),
            add_user_count: AtomicUsize::new(0),
            fail_add: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            stats: Mutex::new(None),
        }
    }

    pub fn insert_row(&self, id: MemberId, row: i64) {
        self.rows.lock().unwrap().insert(id, row);
    }

    pub fn insert_medal_type(&self, name: &str) {
        self.medal_types.lock().unwrap().push(name.to_string());
    }

    pub fn grant_medal(&self, id: MemberId, name: &str) {
        self.medals
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push(name.to_string());
    }

    pub fn set_stats(&self, stats: MedalStats) {
        *self.stats.lock().unwrap() = Some(stats);
    }

    pub fn fail_add_user(&self) {
        self.fail_add.store(true, Ordering::SeqCst);
    }

    pub fn fail_updates(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }

    pub fn add_user_calls(&self) -> usize {
        self.add_user_count.load(Ordering::SeqCst)
    }

    pub fn medal_updates(&self) -> Vec<(MemberId, String, bool)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn medal_types_snapshot(&self) -> Vec<String> {
        self.medal_types.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn find_user_row(&self, user_id: MemberId) -> Option<i64> {
        self.rows.lock().unwrap().get(&user_id).copied()
    }

    async fn add_user(&self, user_id: MemberId) -> Option<i64> {
        if self.fail_add.load(Ordering::SeqCst) {
            return None;
        }
        self.add_user_count.fetch_add(1, Ordering::SeqCst);
        let row = self.next_row.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().insert(user_id, row);
        Some(row)
    }

    async fn get_user_medals(&self, user_id: MemberId) -> Vec<String> {
        self.medals
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn update_medal(&self, user_id: MemberId, medal_name: &str, has_medal: bool) -> bool {
        if self.fail_update.load(Ordering::SeqCst) {
            return false;
        }
        self.updates
            .lock()
            .unwrap()
            .push((user_id, medal_name.to_string(), has_medal));

        let mut medals = self.medals.lock().unwrap();
        let held = medals.entry(user_id).or_default();
        if has_medal {
            if !held.iter().any(|m| m == medal_name) {
                held.push(medal_name.to_string());
            }
        } else {
            held.retain(|m| m != medal_name);
        }
        true
    }

    async fn medal_types(&self) -> Vec<String> {
        self.medal_types_snapshot()
    }

    async fn add_medal_type(&self, medal_name: &str) -> bool {
        self.insert_medal_type(medal_name);
        true
    }

    async fn delete_medal_type(&self, medal_name: &str) -> bool {
        let mut types = self.medal_types.lock().unwrap();
        let before = types.len();
        types.retain(|m| m != medal_name);
        types.len() < before
    }

    async fn medal_stats(&self) -> Option<MedalStats> {
        self.stats.lock().unwrap().clone()
    }

    async fn probe(&self) -> bool {
        true
    }
}

/// Member editor recording mutations, with optional per-member failures
pub struct FakeEditor {
    renames: Mutex<Vec<(MemberId, String)>>,
    role_sets: Mutex<Vec<(MemberId, Vec<RoleId>)>>,
    failures: Mutex<HashMap<MemberId, EditError>>,
}

impl FakeEditor {
    pub fn new() -> Self {
        Self {
            renames: Mutex::new(Vec::new()),
            role_sets: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn fail_member(&self, id: MemberId, error: EditError) {
        self.failures.lock().unwrap().insert(id, error);
    }

    pub fn renames(&self) -> Vec<(MemberId, String)> {
        self.renames.lock().unwrap().clone()
    }

    pub fn role_sets(&self) -> Vec<(MemberId, Vec<RoleId>)> {
        self.role_sets.lock().unwrap().clone()
    }

    fn failure_for(&self, id: MemberId) -> Option<EditError> {
        self.failures.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl MemberEditor for FakeEditor {
    async fn set_nickname(
        &self,
        id: MemberId,
        nickname: &str,
        _audit_reason: &str,
    ) -> Result<(), EditError> {
        if let Some(error) = self.failure_for(id) {
            return Err(error);
        }
        self.renames.lock().unwrap().push((id, nickname.to_string()));
        Ok(())
    }

    async fn replace_roles(
        &self,
        id: MemberId,
        roles: &[RoleId],
        _audit_reason: &str,
    ) -> Result<(), EditError> {
        if let Some(error) = self.failure_for(id) {
            return Err(error);
        }
        self.role_sets.lock().unwrap().push((id, roles.to_vec()));
        Ok(())
    }
}

/// Review surface recording postings and finalizations
pub struct FakeSurface {
    posted: Mutex<Vec<Uuid>>,
    finalized: Mutex<Vec<(Uuid, Decision)>>,
    fail_post: AtomicBool,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            posted: Mutex::new(Vec::new()),
            finalized: Mutex::new(Vec::new()),
            fail_post: AtomicBool::new(false),
        }
    }

    pub fn fail_posting(&self) {
        self.fail_post.store(true, Ordering::SeqCst);
    }

    pub fn posted(&self) -> Vec<Uuid> {
        self.posted.lock().unwrap().clone()
    }

    pub fn finalized(&self) -> Vec<(Uuid, Decision)> {
        self.finalized.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewSurface for FakeSurface {
    async fn post_pending(&self, request: &ApprovalRequest) -> Result<(), SurfaceError> {
        if self.fail_post.load(Ordering::SeqCst) {
            return Err(SurfaceError::Unavailable("channel not found".to_string()));
        }
        self.posted.lock().unwrap().push(request.id);
        Ok(())
    }

    async fn finalize(&self, request_id: Uuid, decision: Decision) -> Result<(), SurfaceError> {
        self.finalized.lock().unwrap().push((request_id, decision));
        Ok(())
    }
}
