//! Test doubles for the domain traits, shared by the engine, scheduler, and
//! router tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::traits::{
    Forge, ForgeError, ForgeSession, Notifier, NotifyError, StoreError, UserStore,
};
use crate::domain::types::{Commit, Identity, Issue, Project, UserRecord};

pub fn project(id: u64, name: &str) -> Project {
    Project {
        id,
        name: name.to_string(),
        web_url: format!("https://gitlab.example.com/{name}"),
    }
}

pub fn commit_at(created_at: DateTime<Utc>, author_email: &str) -> Commit {
    Commit {
        title: "Fix the frobnicator".to_string(),
        author_name: "Some Author".to_string(),
        author_email: author_email.to_string(),
        created_at,
        message: "Fix the frobnicator\n\nLonger explanation.".to_string(),
        web_url: "https://gitlab.example.com/p/-/commit/abc".to_string(),
    }
}

pub fn issue_at(created_at: DateTime<Utc>) -> Issue {
    Issue {
        title: "Something is broken".to_string(),
        author_name: "Some Reporter".to_string(),
        created_at,
        description: "Steps to reproduce...".to_string(),
        web_url: "https://gitlab.example.com/p/-/issues/1".to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct FakeSession {
    pub identity: Identity,
    pub projects: Vec<Project>,
    pub fail_projects: bool,
    pub panic_on_projects: bool,
    pub commits: HashMap<u64, Vec<Commit>>,
    pub issues: HashMap<u64, Vec<Issue>>,
    pub fail_commits: HashSet<u64>,
    pub fail_issues: HashSet<u64>,
}

impl FakeSession {
    pub fn new(email: &str) -> Self {
        Self {
            identity: Identity {
                name: "Test User".to_string(),
                email: email.to_string(),
            },
            projects: Vec::new(),
            fail_projects: false,
            panic_on_projects: false,
            commits: HashMap::new(),
            issues: HashMap::new(),
            fail_commits: HashSet::new(),
            fail_issues: HashSet::new(),
        }
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self
    }

    pub fn with_commit(mut self, project_id: u64, commit: Commit) -> Self {
        self.commits.entry(project_id).or_default().push(commit);
        self
    }

    pub fn with_issue(mut self, project_id: u64, issue: Issue) -> Self {
        self.issues.entry(project_id).or_default().push(issue);
        self
    }
}

#[async_trait]
impl ForgeSession for FakeSession {
    async fn current_identity(&self) -> Result<Identity, ForgeError> {
        Ok(self.identity.clone())
    }

    async fn starred_projects(&self) -> Result<Vec<Project>, ForgeError> {
        if self.panic_on_projects {
            panic!("fake session asked to panic");
        }
        if self.fail_projects {
            return Err(ForgeError::Remote("project listing unavailable".into()));
        }
        Ok(self.projects.clone())
    }

    async fn commits_since(
        &self,
        project_id: u64,
        _since: DateTime<Utc>,
    ) -> Result<Vec<Commit>, ForgeError> {
        if self.fail_commits.contains(&project_id) {
            return Err(ForgeError::Remote("commit listing unavailable".into()));
        }
        Ok(self.commits.get(&project_id).cloned().unwrap_or_default())
    }

    async fn issues_created_after(
        &self,
        project_id: u64,
        _after: DateTime<Utc>,
    ) -> Result<Vec<Issue>, ForgeError> {
        if self.fail_issues.contains(&project_id) {
            return Err(ForgeError::Remote("issue listing unavailable".into()));
        }
        Ok(self.issues.get(&project_id).cloned().unwrap_or_default())
    }
}

pub struct FakeForge {
    pub default_session: FakeSession,
    /// Per-credential overrides for multi-user tests.
    pub sessions: Mutex<HashMap<String, FakeSession>>,
    pub reject_auth: bool,
    pub opened: AtomicUsize,
}

impl FakeForge {
    pub fn accepting(session: FakeSession) -> Self {
        Self {
            default_session: session,
            sessions: Mutex::new(HashMap::new()),
            reject_auth: false,
            opened: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        let mut forge = Self::accepting(FakeSession::new("nobody@example.com"));
        forge.reject_auth = true;
        forge
    }

    pub fn insert_session(&self, credential: &str, session: FakeSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(credential.to_string(), session);
    }

    pub fn opened_sessions(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Forge for FakeForge {
    async fn open_session(&self, credential: &str) -> Result<Box<dyn ForgeSession>, ForgeError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.reject_auth {
            return Err(ForgeError::Auth("401 Unauthorized".into()));
        }
        let session = self
            .sessions
            .lock()
            .unwrap()
            .get(credential)
            .cloned()
            .unwrap_or_else(|| self.default_session.clone());
        Ok(Box::new(session))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingNotifier {
    pub fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<HashMap<i64, UserRecord>>,
}

impl MemoryStore {
    pub fn with_user(user: UserRecord) -> Self {
        let store = Self::default();
        store.records.lock().unwrap().insert(user.id, user);
        store
    }

    pub fn stored(&self, id: i64) -> Option<UserRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn put(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }
}
