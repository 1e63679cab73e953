use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use tracing::{debug, info, warn};
use crate::schedule::{Day, DayView, Location, ProjectionError, Schedule};

const SESSION_ID_LEN: usize = 32;
const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// One user's schedule plus the day they are looking at
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    schedule: Schedule,
    selected_day: Day,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: Schedule) -> Self {
        Workspace { schedule, selected_day: Day::default() }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn select_day(&mut self, day: Day) {
        self.selected_day = day;
    }

    pub fn add_employee(&mut self, location: Location, name: &str) {
        self.schedule = self.schedule.add_employee(self.selected_day, location, name);
    }

    pub fn remove_employee(&mut self, location: Location, index: usize) {
        self.schedule = self.schedule.remove_employee(self.selected_day, location, index);
    }

    pub fn set_sales_projection(&mut self, location: Location, raw: &str) -> Result<(), ProjectionError> {
        self.schedule = self.schedule.set_sales_projection(self.selected_day, location, raw)?;
        Ok(())
    }

    pub fn view(&self) -> DayView {
        DayView::build(&self.schedule, self.selected_day)
    }
}

struct SessionEntry {
    workspace: Workspace,
    last_seen: DateTime<Utc>,
}

/// Workspaces keyed by session id. Idle sessions are dropped after `ttl`;
/// past `max_sessions` the least recently seen one makes room.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_capacity(ttl: Duration, max_sessions: usize) -> Self {
        SessionRegistry {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Creates an empty workspace and returns its id
    pub fn open(&self) -> String {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(char::from)
            .collect();
        self.with_workspace(&id, |_| ());
        debug!("opened session");
        id
    }

    /// Runs `f` against the session's workspace, recreating it if it was evicted.
    pub fn with_workspace<T, F>(&self, id: &str, f: F) -> T
    where
        F: FnOnce(&mut Workspace) -> T,
    {
        self.with_workspace_at(id, Utc::now(), f)
    }

    fn with_workspace_at<T, F>(&self, id: &str, now: DateTime<Utc>, f: F) -> T
    where
        F: FnOnce(&mut Workspace) -> T,
    {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        Self::evict_idle(&mut sessions, now, self.ttl, id);
        if !sessions.contains_key(id) {
            Self::make_room(&mut sessions, self.max_sessions);
        }
        let entry = sessions.entry(id.to_string()).or_insert_with(|| SessionEntry {
            workspace: Workspace::new(),
            last_seen: now,
        });
        entry.last_seen = now;
        f(&mut entry.workspace)
    }

    fn evict_idle(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>, ttl: Duration, keep: &str) {
        let before = sessions.len();
        sessions.retain(|id, entry| id == keep || now - entry.last_seen <= ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "evicted idle sessions");
        }
    }

    fn make_room(sessions: &mut HashMap<String, SessionEntry>, max_sessions: usize) {
        while sessions.len() >= max_sessions {
            let oldest = match sessions.iter().min_by_key(|(_, entry)| entry.last_seen) {
                Some((id, _)) => id.clone(),
                None => break,
            };
            sessions.remove(&oldest);
            warn!(max_sessions, "session limit reached, dropped least recently seen session");
        }
    }
}
