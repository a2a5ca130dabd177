//! The turn orchestrator.

use rand::Rng;
use tm_core::{AppliedMarkers, MarkerScan, Narrative, PhaseTransition, Session, SessionId};
use tm_oracle::{GenerationError, Narrator, TextService};
use tm_store::SessionStore;

use crate::error::{EngineError, EngineResult};
use crate::menu::{MenuAction, MenuOutcome};

/// A session is saved after every turn whose number is a multiple of this.
pub const AUTOSAVE_INTERVAL: u32 = 5;

/// What one processed command produced.
#[derive(Debug)]
pub struct TurnOutcome {
    /// Reply text with marker lines removed.
    pub display: String,
    /// Phase change caused by this turn, if any.
    pub transition: Option<PhaseTransition>,
    /// State changes made by the reply's markers.
    pub applied: AppliedMarkers,
    /// Whether the session was autosaved after this turn.
    pub autosaved: bool,
    /// The generation failure that was replaced by a connection error.
    pub failure: Option<GenerationError>,
}

/// Runs turns for sessions passed in by the caller.
#[derive(Debug)]
pub struct Engine<S> {
    narrator: Narrator<S>,
    store: SessionStore,
}

impl<S: TextService> Engine<S> {
    /// Create an engine over a text service and a session store.
    pub fn new(service: S, store: SessionStore) -> Self {
        Self {
            narrator: Narrator::new(service),
            store,
        }
    }

    /// The session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The prompt-level generator.
    pub fn narrator(&self) -> &Narrator<S> {
        &self.narrator
    }

    /// Start and persist a new session.
    ///
    /// Without a name, one is derived from the local time. A failed narrative
    /// or hostname generation falls back to built-in values.
    pub fn new_session(&self, name: Option<&str>) -> EngineResult<Session> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_session_name);

        let narrative = self.narrator.generate_narrative().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "narrative generation failed, using fallback");
            Narrative::fallback()
        });

        let hostname = self
            .narrator
            .generate_hostname(&narrative.organization_name)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "hostname generation failed, using fallback");
                fallback_hostname()
            });

        let mut session = Session::new(name, narrative, hostname);
        self.store.create(&mut session)?;
        tracing::info!(
            id = %session.id(),
            org = %session.narrative().organization_name,
            host = %session.hostname,
            "session created"
        );
        Ok(session)
    }

    /// Load a saved session.
    pub fn resume(&self, id: &SessionId) -> EngineResult<Session> {
        let session = self
            .store
            .load(id)
            .ok_or_else(|| EngineError::SessionNotFound(id.clone()))?;
        tracing::info!(%id, turn = session.turn_count(), "session resumed");
        Ok(session)
    }

    /// Up to `limit` saved sessions, most recently played first.
    pub fn recent_sessions(&self, limit: usize) -> EngineResult<Vec<Session>> {
        let mut sessions = self.store.list_all()?;
        sessions.truncate(limit);
        Ok(sessions)
    }

    /// Persist the session now.
    pub fn save(&self, session: &mut Session) -> EngineResult<()> {
        self.store.save(session)?;
        Ok(())
    }

    /// Process one player command end to end.
    ///
    /// The turn always counts and is always recorded. If generation fails the
    /// reply is an in-fiction connection error and no markers are applied.
    /// Only a failed autosave is returned as an error, after the session has
    /// already been updated.
    pub fn process_turn(&self, session: &mut Session, input: &str) -> EngineResult<TurnOutcome> {
        let transition = session.advance_turn();
        if let Some(t) = transition {
            tracing::info!(id = %session.id(), from = %t.from, to = %t.to, "phase transition");
        }

        let (raw, failure) = match self.narrator.process_command(session, input) {
            Ok(reply) => (reply, None),
            Err(e) => {
                tracing::warn!(
                    id = %session.id(),
                    turn = session.turn_count(),
                    error = %e,
                    "command generation failed"
                );
                (e.connection_error_response(), Some(e))
            }
        };

        let (display, applied) = if failure.is_none() {
            let scan = MarkerScan::parse(&raw);
            let applied = scan.apply(session);
            (scan.display().to_string(), applied)
        } else {
            (raw.clone(), AppliedMarkers::default())
        };
        if !applied.is_empty() {
            tracing::debug!(?applied, "markers applied");
        }

        session.record_turn(input, raw);

        let autosaved = session.turn_count() % AUTOSAVE_INTERVAL == 0;
        if autosaved {
            self.store.save(session)?;
            tracing::debug!(id = %session.id(), turn = session.turn_count(), "autosaved");
        }

        Ok(TurnOutcome {
            display,
            transition,
            applied,
            autosaved,
            failure,
        })
    }

    /// Carry out a game menu choice.
    pub fn handle_menu(&self, session: &mut Session, action: MenuAction) -> EngineResult<MenuOutcome> {
        if action.saves() {
            self.save(session)?;
        }
        Ok(action.into())
    }
}

/// `Session-YYYYMMDD-HHMM` in local time.
pub fn default_session_name() -> String {
    chrono::Local::now().format("Session-%Y%m%d-%H%M").to_string()
}

/// Placeholder hostname when none could be generated.
pub fn fallback_hostname() -> String {
    format!("ENIGMA-{}", rand::rng().random_range(100..=999))
}
