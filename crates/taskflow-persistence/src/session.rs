//! A persistent engine session.
//!
//! `Session` owns an [`Engine`] and a save worker. After every operation
//! it turns the engine's `Persist` effects into save requests and collects
//! its notifications. Write failures come back from the worker as
//! persistence events and are surfaced as error notifications; the
//! in-memory tree is never rolled back.

use crate::repository::{LoadOrigin, StateRepository};
use crate::traits::{KeyValueStore, PersistenceEvent};
use crate::worker::{spawn_save_worker, SaveReport, SaveRequest};
use std::sync::Arc;
use taskflow_core::{AppConfig, Notification, TaskflowError, TaskflowResult};
use taskflow_domain::{
    starter_state, ActiveSelection, BoardId, BoardOperations, CardDraft, CardId, CardPatch,
    DropOutcome, Engine, EngineEvent, EngineSettings, LabelId, ListId, PersistScope,
    PersistedState, ProjectId, ViewModel,
};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub settings: EngineSettings,
    /// Seed the starter board when nothing is stored
    pub seed_starter_board: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
            seed_starter_board: true,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            settings: EngineSettings::from_config(config),
            seed_starter_board: config.seed_starter_board,
        }
    }
}

/// What happened over the lifetime of a session, returned by `close`
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub state: PersistedState,
    pub saves: SaveReport,
    /// Notifications not yet taken by the caller
    pub notifications: Vec<Notification>,
}

pub struct Session {
    engine: Engine,
    origin: LoadOrigin,
    save_tx: Option<mpsc::UnboundedSender<SaveRequest>>,
    worker: Option<JoinHandle<SaveReport>>,
    events_rx: broadcast::Receiver<PersistenceEvent>,
    notifications: Vec<Notification>,
}

impl Session {
    /// Load stored state, migrating or seeding it as needed, and start the
    /// save worker. Must be called inside a tokio runtime.
    pub async fn open(store: Arc<dyn KeyValueStore>, options: SessionOptions) -> TaskflowResult<Self> {
        let repository = StateRepository::new(store);
        let loaded = repository.load().await?;

        let (events_tx, events_rx) = broadcast::channel(64);
        let (save_tx, worker) = spawn_save_worker(repository, events_tx);

        let seeded = loaded.origin == LoadOrigin::Empty && options.seed_starter_board;
        let state = if seeded {
            tracing::info!("Seeding starter board");
            starter_state()
        } else {
            loaded.state
        };

        let mut engine = Engine::new(options.settings);
        engine.init(state)?;

        let mut session = Self {
            engine,
            origin: loaded.origin,
            save_tx: Some(save_tx),
            worker: Some(worker),
            events_rx,
            notifications: Vec::new(),
        };

        if seeded {
            session.queue(PersistScope::Projects);
        }
        if seeded || loaded.origin == LoadOrigin::Migrated {
            session.queue(PersistScope::ActiveBoard);
        }
        session.flush();
        Ok(session)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.poll_persistence_events();
        std::mem::take(&mut self.notifications)
    }

    fn queue(&mut self, scope: PersistScope) {
        let request = match scope {
            PersistScope::Projects => SaveRequest::Projects(self.engine.snapshot()),
            PersistScope::ActiveBoard => {
                SaveRequest::ActiveBoard(self.engine.active_board_id().cloned())
            }
        };

        match &self.save_tx {
            Some(tx) => {
                tracing::debug!("Queueing save of {}", request.scope());
                if let Err(e) = tx.send(request) {
                    tracing::error!("Failed to queue save: channel closed: {:?}", e.0.scope());
                }
            }
            None => tracing::debug!("No save channel available - skipping save"),
        }
    }

    /// Move engine events into save requests and notifications.
    fn flush(&mut self) {
        let mut scopes = Vec::new();
        for event in self.engine.take_events() {
            match event {
                EngineEvent::Notify(notification) => self.notifications.push(notification),
                EngineEvent::Persist(scope) => {
                    if !scopes.contains(&scope) {
                        scopes.push(scope);
                    }
                }
            }
        }
        for scope in scopes {
            self.queue(scope);
        }
        self.poll_persistence_events();
    }

    fn poll_persistence_events(&mut self) {
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => self.on_persistence_event(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} persistence events", skipped);
                }
                Err(_) => break,
            }
        }
    }

    fn on_persistence_event(&mut self, event: PersistenceEvent) {
        match event {
            PersistenceEvent::Error { scope, message } => {
                let error = TaskflowError::Storage(format!("{}: {}", scope, message));
                self.notifications
                    .push(Notification::error(error.user_message()));
            }
            PersistenceEvent::Saved { scope, .. } => tracing::debug!("Saved {}", scope),
            PersistenceEvent::Removed { scope } => tracing::debug!("Removed {}", scope),
        }
    }

    fn run<T>(&mut self, op: impl FnOnce(&mut Engine) -> T) -> T {
        let result = op(&mut self.engine);
        self.flush();
        result
    }

    /// Wait for pending writes, tear the engine down and report.
    pub async fn close(mut self) -> TaskflowResult<SessionSummary> {
        self.flush();
        self.save_tx = None;

        let saves = match self.worker.take() {
            Some(worker) => worker
                .await
                .map_err(|e| TaskflowError::Internal(format!("save worker panicked: {}", e)))?,
            None => SaveReport::default(),
        };
        self.poll_persistence_events();

        let state = self.engine.teardown();
        tracing::info!(
            "Session closed: {} writes, {} failed",
            saves.written,
            saves.failed
        );
        Ok(SessionSummary {
            state,
            saves,
            notifications: std::mem::take(&mut self.notifications),
        })
    }
}

impl BoardOperations for Session {
    fn create_project(&mut self, title: &str) -> TaskflowResult<ProjectId> {
        self.run(|engine| engine.create_project(title))
    }

    fn delete_project(&mut self, project_id: &ProjectId) -> TaskflowResult<()> {
        self.run(|engine| engine.delete_project(project_id))
    }

    fn create_board(&mut self, project_id: &ProjectId, title: &str) -> TaskflowResult<BoardId> {
        self.run(|engine| engine.create_board(project_id, title))
    }

    fn delete_board(&mut self, board_id: &BoardId) -> TaskflowResult<()> {
        self.run(|engine| engine.delete_board(board_id))
    }

    fn create_list(&mut self, board_id: &BoardId, title: &str) -> TaskflowResult<ListId> {
        self.run(|engine| engine.create_list(board_id, title))
    }

    fn delete_list(&mut self, list_id: &ListId) -> TaskflowResult<()> {
        self.run(|engine| engine.delete_list(list_id))
    }

    fn create_card(&mut self, list_id: &ListId, draft: CardDraft) -> TaskflowResult<CardId> {
        self.run(|engine| engine.create_card(list_id, draft))
    }

    fn update_card(&mut self, card_id: &CardId, patch: CardPatch) -> TaskflowResult<()> {
        self.run(|engine| engine.update_card(card_id, patch))
    }

    fn delete_card(&mut self, card_id: &CardId) -> TaskflowResult<()> {
        self.run(|engine| engine.delete_card(card_id))
    }

    fn toggle_card_label(&mut self, card_id: &CardId, label_id: &LabelId) -> TaskflowResult<bool> {
        self.run(|engine| engine.toggle_card_label(card_id, label_id))
    }

    fn begin_drag(&mut self, card_id: CardId, source_list_id: ListId) {
        self.run(|engine| engine.begin_drag(card_id, source_list_id))
    }

    fn drop_on(&mut self, target_list_id: &ListId) -> TaskflowResult<DropOutcome> {
        self.run(|engine| engine.drop_on(target_list_id))
    }

    fn cancel_drag(&mut self) {
        self.run(|engine| engine.cancel_drag())
    }

    fn move_card(&mut self, card_id: &CardId, target_list_id: &ListId) -> TaskflowResult<DropOutcome> {
        self.run(|engine| engine.move_card(card_id, target_list_id))
    }

    fn set_active_board(&mut self, board_id: &BoardId) -> ActiveSelection {
        self.run(|engine| engine.set_active_board(board_id))
    }

    fn toggle_project_expanded(&mut self, project_id: &ProjectId) -> TaskflowResult<bool> {
        self.run(|engine| engine.toggle_project_expanded(project_id))
    }

    fn view(&self) -> ViewModel {
        self.engine.view()
    }
}
