//! # Action Dispatcher Service
//!
//! Single entry point for every league read and write.
//!
//! ## Flow
//!
//! 1. Resolve the action name (`health` skips the secret gate).
//! 2. Check the shared secret. No store call happens before this passes.
//! 3. Read the document and its version token.
//! 4. Compute the new document.
//! 5. Write it back under the token that was read. On `VersionConflict`,
//!    re-read and repeat up to `conflict_retries` times.
//!
//! Store calls are awaited one after another and each is bounded by
//! `store_timeout`; a timeout is reported as `StoreUnavailable`.

use crate::domain::{
    check_secret, Action, ActionReply, ActionRequest, ActionTier, ConfirmResultPayload,
    DispatchError, DispatcherConfig, DocumentStats, HealthReport, NewsPayload, NotificationLog,
    NotificationPayload, RecordResultPayload, RegisterTeamPayload, RemoveTeamPayload,
    ScheduleMatchPayload, SecretCheck, StandingsQuery,
};
use crate::ports::inbound::ActionHandler;
use async_trait::async_trait;
use lg_01_document_store::{DocumentStore, StoreError, StoredDocument, WriteReceipt};
use lg_02_standings as standings;
use shared_types::{
    decode_document, encode_document, generate_id, Clock, LeagueDocument, Notification,
    SystemClock, VersionToken,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Timestamp format of backup file names.
const BACKUP_STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

/// Result of a successful read-modify-write cycle.
struct Modified<T> {
    value: T,
    document: LeagueDocument,
    receipt: WriteReceipt,
}

/// Maps named actions onto document store operations.
pub struct ActionDispatcher {
    store: Option<Arc<dyn DocumentStore>>,
    secret: Option<String>,
    clock: Arc<dyn Clock>,
    config: DispatcherConfig,
}

impl ActionDispatcher {
    /// `store` or `secret` may be absent; actions that need them then fail
    /// with `ServerMisconfigured` instead of being attempted.
    pub fn new(
        store: Option<Arc<dyn DocumentStore>>,
        secret: Option<String>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            store,
            secret,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Both the secret and a store are present.
    pub fn is_configured(&self) -> bool {
        self.store.is_some() && self.secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Run one action.
    pub async fn dispatch(&self, request: ActionRequest) -> Result<ActionReply, DispatchError> {
        let action = Action::lookup(request.action.trim());
        if action.map(Action::tier) == Some(ActionTier::Public) {
            return Ok(ActionReply::Health(self.health().await));
        }

        self.authorize(&request)?;

        let action = action.ok_or_else(|| DispatchError::InvalidAction(request.action.clone()))?;
        if action.info().needs_payload && !request.has_payload() {
            return Err(DispatchError::MissingPayload(action.name()));
        }

        let started = Instant::now();
        let result = self.run(action, &request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(reply) => info!(
                action = %action,
                version = reply.version().map(VersionToken::as_str),
                elapsed_ms,
                "Action completed"
            ),
            Err(err) => warn!(
                action = %action,
                kind = err.kind(),
                error = %err,
                elapsed_ms,
                "Action failed"
            ),
        }
        result
    }

    async fn run(
        &self,
        action: Action,
        request: &ActionRequest,
    ) -> Result<ActionReply, DispatchError> {
        match action {
            Action::GetData => self.get_data().await,
            Action::UpdateData => self.update_data(request).await,
            Action::AddNotification => self.add_notification(request).await,
            Action::MarkNotificationsRead => self.mark_notifications_read().await,
            Action::Stats => self.stats().await,
            Action::Health => Ok(ActionReply::Health(self.health().await)),
            Action::Backup => self.backup().await,
            Action::ClearData => self.clear_data().await,
            Action::RegisterTeam => self.register_team(request).await,
            Action::RemoveTeam => self.remove_team(request).await,
            Action::ScheduleMatch => self.schedule_match(request).await,
            Action::RecordResult => self.record_result(request).await,
            Action::ConfirmResult => self.confirm_result(request).await,
            Action::AddNews => self.add_news(request).await,
            Action::Standings => self.standings(request).await,
        }
    }

    fn authorize(&self, request: &ActionRequest) -> Result<(), DispatchError> {
        match check_secret(self.secret.as_deref(), request.secret.as_deref()) {
            SecretCheck::Accepted => Ok(()),
            SecretCheck::Rejected => {
                warn!(action = %request.action, "Rejected request with invalid secret");
                Err(DispatchError::Unauthorized)
            }
            SecretCheck::NotConfigured => Err(DispatchError::ServerMisconfigured(
                "admin secret is not set".into(),
            )),
        }
    }

    fn store(&self) -> Result<&dyn DocumentStore, DispatchError> {
        self.store
            .as_deref()
            .ok_or_else(|| DispatchError::ServerMisconfigured("no document store configured".into()))
    }

    // =========================================================================
    // Store access
    // =========================================================================

    /// Fetch raw content. `Ok(None)` means nothing is stored at `path`.
    async fn fetch_raw(&self, path: &str) -> Result<Option<StoredDocument>, DispatchError> {
        let store = self.store()?;
        let timeout = self.config.store_timeout;
        match tokio::time::timeout(timeout, store.fetch(path)).await {
            Err(_) => Err(DispatchError::StoreUnavailable(format!(
                "fetch of {path} timed out after {}ms",
                timeout.as_millis()
            ))),
            Ok(Err(StoreError::NotFound { .. })) => Ok(None),
            Ok(Err(err)) => Err(err.into()),
            Ok(Ok(stored)) => Ok(Some(stored)),
        }
    }

    async fn load(&self) -> Result<Option<(LeagueDocument, VersionToken)>, DispatchError> {
        match self.fetch_raw(&self.config.data_path).await? {
            Some(stored) => {
                let document = decode_document(&stored.content)?;
                Ok(Some((document, stored.version)))
            }
            None => Ok(None),
        }
    }

    async fn write_raw(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
        description: &str,
    ) -> Result<WriteReceipt, DispatchError> {
        let store = self.store()?;
        let timeout = self.config.store_timeout;
        match tokio::time::timeout(timeout, store.write(path, content, expected, description)).await
        {
            Err(_) => Err(DispatchError::StoreUnavailable(format!(
                "write of {path} timed out after {}ms; the write may not have landed",
                timeout.as_millis()
            ))),
            Ok(result) => result.map_err(DispatchError::from),
        }
    }

    async fn write_document(
        &self,
        document: &LeagueDocument,
        expected: Option<&VersionToken>,
        description: &str,
    ) -> Result<WriteReceipt, DispatchError> {
        let content = encode_document(document)?;
        self.write_raw(&self.config.data_path, &content, expected, description)
            .await
    }

    /// Read-modify-write under the optimistic lock.
    ///
    /// An absent document is treated as the seeded default and written
    /// create-only. `edit` may run once per attempt and must leave the
    /// document untouched when it fails.
    async fn modify<T, F>(&self, description: &str, mut edit: F) -> Result<Modified<T>, DispatchError>
    where
        F: FnMut(&mut LeagueDocument) -> Result<T, DispatchError> + Send,
        T: Send,
    {
        let max_attempts = self.config.conflict_retries + 1;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let (mut document, expected) = match self.load().await? {
                Some((document, version)) => (document, Some(version)),
                None => (LeagueDocument::seeded(self.clock.now()), None),
            };

            let value = edit(&mut document)?;
            document.touch(self.clock.now());

            match self
                .write_document(&document, expected.as_ref(), description)
                .await
            {
                Ok(receipt) => {
                    return Ok(Modified {
                        value,
                        document,
                        receipt,
                    })
                }
                Err(DispatchError::VersionConflict { .. }) if attempt < max_attempts => {
                    warn!(
                        path = %self.config.data_path,
                        attempt,
                        max_attempts,
                        "Version conflict, re-reading document"
                    );
                }
                Err(DispatchError::VersionConflict { .. }) => {
                    return Err(DispatchError::VersionConflict { attempts: attempt })
                }
                Err(err) => return Err(err),
            }
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    async fn get_data(&self) -> Result<ActionReply, DispatchError> {
        if let Some((data, version)) = self.load().await? {
            return Ok(ActionReply::Document {
                data,
                version,
                initialized: false,
            });
        }

        let seeded = LeagueDocument::seeded(self.clock.now());
        match self
            .write_document(&seeded, None, "Initialize league data")
            .await
        {
            Ok(receipt) => {
                info!(path = %self.config.data_path, version = %receipt.version, "Initialized league document");
                Ok(ActionReply::Document {
                    data: seeded,
                    version: receipt.version,
                    initialized: true,
                })
            }
            // Another caller initialised it between our read and write.
            Err(DispatchError::VersionConflict { .. }) => {
                let (data, version) = self.load().await?.ok_or_else(|| {
                    DispatchError::StoreUnavailable(
                        "document absent after concurrent initialisation".into(),
                    )
                })?;
                Ok(ActionReply::Document {
                    data,
                    version,
                    initialized: false,
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn update_data(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let mut document: LeagueDocument = request.payload(Action::UpdateData.name())?;
        document.touch(self.clock.now());
        let content = encode_document(&document)?;
        let path = self.config.data_path.as_str();
        let description = "Update league data";

        let receipt = match &request.version {
            // Caller-supplied token: strict compare-and-swap.
            Some(expected) => {
                self.write_raw(path, &content, Some(expected), description)
                    .await?
            }
            None => {
                let max_attempts = self.config.conflict_retries + 1;
                let mut attempt = 0;
                loop {
                    attempt += 1;
                    let latest = self.fetch_raw(path).await?.map(|stored| stored.version);
                    match self
                        .write_raw(path, &content, latest.as_ref(), description)
                        .await
                    {
                        Ok(receipt) => break receipt,
                        Err(DispatchError::VersionConflict { .. }) if attempt < max_attempts => {
                            warn!(path, attempt, max_attempts, "Version conflict on replace, retrying");
                        }
                        Err(DispatchError::VersionConflict { .. }) => {
                            return Err(DispatchError::VersionConflict { attempts: attempt })
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        };

        Ok(ActionReply::Replaced {
            message: "Data updated".into(),
            version: receipt.version,
            commit: receipt.commit,
            changes: document.change_summary(),
            timestamp: self.clock.now(),
        })
    }

    async fn add_notification(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let payload: NotificationPayload = request.payload(Action::AddNotification.name())?;
        let message = payload.message.trim();
        if message.is_empty() {
            return Err(DispatchError::InvalidPayload(
                "notification message cannot be empty".into(),
            ));
        }
        let kind = payload
            .kind
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let notification = Notification::new(generate_id("notif"), message, kind, self.clock.now());
        let cap = self.config.notification_cap;

        let modified = self
            .modify("Add admin notification", |document| {
                let dropped =
                    NotificationLog::new(&mut document.admin_notifications, cap).push(notification.clone());
                if dropped > 0 {
                    debug!(dropped, cap, "Notification log trimmed");
                }
                Ok(())
            })
            .await?;

        Ok(ActionReply::NotificationAdded {
            message: "Notification added".into(),
            notification,
            version: modified.receipt.version,
        })
    }

    async fn mark_notifications_read(&self) -> Result<ActionReply, DispatchError> {
        let cap = self.config.notification_cap;
        let modified = self
            .modify("Mark notifications read", |document| {
                Ok(NotificationLog::new(&mut document.admin_notifications, cap).mark_all_read())
            })
            .await?;
        Ok(ActionReply::NotificationsRead {
            marked: modified.value,
            version: modified.receipt.version,
        })
    }

    async fn stats(&self) -> Result<ActionReply, DispatchError> {
        let stats = match self.load().await? {
            Some((document, _)) => {
                let summary = standings::summarize(&document);
                DocumentStats {
                    teams: document.teams.len(),
                    matches: document.matches.len(),
                    news: document.news.len(),
                    notifications: document.admin_notifications.len(),
                    unread_notifications: document.unread_notifications(),
                    played_matches: summary.played_matches,
                    total_goals: summary.total_goals,
                }
            }
            None => DocumentStats::default(),
        };
        Ok(ActionReply::Stats {
            stats,
            status: "api_working".into(),
        })
    }

    /// Probe store connectivity. An absent document still counts as
    /// reachable. Never requires the secret.
    pub async fn health(&self) -> HealthReport {
        let configured = self.is_configured();
        let timestamp = self.clock.now();
        let Some(store) = self.store.as_deref() else {
            return HealthReport {
                status: "misconfigured".into(),
                configured,
                store: None,
                store_reachable: false,
                detail: Some("no document store configured".into()),
                timestamp,
            };
        };

        let probe = self.fetch_raw(&self.config.data_path).await;
        let store_reachable = probe.is_ok();
        let status = match (configured, store_reachable) {
            (false, _) => "misconfigured",
            (true, true) => "ok",
            (true, false) => "degraded",
        };
        HealthReport {
            status: status.into(),
            configured,
            store: Some(store.backend_tag().to_string()),
            store_reachable,
            detail: probe.err().map(|e| e.to_string()),
            timestamp,
        }
    }

    async fn backup(&self) -> Result<ActionReply, DispatchError> {
        let stored = self
            .fetch_raw(&self.config.data_path)
            .await?
            .ok_or_else(|| DispatchError::NotFound(self.config.data_path.clone()))?;
        let stamp = self.clock.now().format(BACKUP_STAMP_FORMAT).to_string();
        let backup_path = self.config.backup_path(&stamp);

        let receipt = self
            .write_raw(
                &backup_path,
                &stored.content,
                None,
                &format!("Backup league data ({})", stored.version),
            )
            .await?;

        info!(backup_path = %backup_path, source_version = %stored.version, "Backup written");
        Ok(ActionReply::Backup {
            backup_path,
            version: receipt.version,
            commit: receipt.commit,
        })
    }

    async fn clear_data(&self) -> Result<ActionReply, DispatchError> {
        let now = self.clock.now();
        let modified = self
            .modify("Clear league data", |document| {
                *document = LeagueDocument::reset_from(document, now);
                Ok(())
            })
            .await?;
        Ok(ActionReply::Replaced {
            message: "League data cleared".into(),
            version: modified.receipt.version,
            commit: modified.receipt.commit,
            changes: modified.document.change_summary(),
            timestamp: now,
        })
    }

    async fn register_team(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let payload: RegisterTeamPayload = request.payload(Action::RegisterTeam.name())?;
        let id = generate_id("team");
        let now = self.clock.now();
        let description = format!("Register team {}", payload.name.trim());

        let modified = self
            .modify(&description, |document| {
                Ok(standings::register_team(
                    document,
                    &payload.name,
                    &payload.owner,
                    payload.group.as_deref(),
                    id.clone(),
                    now,
                )?)
            })
            .await?;
        Ok(ActionReply::Team {
            team: modified.value,
            version: modified.receipt.version,
        })
    }

    async fn remove_team(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let payload: RemoveTeamPayload = request.payload(Action::RemoveTeam.name())?;
        let modified = self
            .modify(&format!("Remove team {}", payload.team_id), |document| {
                Ok(standings::remove_team(document, &payload.team_id)?)
            })
            .await?;
        Ok(ActionReply::Team {
            team: modified.value,
            version: modified.receipt.version,
        })
    }

    async fn schedule_match(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let payload: ScheduleMatchPayload = request.payload(Action::ScheduleMatch.name())?;
        let id = generate_id("match");
        let now = self.clock.now();
        let modified = self
            .modify("Schedule match", |document| {
                Ok(standings::schedule_match(
                    document,
                    &payload.home_team_id,
                    &payload.away_team_id,
                    payload.date.as_deref(),
                    payload.stage.as_deref(),
                    id.clone(),
                    now,
                )?)
            })
            .await?;
        Ok(ActionReply::Match {
            fixture: modified.value,
            version: modified.receipt.version,
        })
    }

    async fn record_result(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let payload: RecordResultPayload = request.payload(Action::RecordResult.name())?;
        let description = format!(
            "Record result {} {}-{}",
            payload.match_id, payload.home_score, payload.away_score
        );
        let modified = self
            .modify(&description, |document| {
                Ok(standings::record_result(
                    document,
                    &payload.match_id,
                    payload.home_score,
                    payload.away_score,
                    payload.confirmed,
                )?)
            })
            .await?;
        Ok(ActionReply::Match {
            fixture: modified.value,
            version: modified.receipt.version,
        })
    }

    async fn confirm_result(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let payload: ConfirmResultPayload = request.payload(Action::ConfirmResult.name())?;
        let modified = self
            .modify(&format!("Confirm result {}", payload.match_id), |document| {
                Ok(standings::confirm_result(document, &payload.match_id)?)
            })
            .await?;
        Ok(ActionReply::Match {
            fixture: modified.value,
            version: modified.receipt.version,
        })
    }

    async fn add_news(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let payload: NewsPayload = request.payload(Action::AddNews.name())?;
        let id = generate_id("news");
        let now = self.clock.now();
        let modified = self
            .modify("Publish news", |document| {
                Ok(standings::publish_news(
                    document,
                    &payload.title,
                    &payload.content,
                    payload.pinned,
                    id.clone(),
                    now,
                )?)
            })
            .await?;
        Ok(ActionReply::News {
            news: modified.value,
            version: modified.receipt.version,
        })
    }

    async fn standings(&self, request: &ActionRequest) -> Result<ActionReply, DispatchError> {
        let query: StandingsQuery = request.payload_or_default(Action::Standings.name())?;
        let group = query
            .group
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        let (document, version) = match self.load().await? {
            Some((document, version)) => (document, Some(version)),
            None => (LeagueDocument::default(), None),
        };
        let table = match &group {
            Some(group) => standings::project_group(&document.teams, group),
            None => standings::project(&document.teams),
        };

        Ok(ActionReply::Standings {
            group,
            standings: table.rows,
            summary: standings::summarize(&document),
            goals_conserved: standings::goals_conserved(&document),
            version,
        })
    }
}

#[async_trait]
impl ActionHandler for ActionDispatcher {
    async fn dispatch(&self, request: ActionRequest) -> Result<ActionReply, DispatchError> {
        ActionDispatcher::dispatch(self, request).await
    }

    async fn health(&self) -> HealthReport {
        ActionDispatcher::health(self).await
    }
}
