//! Action registry.
//!
//! The closed set of named actions accepted by the dispatcher, with the
//! access tier and write behaviour of each.

use std::fmt;
use std::str::FromStr;

/// Access tier of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTier {
    /// No secret required (connectivity probes only).
    Public,
    /// Requires the shared admin secret.
    Admin,
}

/// Every action the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetData,
    UpdateData,
    AddNotification,
    MarkNotificationsRead,
    Stats,
    Health,
    Backup,
    ClearData,
    RegisterTeam,
    RemoveTeam,
    ScheduleMatch,
    RecordResult,
    ConfirmResult,
    AddNews,
    Standings,
}

/// Static metadata for one action.
#[derive(Debug, Clone, Copy)]
pub struct ActionInfo {
    pub action: Action,
    /// Wire name, e.g. `get-data`.
    pub name: &'static str,
    pub tier: ActionTier,
    /// Whether the action writes to the store.
    pub is_write: bool,
    /// Whether the request must carry a `data` payload.
    pub needs_payload: bool,
}

impl ActionInfo {
    const fn read(action: Action, name: &'static str, tier: ActionTier) -> Self {
        Self {
            action,
            name,
            tier,
            is_write: false,
            needs_payload: false,
        }
    }

    const fn write(action: Action, name: &'static str, needs_payload: bool) -> Self {
        Self {
            action,
            name,
            tier: ActionTier::Admin,
            is_write: true,
            needs_payload,
        }
    }
}

/// Every action, in the order advertised to clients.
pub const ACTIONS: &[Action] = &[
    Action::GetData,
    Action::UpdateData,
    Action::AddNotification,
    Action::MarkNotificationsRead,
    Action::Stats,
    Action::Health,
    Action::Backup,
    Action::ClearData,
    Action::RegisterTeam,
    Action::RemoveTeam,
    Action::ScheduleMatch,
    Action::RecordResult,
    Action::ConfirmResult,
    Action::AddNews,
    Action::Standings,
];

impl Action {
    pub const fn info(self) -> ActionInfo {
        use Action::*;
        match self {
            // get-data may write once, to initialise an absent document.
            GetData => ActionInfo::read(GetData, "get-data", ActionTier::Admin),
            UpdateData => ActionInfo::write(UpdateData, "update-data", true),
            AddNotification => ActionInfo::write(AddNotification, "add-notification", true),
            MarkNotificationsRead => {
                ActionInfo::write(MarkNotificationsRead, "mark-notifications-read", false)
            }
            Stats => ActionInfo::read(Stats, "stats", ActionTier::Admin),
            Health => ActionInfo::read(Health, "health", ActionTier::Public),
            Backup => ActionInfo::write(Backup, "backup", false),
            ClearData => ActionInfo::write(ClearData, "clear-data", false),
            RegisterTeam => ActionInfo::write(RegisterTeam, "register-team", true),
            RemoveTeam => ActionInfo::write(RemoveTeam, "remove-team", true),
            ScheduleMatch => ActionInfo::write(ScheduleMatch, "schedule-match", true),
            RecordResult => ActionInfo::write(RecordResult, "record-result", true),
            ConfirmResult => ActionInfo::write(ConfirmResult, "confirm-result", true),
            AddNews => ActionInfo::write(AddNews, "add-news", true),
            Standings => ActionInfo::read(Standings, "standings", ActionTier::Admin),
        }
    }

    pub const fn name(self) -> &'static str {
        self.info().name
    }

    pub const fn tier(self) -> ActionTier {
        self.info().tier
    }

    pub fn lookup(name: &str) -> Option<Action> {
        ACTIONS.iter().copied().find(|action| action.name() == name)
    }
}

/// Wire names of every supported action.
pub fn supported_actions() -> Vec<&'static str> {
    ACTIONS.iter().map(|action| action.name()).collect()
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::lookup(s.trim()).ok_or_else(|| s.to_string())
    }
}
