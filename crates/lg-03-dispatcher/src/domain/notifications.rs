//! Notification log nested in the league document.
//!
//! Most recent first. The only bulk mutation is mark-all-read. Appends beyond
//! the retention cap silently drop the oldest entries.

use shared_types::Notification;

/// Default number of notifications retained.
pub const DEFAULT_NOTIFICATION_CAP: usize = 100;

/// View over the `adminNotifications` sequence of a document.
pub struct NotificationLog<'a> {
    entries: &'a mut Vec<Notification>,
    cap: usize,
}

impl<'a> NotificationLog<'a> {
    /// `cap` below one is treated as one.
    pub fn new(entries: &'a mut Vec<Notification>, cap: usize) -> Self {
        Self {
            entries,
            cap: cap.max(1),
        }
    }

    /// Put `notification` at the head. Returns how many old entries were
    /// discarded to honour the cap.
    pub fn push(&mut self, notification: Notification) -> usize {
        self.entries.insert(0, notification);
        let excess = self.entries.len().saturating_sub(self.cap);
        self.entries.truncate(self.cap);
        excess
    }

    /// Set every `read` flag. Order is untouched. Returns the number of
    /// entries that were unread.
    pub fn mark_all_read(&mut self) -> usize {
        let mut marked = 0;
        for entry in self.entries.iter_mut().filter(|n| !n.read) {
            entry.read = true;
            marked += 1;
        }
        marked
    }

    pub fn unread(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
