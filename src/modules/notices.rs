// Transient user-facing notifications (what a snackbar would show).
// Owned by whoever runs the interaction, never a global.

use std::collections::VecDeque;

const MAX_NOTICES: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    queue: VecDeque<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a notice, dropping the oldest once the board is full.
    pub fn push(&mut self, notice: Notice) {
        self.queue.push_back(notice);
        if self.queue.len() > MAX_NOTICES {
            self.queue.pop_front();
        }
    }

    /// Next notice to show (FIFO)
    pub fn pop_next(&mut self) -> Option<Notice> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }
}
