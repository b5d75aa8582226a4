// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;

use tokio::sync::oneshot;

/// Correlates outbound confirmation requests with their asynchronous replies.
///
/// Each request gets its own correlation id and resolver, queued FIFO, so
/// concurrent confirmations cannot cross-resolve. A reply without an id
/// resolves the oldest pending request; a reply matching nothing is ignored.
#[derive(Debug, Default)]
pub struct DialogBridge {
    next_id: u64,
    pending: VecDeque<(u64, oneshot::Sender<bool>)>,
}

impl DialogBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new pending confirmation and returns its correlation id
    /// plus the receiver that resolves exactly once with the reply.
    pub fn request(&mut self) -> (u64, oneshot::Receiver<bool>) {
        self.next_id += 1;
        let id = self.next_id;
        let (sender, receiver) = oneshot::channel();
        self.pending.push_back((id, sender));
        (id, receiver)
    }

    /// Delivers a reply. Returns `false` when no pending request matched.
    pub fn resolve(&mut self, id: Option<u64>, result: bool) -> bool {
        let index = match id {
            Some(id) => self
                .pending
                .iter()
                .position(|(pending_id, _)| *pending_id == id),
            None if self.pending.is_empty() => None,
            None => Some(0),
        };
        let Some(index) = index else {
            return false;
        };
        let Some((_, sender)) = self.pending.remove(index) else {
            return false;
        };
        // The caller may have dropped its receiver; that is not an error.
        let _ = sender.send(result);
        true
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drops all pending resolvers, e.g. when the owning session closes.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
