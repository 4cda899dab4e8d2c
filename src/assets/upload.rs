/// Independent upload inputs of the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadSlot {
    Background,
    Overlay,
}

/// Handle for one in-flight decode. Only the most recent ticket of a slot is honored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadTicket {
    slot: UploadSlot,
    seq: u64,
}

impl UploadTicket {
    pub fn slot(self) -> UploadSlot {
        self.slot
    }
}

/// Cancel-and-replace bookkeeping for asynchronous file decodes.
///
/// Starting an upload supersedes whatever was in flight on the same slot; a completion carrying a
/// superseded ticket must be dropped by the caller.
#[derive(Clone, Debug, Default)]
pub struct UploadTracker {
    next_seq: u64,
    background: Option<u64>,
    overlay: Option<u64>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, slot: UploadSlot) -> UploadTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        if let Some(prev) = self.current_mut(slot).replace(seq) {
            tracing::debug!(?slot, superseded = prev, by = seq, "upload superseded");
        }
        UploadTicket { slot, seq }
    }

    /// Whether `ticket` is still the live upload for its slot.
    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        match ticket.slot {
            UploadSlot::Background => self.background == Some(ticket.seq),
            UploadSlot::Overlay => self.overlay == Some(ticket.seq),
        }
    }

    /// Retire `ticket`. Returns `false` when it was superseded (or already finished).
    pub fn finish(&mut self, ticket: UploadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        *self.current_mut(ticket.slot) = None;
        true
    }

    pub fn in_flight(&self, slot: UploadSlot) -> bool {
        match slot {
            UploadSlot::Background => self.background.is_some(),
            UploadSlot::Overlay => self.overlay.is_some(),
        }
    }

    fn current_mut(&mut self, slot: UploadSlot) -> &mut Option<u64> {
        match slot {
            UploadSlot::Background => &mut self.background,
            UploadSlot::Overlay => &mut self.overlay,
        }
    }
}
