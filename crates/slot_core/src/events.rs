/// Timer payloads scheduled by the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEvent {
    /// Cycling time for the round is over
    SpinElapsed { round: u64 },
    ReelTick { role_id: String },
    ReelLanding { role_id: String, round: u64 },
    AnnouncementReady { round: u64, text: String },
    ConfirmExpired,
}

/// What happened while the machine advanced, in firing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Stopping { round: u64 },
    ReelLanded { role_id: String, winner: Option<String> },
    RoundComplete { round: u64 },
    Announcement(String),
    ConfirmExpired,
}
