//! Plain-terminal reel display

use slot_core::{Notice, Participant, ReelView, SlotMachine};
use std::io::{self, Write};

const REEL_WIDTH: usize = 22;

fn cell(view: &ReelView) -> String {
    let mut text: String = view.label.text().chars().take(REEL_WIDTH).collect();
    let pad = REEL_WIDTH.saturating_sub(text.chars().count());
    text.push_str(&" ".repeat(pad));
    let marker = if view.spinning { '~' } else { ' ' };
    format!("{marker}[{text}]{marker}")
}

pub fn header(machine: &SlotMachine) -> String {
    machine
        .reel_views()
        .iter()
        .map(|v| {
            let name: String = v.role.chars().take(REEL_WIDTH + 4).collect();
            format!("{:<width$}", name, width = REEL_WIDTH + 4)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per participant, avatar initials first.
pub fn roster(participants: &[Participant]) -> String {
    if participants.is_empty() {
        return "(no participants)".to_string();
    }
    participants
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>3}. ({:<2}) {}", i + 1, p.initials(), p.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn strip(machine: &SlotMachine) -> String {
    machine.reel_views().iter().map(cell).collect::<Vec<_>>().join(" ")
}

/// Redraw the reel line in place, printing notices on their own lines.
pub fn frame(out: &mut impl Write, machine: &SlotMachine, notices: &[Notice]) -> io::Result<()> {
    for notice in notices {
        if let Some(line) = describe(notice) {
            writeln!(out, "\r{:<80}", line)?;
        }
    }
    write!(out, "\r{}", strip(machine))?;
    out.flush()
}

fn describe(notice: &Notice) -> Option<String> {
    match notice {
        Notice::Stopping { .. } => Some("Power off, reels are slowing down...".to_string()),
        Notice::ReelLanded { winner: Some(winner), .. } => Some(format!("  -> {winner}")),
        Notice::ReelLanded { winner: None, .. } => None,
        Notice::RoundComplete { round } => Some(format!("Round {round} complete")),
        Notice::Announcement(text) => Some(format!("\"{text}\"")),
        Notice::ConfirmExpired => None,
    }
}
