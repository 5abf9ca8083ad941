//! Celebratory summary of a finished round

use crate::models::RoleWinner;
use rand::seq::SliceRandom;
use rand::Rng;

pub const INTROS: [&str; 5] = [
    "The reels have stopped! The winners are:",
    "Jackpot alert! Check out who won:",
    "Ladies and Gentlemen, the slots have decided:",
    "The symbols have aligned:",
    "Fortune favors the bold! Winners are:",
];

pub const NO_WINNERS: &str = "No winners selected.";

const SEPARATOR: &str = " | ";

/// `"<intro> <role>: <winner> | <role>: <winner>"`
pub fn generate_announcement<R: Rng + ?Sized>(results: &[RoleWinner], rng: &mut R) -> String {
    if results.is_empty() {
        return NO_WINNERS.to_string();
    }

    let intro = INTROS.choose(rng).copied().unwrap_or(INTROS[0]);
    let details = results
        .iter()
        .map(|r| format!("{}: {}", r.role, r.winner))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    format!("{} {}", intro, details)
}
