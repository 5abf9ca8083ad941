use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raffle entrant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }

    /// Participant with a fresh random id
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), name)
    }

    /// Avatar label: first letter of each word, at most two, uppercased.
    pub fn initials(&self) -> String {
        self.name
            .split(' ')
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(Participant::new("1", "Il Conte di Arcore").initials(), "IC");
        assert_eq!(Participant::new("2", "oh yang").initials(), "OY");
        assert_eq!(Participant::new("3", "Dynantico").initials(), "D");
        assert_eq!(Participant::new("4", "").initials(), "");
    }

    #[test]
    fn test_named_ids_are_unique() {
        let a = Participant::named("Same");
        let b = Participant::named("Same");
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, b.name);
    }
}
