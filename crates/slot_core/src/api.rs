// JSON API layer
// One call plays a full spin plus optional respins and reports the outcome

use crate::config::SlotConfig;
use crate::error::{Result, SlotError};
use crate::machine::SlotMachine;
use crate::models::{GameState, Participant, Role, RoleWinner};
use crate::registry::{parse_names, Registry};
use serde::{Deserialize, Serialize};

// ========== Request/Response Structures ==========

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayRoundRequest {
    pub seed: Option<u64>,
    pub participants: Vec<String>,
    pub roles: Vec<String>,
    /// Role names to respin, in order, after the full spin
    #[serde(default)]
    pub respins: Vec<String>,
    #[serde(default)]
    pub config: Option<SlotConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayRoundResponse {
    pub success: bool,
    pub state: GameState,
    pub rounds: u64,
    pub results: Vec<RoleWinner>,
    pub announcement: Option<String>,
    pub error: Option<String>,
}

impl PlayRoundResponse {
    fn from_machine(machine: &SlotMachine, error: Option<String>) -> Self {
        Self {
            success: error.is_none(),
            state: machine.state(),
            rounds: machine.round(),
            results: machine.role_winners(),
            announcement: machine.announcement().map(str::to_string),
            error,
        }
    }
}

// ========== Entry Points ==========

pub fn play_round(request: PlayRoundRequest) -> Result<PlayRoundResponse> {
    let config = request.config.unwrap_or_default();
    config.validate()?;

    // Blank names are dropped, same as the bulk-add box
    let participants = request
        .participants
        .iter()
        .flat_map(|name| parse_names(name))
        .enumerate()
        .map(|(i, name)| Participant::new(format!("p{}", i + 1), name))
        .collect();
    let roles: Vec<Role> = request
        .roles
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(i, name)| Role::new(format!("r{}", i + 1), name))
        .collect();

    let registry = Registry::from_parts(participants, roles)?;
    let mut machine = SlotMachine::new(registry, config, request.seed);

    let outcome = run_rounds(&mut machine, &request.respins);
    let error = match outcome {
        Ok(()) => None,
        Err(e) if e.is_user_input() || matches!(e, SlotError::UnknownRole { .. }) => Some(e.to_string()),
        Err(e) => return Err(e),
    };
    Ok(PlayRoundResponse::from_machine(&machine, error))
}

fn run_rounds(machine: &mut SlotMachine, respins: &[String]) -> Result<()> {
    machine.spin_all()?;
    machine.run_until_settled();

    for name in respins {
        let role_id = machine
            .registry()
            .roles()
            .iter()
            .find(|r| r.name == name.trim())
            .map(|r| r.id.clone())
            .ok_or_else(|| SlotError::UnknownRole { role_id: name.clone() })?;
        machine.respin(&role_id)?;
        machine.run_until_settled();
    }
    Ok(())
}

pub fn play_round_json(request_json: &str) -> Result<String> {
    let request: PlayRoundRequest = serde_json::from_str(request_json)?;
    let response = play_round(request)?;
    Ok(serde_json::to_string(&response)?)
}
