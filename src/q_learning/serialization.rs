//! Serialization support for trained agents.
//!
//! Agents are persisted as versioned MessagePack snapshots. The simulation
//! core itself performs no I/O; persistence lives here and in the CLI.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    features::build_extractor,
    q_learning::agent::{AgentState, QLearningAgent},
};

/// Metadata recorded alongside a trained agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Board edge length the agent was trained on
    pub board_size: Option<usize>,
    /// Number of trials trained
    pub trials_trained: Option<usize>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Timestamp when saved
    pub saved_at: Option<String>,
}

/// Serializable representation of a trained agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    /// Version of the save format (for future compatibility)
    pub version: u32,
    state: AgentState,
    /// Training metadata
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            state: agent.export_state(),
            metadata,
        }
    }

    /// Reconstruct the agent, rebuilding its feature extractor by name.
    pub fn to_agent(&self) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }

        let extractor = build_extractor(&self.state.extractor)
            .ok_or_else(|| anyhow!("Unknown feature extractor: '{}'", self.state.extractor))?;

        Ok(QLearningAgent::from_state(self.state.clone(), extractor))
    }

    pub fn extractor_name(&self) -> &str {
        &self.state.extractor
    }

    pub fn weight_count(&self) -> usize {
        self.state.weights.len()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize agent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gomoku::{BoardState, Player},
        ports::Learner,
        types::Position,
    };

    fn trained_agent() -> QLearningAgent {
        let mut agent = QLearningAgent::new().with_seed(7);
        let board = BoardState::new(8)
            .place(Position::new(3, 3), Player::Black)
            .unwrap()
            .place(Position::new(4, 4), Player::White)
            .unwrap();
        agent.select_action(&board);
        agent.incorporate_feedback(&board, Position::new(3, 4), 5000.0, None);
        agent
    }

    #[test]
    fn test_roundtrip_preserves_weights_and_counter() -> Result<()> {
        let agent = trained_agent();
        assert!(agent.weight_count() > 0);

        let saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        let bytes = rmp_serde::to_vec(&saved)?;
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes)?;
        let restored = loaded.to_agent()?;

        assert_eq!(restored.weight_count(), agent.weight_count());
        assert_eq!(restored.num_iters(), agent.num_iters());
        assert_eq!(restored.weights(), agent.weights());
        assert_eq!(restored.extractor_name(), agent.extractor_name());
        Ok(())
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let agent = trained_agent();
        let mut saved = SavedAgent::from_agent(&agent, TrainingMetadata::default());
        saved.version = 99;
        let err = saved.to_agent().unwrap_err();
        assert!(err.to_string().contains("Unsupported save format version"));
    }

    #[test]
    fn test_metadata_survives_roundtrip() -> Result<()> {
        let metadata = TrainingMetadata {
            board_size: Some(8),
            trials_trained: Some(200),
            seed: Some(42),
            saved_at: None,
        };
        let saved = SavedAgent::from_agent(&trained_agent(), metadata);
        let bytes = rmp_serde::to_vec(&saved)?;
        let loaded: SavedAgent = rmp_serde::from_slice(&bytes)?;

        assert_eq!(loaded.metadata.board_size, Some(8));
        assert_eq!(loaded.metadata.trials_trained, Some(200));
        assert_eq!(loaded.metadata.seed, Some(42));
        Ok(())
    }
}
