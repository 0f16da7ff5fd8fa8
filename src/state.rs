//! The two visual states of the tree.

use serde::{Deserialize, Serialize};

/// Which formation the scene is heading toward.
///
/// Owned by the application and toggled only by explicit user action.
/// Animation code reads it once per frame through [`TreeState::target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TreeState {
    /// Scattered cloud; progress heads toward 0.
    #[default]
    Chaos,
    /// Assembled tree; progress heads toward 1.
    Formed,
}

impl TreeState {
    /// Progress value this state pulls every record toward.
    #[inline]
    pub fn target(self) -> f32 {
        match self {
            TreeState::Chaos => 0.0,
            TreeState::Formed => 1.0,
        }
    }

    /// The other state.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            TreeState::Chaos => TreeState::Formed,
            TreeState::Formed => TreeState::Chaos,
        }
    }

    /// Label of the action that leaves this state.
    pub fn action_label(self) -> &'static str {
        match self {
            TreeState::Chaos => "Assemble",
            TreeState::Formed => "Scatter",
        }
    }
}
