use std::fmt;

use serde::{Deserialize, Serialize};

/// Which persona the chat session is talking to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Normal,
    Tutor,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Tutor => "tutor",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Tutor,
            Self::Tutor => Self::Normal,
        }
    }

    pub fn is_tutor(&self) -> bool {
        matches!(self, Self::Tutor)
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
