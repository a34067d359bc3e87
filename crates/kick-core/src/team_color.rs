use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two sides of a match. Each side defends the goal of its own color:
/// yellow's goal is at `x = 0`, blue's at `x = width`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Yellow,
    Blue,
}

impl TeamColor {
    pub fn opponent(&self) -> TeamColor {
        match self {
            TeamColor::Blue => TeamColor::Yellow,
            TeamColor::Yellow => TeamColor::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamColor::Yellow => "yellow",
            TeamColor::Blue => "blue",
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(TeamColor::Yellow.opponent(), TeamColor::Blue);
        assert_eq!(TeamColor::Blue.opponent(), TeamColor::Yellow);
    }
}
