use std::collections::BTreeMap;
use std::str::FromStr;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Opaque scheduler-assigned job identifier.
pub type JobId = String;

/// Task name -> raw dependency expression.
pub type DependencyMap = BTreeMap<TaskName, String>;

/// Task name -> user submission command.
pub type CommandMap = BTreeMap<TaskName, String>;

/// Direction of the rendered graph layout (Graphviz `rankdir`).
///
/// Besides the Graphviz spellings, a few human aliases are accepted:
/// `right`, `left`, `down`, `up` and their `-ward(s)` forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir {
    LeftRight,
    RightLeft,
    TopBottom,
    BottomTop,
}

impl Default for RankDir {
    fn default() -> Self {
        RankDir::LeftRight
    }
}

impl RankDir {
    /// Graphviz attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            RankDir::LeftRight => "LR",
            RankDir::RightLeft => "RL",
            RankDir::TopBottom => "TB",
            RankDir::BottomTop => "BT",
        }
    }
}

impl FromStr for RankDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lr" | "r" | "right" | "forward" | "forwards" => Ok(RankDir::LeftRight),
            "rl" | "l" | "left" | "backward" | "backwards" => Ok(RankDir::RightLeft),
            "tb" | "d" | "down" | "downward" | "downwards" => Ok(RankDir::TopBottom),
            "bt" | "u" | "up" | "upward" | "upwards" => Ok(RankDir::BottomTop),
            other => Err(format!(
                "invalid rankdir: {other} (expected LR, RL, TB or BT)"
            )),
        }
    }
}
