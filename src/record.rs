//! The [MatchRow] is one team's participation in one week. A regular game yields a mirrored pair
//! of rows; a bye yields a single row with no opponent and no score.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub week: u32,
    pub team: String,
    #[serde(default)]
    pub opponent: Opponent,
    pub score: Option<f64>,
    pub opponent_score: Option<f64>,
}
impl MatchRow {
    pub fn game(
        week: u32,
        team: impl Into<String>,
        opponent: impl Into<String>,
        score: Option<f64>,
        opponent_score: Option<f64>,
    ) -> Self {
        Self {
            week,
            team: team.into(),
            opponent: Opponent::Team(opponent.into()),
            score,
            opponent_score,
        }
    }

    pub fn bye(week: u32, team: impl Into<String>) -> Self {
        Self {
            week,
            team: team.into(),
            opponent: Opponent::Bye,
            score: None,
            opponent_score: None,
        }
    }

    /// The row as seen from the opponent's side, or `None` for a bye.
    pub fn mirrored(&self) -> Option<MatchRow> {
        match &self.opponent {
            Opponent::Team(opponent) => Some(MatchRow {
                week: self.week,
                team: opponent.clone(),
                opponent: Opponent::Team(self.team.clone()),
                score: self.opponent_score,
                opponent_score: self.score,
            }),
            Opponent::Bye => None,
        }
    }

    /// Win credit of this row: 1.0 for a win, 0.5 for a tie, 0.0 for a loss. A row with a missing
    /// score on either side, or one where both sides scored zero, is not a result and yields 0.0.
    pub fn result(&self) -> f64 {
        match (self.score, self.opponent_score) {
            (Some(score), Some(opponent_score)) if score + opponent_score > 0.0 => {
                if score > opponent_score {
                    Outcome::Win.credit()
                } else if score == opponent_score {
                    Outcome::Tie.credit()
                } else {
                    Outcome::Loss.credit()
                }
            }
            _ => 0.0,
        }
    }

    /// The outcome re-derived from [result](Self::result), or `None` if the team did not score.
    pub fn outcome(&self) -> Option<Outcome> {
        self.score.map(|_| Outcome::from_credit(self.result()))
    }

    pub fn is_bye(&self) -> bool {
        matches!(self.opponent, Opponent::Bye)
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Opponent {
    Team(String),
    #[default]
    Bye,
}
impl Opponent {
    pub fn name(&self) -> Option<&str> {
        match self {
            Opponent::Team(name) => Some(name),
            Opponent::Bye => None,
        }
    }
}

impl From<Option<String>> for Opponent {
    fn from(name: Option<String>) -> Self {
        match name {
            Some(name) if !name.trim().is_empty() && !name.trim().eq_ignore_ascii_case("bye") => {
                Opponent::Team(name)
            }
            _ => Opponent::Bye,
        }
    }
}

impl From<Opponent> for Option<String> {
    fn from(opponent: Opponent) -> Self {
        match opponent {
            Opponent::Team(name) => Some(name),
            Opponent::Bye => None,
        }
    }
}

impl Display for Opponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Opponent::Team(name) => write!(f, "{name}"),
            Opponent::Bye => write!(f, "BYE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Tie,
    Loss,
}
impl Outcome {
    pub fn credit(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Tie => 0.5,
            Outcome::Loss => 0.0,
        }
    }

    pub fn from_credit(credit: f64) -> Self {
        if credit >= 1.0 {
            Outcome::Win
        } else if credit >= 0.5 {
            Outcome::Tie
        } else {
            Outcome::Loss
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Outcome::Win => "W",
            Outcome::Tie => "T",
            Outcome::Loss => "L",
        };
        write!(f, "{symbol}")
    }
}
