pub mod client;
pub mod dokken;
pub mod format;
pub mod parse;
pub mod rank;
pub mod registry;
pub mod user;

pub use client::{ApiError, ApiResult, MvsApi};
pub use registry::{CharacterRegistry, MapRegistry};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the dokken wire format
// ---------------------------------------------------------------------------

/// A playable character descriptor from the embedded character table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    /// Backend identifier, e.g. "character_batman".
    pub slug: String,
    /// Discord emote markup carried from the original bot integration.
    pub emote: String,
}

/// One participant of a parsed match.
///
/// Counters default to zero when the feed omits them (spectators and
/// disconnected players legitimately have no end-of-match stats). The
/// ranked fields are `None` for unranked matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub account_id: String,
    pub username: String,
    pub character: Character,
    /// `-1` when the feed left the slot unassigned.
    pub team_index: i64,
    /// `-1` when the feed left the slot unassigned.
    pub player_index: i64,
    pub perks: Vec<String>,
    pub is_winner: bool,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub ringouts: u32,
    pub ringouts_received: u32,
    pub rp_delta: Option<i64>,
    pub total_games_played: Option<i64>,
    pub total_sets_played: Option<i64>,
}

/// A fully parsed match record.
///
/// Only ever produced complete: `parse::parse_match` either yields a value
/// with every derivation step applied or fails outright.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    pub match_id: String,
    /// Backend state string, e.g. "open", "in_progress", "complete".
    pub state: String,
    pub map: String,
    /// Free-form mode string from the feed, e.g. "2v2_ranked".
    pub mode: String,
    pub players: Vec<Player>,
    /// End-of-match per-team score; `None` while the match is running.
    pub score: Option<Vec<i64>>,
    pub previous_set_score: [i64; 2],
    pub current_set_score: [i64; 2],
    /// Ids of earlier games within the current set.
    pub previous_games: Vec<String>,
    pub winning_team_index: Option<i64>,
}

impl Match {
    /// Whether the match has run to completion. Winner data is meaningless
    /// before this returns true.
    pub fn is_settled(&self) -> bool {
        !matches!(self.state.as_str(), "open" | "in_progress")
    }

    pub fn winners(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_winner).collect()
    }

    pub fn losers(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| !p.is_winner).collect()
    }

    /// Players grouped by team index. Group order is first-seen team index,
    /// insertion order within a group is preserved.
    pub fn teams(&self) -> Vec<(i64, Vec<&Player>)> {
        let mut groups: Vec<(i64, Vec<&Player>)> = Vec::new();
        for player in &self.players {
            match groups.iter_mut().find(|(idx, _)| *idx == player.team_index) {
                Some((_, members)) => members.push(player),
                None => groups.push((player.team_index, vec![player])),
            }
        }
        groups
    }

    /// Fetch a raw match record by id and run the full parse through the
    /// client's registries.
    pub async fn from_id(api: &MvsApi, match_id: &str) -> ApiResult<Match> {
        api.match_by_id(match_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(account_id: &str, team_index: i64, is_winner: bool) -> Player {
        Player {
            account_id: account_id.to_owned(),
            team_index,
            is_winner,
            ..Default::default()
        }
    }

    #[test]
    fn winners_and_losers_partition_the_players() {
        let m = Match {
            players: vec![player("a", 0, true), player("b", 1, false), player("c", 0, true)],
            ..Default::default()
        };
        assert_eq!(m.winners().len() + m.losers().len(), m.players.len());
        assert!(m.winners().iter().all(|p| p.is_winner));
        assert!(m.losers().iter().all(|p| !p.is_winner));
    }

    #[test]
    fn teams_group_in_first_seen_order() {
        let m = Match {
            players: vec![player("a", 1, false), player("b", 0, false), player("c", 1, false)],
            ..Default::default()
        };
        let teams = m.teams();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].0, 1);
        assert_eq!(teams[0].1.len(), 2);
        assert_eq!(teams[1].0, 0);
    }

    #[test]
    fn open_and_in_progress_are_not_settled() {
        for state in ["open", "in_progress"] {
            let m = Match { state: state.into(), ..Default::default() };
            assert!(!m.is_settled(), "{state} should not be settled");
        }
        let m = Match { state: "complete".into(), ..Default::default() };
        assert!(m.is_settled());
    }
}
