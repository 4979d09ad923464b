/// Raw wire types for the dokken backend (`dokken-api.wbagora.com`).
/// Every field is optional or defaulted: the feed omits fields
/// inconsistently across match states, and decoding must never fail on
/// absent data. These map to the clean domain types via `parse.rs`.
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Auth  (POST access)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AccessResponse {
    pub token: Option<String>,
}

// ---------------------------------------------------------------------------
// Accounts / profiles / search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AccountResponse {
    pub identity: Option<Identity>,
}

/// Shared identity shape: also embedded in each match participant entry.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Identity {
    pub alternate: Option<AlternateIdentity>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AlternateIdentity {
    pub wb_network: Option<Vec<WbNetworkIdentity>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WbNetworkIdentity {
    pub username: Option<String>,
}

impl Identity {
    /// Display name at `alternate.wb_network[0].username`, if present.
    pub fn wb_username(&self) -> Option<&str> {
        self.alternate
            .as_ref()?
            .wb_network
            .as_ref()?
            .first()?
            .username
            .as_deref()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchResponse {
    pub results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchResult {
    pub result: Option<SearchResultBody>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SearchResultBody {
    pub account_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Leaderboards  (score-and-rank)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RankResponse {
    pub score: Option<f64>,
    pub rank: Option<i64>,
}

// ---------------------------------------------------------------------------
// Match record  (matches/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchRecord {
    pub id: Option<String>,
    pub state: Option<String>,
    pub server_data: Option<ServerData>,
    pub players: Option<MatchParticipants>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ServerData {
    pub gameplay_config: Option<GameplayConfig>,
    pub match_set: Option<MatchSet>,
    /// Keyed by an opaque per-mode key; scanned, never addressed directly.
    pub client_return_data: Option<HashMap<String, ClientReturnEntry>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct GameplayConfig {
    pub map: Option<String>,
    pub mode_string: Option<String>,
    /// Keyed by account id.
    pub players: Option<HashMap<String, PlayerConfig>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerConfig {
    pub character_slug: Option<String>,
    pub team_index: Option<i64>,
    pub player_index: Option<i64>,
    pub perks: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct MatchSet {
    /// Set score entering this game.
    pub score: Option<Vec<i64>>,
    /// Ids of earlier games within the set.
    pub prior_matches: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ClientReturnEntry {
    pub account_id_to_return_data: Option<HashMap<String, ReturnData>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ReturnData {
    /// Present only for ranked matches.
    pub ranked: Option<RankedReturnData>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RankedReturnData {
    pub rp_delta: Option<i64>,
    pub total_games_played_for_mode: Option<i64>,
    pub total_sets_played_for_mode: Option<i64>,
    pub season: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchParticipants {
    pub all: Option<Vec<ParticipantEntry>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ParticipantEntry {
    pub account_id: Option<String>,
    pub identity: Option<Identity>,
    pub data: Option<ParticipantData>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ParticipantData {
    pub end_of_match_stats: Option<EndOfMatchStats>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct EndOfMatchStats {
    /// The feed stores the match-level score redundantly on every entry.
    pub score: Option<Vec<i64>>,
    pub winning_team_index: Option<i64>,
    /// account id → stat name → value. Values are kept raw because the
    /// feed mixes numeric and non-numeric stats in the same map.
    pub player_mission_updates: Option<HashMap<String, HashMap<String, Value>>>,
}
