/// Match parser/aggregator: turns one raw match record plus the two
/// registries into a fully derived `Match`.
///
/// Only a missing match id or state is fatal. Every other absent field
/// degrades to a documented default, because the feed omits fields
/// inconsistently across match states (open vs in-progress vs completed).
use crate::client::{ApiError, ApiResult};
use crate::dokken::{EndOfMatchStats, MatchRecord, ParticipantEntry, RankedReturnData, ServerData};
use crate::registry::{CharacterRegistry, MapRegistry};
use crate::{Match, Player};
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

const STAT_DAMAGE_DEALT: &str = "Stat:Game:Character:TotalDamageDealt";
const STAT_DAMAGE_TAKEN: &str = "Stat:Game:Character:TotalDamageTaken";
const STAT_RINGOUTS: &str = "Stat:Game:Character:TotalRingouts";
const STAT_RINGOUTS_RECEIVED: &str = "Stat:Game:Character:TotalRingoutsReceived";

/// Index meaning "unassigned" when the feed left a slot out.
pub const UNASSIGNED: i64 = -1;

/// Parse one raw match record.
///
/// Derivation order is fixed: state → map → mode → players → score →
/// winning team → set score. Later steps read earlier results, and the
/// winner flags are corrected before the value is returned, so a caller
/// never observes a partially derived `Match`.
///
/// Assumption carried from the feed: the match-level `Score` and
/// `WinningTeamIndex` are stored redundantly on every participant entry
/// and only the first entry is consulted.
pub fn parse_match(
    raw: &MatchRecord,
    characters: &CharacterRegistry,
    maps: &MapRegistry,
) -> ApiResult<Match> {
    let match_id = raw
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::MalformedMatch("match record has no id".into()))?
        .to_owned();
    let state = raw
        .state
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::MalformedMatch(format!("match {match_id} has no state")))?
        .to_owned();

    let server_data = raw.server_data.as_ref();
    let config = server_data.and_then(|s| s.gameplay_config.as_ref());

    let map = maps.resolve(config.and_then(|c| c.map.as_deref()).unwrap_or(""));
    let mode = config
        .and_then(|c| c.mode_string.clone())
        .unwrap_or_default();

    let participants: &[ParticipantEntry] = raw
        .players
        .as_ref()
        .and_then(|p| p.all.as_deref())
        .unwrap_or_default();

    let mut players: Vec<Player> = config
        .and_then(|c| c.players.as_ref())
        .map(|slots| {
            slots
                .iter()
                .map(|(account_id, slot)| {
                    let mut player = Player {
                        account_id: account_id.clone(),
                        username: username_for(participants, account_id),
                        character: characters
                            .resolve(slot.character_slug.as_deref().unwrap_or("Unknown")),
                        team_index: slot.team_index.unwrap_or(UNASSIGNED),
                        player_index: slot.player_index.unwrap_or(UNASSIGNED),
                        perks: slot.perks.clone().unwrap_or_default(),
                        ..Default::default()
                    };
                    apply_stats(&mut player, stats_for(participants, account_id));
                    apply_ranked(&mut player, ranked_for(server_data, account_id));
                    player
                })
                .collect()
        })
        .unwrap_or_default();

    // The raw slot map is an unordered JSON object; sort for determinism.
    players.sort_by(|a, b| {
        (a.team_index, a.player_index, &a.account_id)
            .cmp(&(b.team_index, b.player_index, &b.account_id))
    });

    let first_stats = participants
        .first()
        .and_then(|p| p.data.as_ref())
        .and_then(|d| d.end_of_match_stats.as_ref());

    let score = first_stats.and_then(|s| s.score.clone());

    let winning_team_index = first_stats.and_then(|s| s.winning_team_index);
    if let Some(winner) = winning_team_index {
        for player in &mut players {
            player.is_winner = player.team_index == winner;
        }
    }

    let match_set = server_data.and_then(|s| s.match_set.as_ref());
    let previous_set_score = match_set
        .and_then(|s| s.score.as_deref())
        .map(|s| [s.first().copied().unwrap_or(0), s.get(1).copied().unwrap_or(0)])
        .unwrap_or([0, 0]);
    let previous_games = match_set
        .and_then(|s| s.prior_matches.clone())
        .unwrap_or_default();

    let mut current_set_score = previous_set_score;
    if let Some(winner) = winning_team_index {
        if let Some(slot) = current_set_score.get_mut(winner as usize) {
            *slot += 1;
        }
    }

    debug!("parsed match {match_id}: {} players, state {state}", players.len());

    Ok(Match {
        match_id,
        state,
        map,
        mode,
        players,
        score,
        previous_set_score,
        current_set_score,
        previous_games,
        winning_team_index,
    })
}

/// Display name from the participant list, scanning by account id.
/// `identity.alternate.wb_network[0].username`, or "Unknown".
fn username_for(participants: &[ParticipantEntry], account_id: &str) -> String {
    participants
        .iter()
        .find(|p| p.account_id.as_deref() == Some(account_id))
        .and_then(|p| p.identity.as_ref())
        .and_then(|i| i.wb_username())
        .unwrap_or("Unknown")
        .to_owned()
}

/// The per-character stat map for one account, from that participant's own
/// end-of-match entry.
fn stats_for<'a>(
    participants: &'a [ParticipantEntry],
    account_id: &str,
) -> Option<&'a HashMap<String, Value>> {
    participants
        .iter()
        .find(|p| p.account_id.as_deref() == Some(account_id))
        .and_then(|p| p.data.as_ref())
        .and_then(|d| d.end_of_match_stats.as_ref())
        .and_then(|s: &EndOfMatchStats| s.player_mission_updates.as_ref())
        .and_then(|updates| updates.get(account_id))
}

fn ranked_for<'a>(
    server_data: Option<&'a ServerData>,
    account_id: &str,
) -> Option<&'a RankedReturnData> {
    server_data?
        .client_return_data
        .as_ref()?
        .values()
        .find_map(|entry| {
            entry
                .account_id_to_return_data
                .as_ref()?
                .get(account_id)?
                .ranked
                .as_ref()
        })
}

/// Stats may legitimately be absent for spectators or disconnected
/// players, so every counter defaults to zero.
fn apply_stats(player: &mut Player, stats: Option<&HashMap<String, Value>>) {
    let stat = |key: &str| -> f64 {
        stats
            .and_then(|s| s.get(key))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };
    player.damage_dealt = stat(STAT_DAMAGE_DEALT);
    player.damage_taken = stat(STAT_DAMAGE_TAKEN);
    player.ringouts = stat(STAT_RINGOUTS).max(0.0) as u32;
    player.ringouts_received = stat(STAT_RINGOUTS_RECEIVED).max(0.0) as u32;
}

/// Ranked return data is absent for unranked matches by design.
fn apply_ranked(player: &mut Player, ranked: Option<&RankedReturnData>) {
    if let Some(ranked) = ranked {
        player.rp_delta = ranked.rp_delta;
        player.total_games_played = ranked.total_games_played_for_mode;
        player.total_sets_played = ranked.total_sets_played_for_mode;
    }
}
