/// Human-readable renderings of a parsed `Match`.
///
/// While a match is open or in progress the winner flags carry no
/// information, so the summary renders fixed team sections instead of
/// implying a result.
use crate::{Match, Player};

/// Multi-line match summary: header, then team sections while the match is
/// live, winners and losers once it has settled.
pub fn format_match_summary(m: &Match) -> String {
    let mut out = String::new();
    out.push_str(&format!("Map: {}\n", m.map));
    out.push_str(&format!("Mode: {}\n", m.mode));
    out.push_str(&format!("State: {}\n", m.state));
    out.push_str(&format!(
        "Set score: {} - {}\n",
        m.current_set_score[0], m.current_set_score[1]
    ));
    if let Some(score) = &m.score {
        let rendered: Vec<String> = score.iter().map(i64::to_string).collect();
        out.push_str(&format!("Score: {}\n", rendered.join(" - ")));
    }

    if m.is_settled() {
        push_section(&mut out, "Winners", &m.winners());
        push_section(&mut out, "Losers", &m.losers());
    } else {
        let by_team = |idx: i64| -> Vec<&Player> {
            m.players.iter().filter(|p| p.team_index == idx).collect()
        };
        push_section(&mut out, "Team 1", &by_team(0));
        push_section(&mut out, "Team 2", &by_team(1));
    }
    out
}

/// One detail block per player, in match order.
pub fn format_player_summary(m: &Match) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(m.players.len());
    for p in &m.players {
        let mut block = String::new();
        block.push_str(&format!("{} ({})\n", p.username, p.character.name));
        block.push_str(&format!("  Team: {}  Slot: {}\n", p.team_index, p.player_index));
        if m.is_settled() {
            block.push_str(&format!(
                "  Result: {}\n",
                if p.is_winner { "won" } else { "lost" }
            ));
        }
        block.push_str(&format!(
            "  Damage: {:.1} dealt, {:.1} taken\n",
            p.damage_dealt, p.damage_taken
        ));
        block.push_str(&format!(
            "  Ringouts: {} scored, {} received\n",
            p.ringouts, p.ringouts_received
        ));
        if !p.perks.is_empty() {
            block.push_str(&format!("  Perks: {}\n", p.perks.join(", ")));
        }
        if let Some(rp) = p.rp_delta {
            block.push_str(&format!("  RP: {rp:+}\n"));
        }
        if let (Some(games), Some(sets)) = (p.total_games_played, p.total_sets_played) {
            block.push_str(&format!("  Mode totals: {games} games, {sets} sets\n"));
        }
        blocks.push(block);
    }
    blocks.join("\n")
}

fn push_section(out: &mut String, label: &str, players: &[&Player]) {
    out.push_str(&format!("\n{label}:\n"));
    for p in players {
        out.push_str(&format!("  {} ({})\n", p.username, p.character.name));
    }
}
