/// Fixed ELO → rank-tier threshold table for the ranked leaderboards.

const TIERS: [&str; 5] = ["Bronze", "Silver", "Gold", "Platinum", "Diamond"];
const DIVISIONS: [&str; 5] = ["5", "4", "3", "2", "1"];

/// Map a leaderboard rating to its display tier, e.g. "Gold 3".
/// Below 400 the ladder reports no placement; 2900 and up is the top of
/// Masters regardless of margin.
pub fn elo_to_rank(elo: f64) -> String {
    let elo = elo as i64;

    if elo < 0 {
        return "Invalid Elo".to_owned();
    }
    if elo < 400 {
        return "Unranked".to_owned();
    }
    if elo >= 2900 {
        return "Masters 1".to_owned();
    }
    if elo >= 2500 {
        let division = (5 - (elo - 2500) / 100).clamp(1, 5);
        return format!("Masters {division}");
    }

    let tier = TIERS[((elo / 500) as usize).min(4)];
    let division = DIVISIONS[((elo % 500) / 100) as usize];
    format!("{tier} {division}")
}
