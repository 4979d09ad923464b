/// A player account with its fetched payloads. Constructed only through
/// the async factories so a `User` always carries a resolved username.
use crate::client::{ApiResult, MvsApi};
use crate::dokken::AccountResponse;
use crate::rank::elo_to_rank;
use crate::{ApiError, Match};
use serde_json::Value;

pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
pub const CURRENT_RANKED_SEASON: u32 = 2;

#[derive(Debug, Clone)]
pub struct User {
    pub account_id: String,
    pub username: String,
    pub account_data: AccountResponse,
    /// Raw profile payload; large and schema-unstable, kept opaque.
    pub profile_data: Value,
}

impl User {
    pub async fn from_id(api: &MvsApi, account_id: &str) -> ApiResult<User> {
        let account_data = api.account(account_id).await?;
        let profile_data = api.profile(account_id).await?;
        let username = account_data
            .identity
            .as_ref()
            .and_then(|i| i.wb_username())
            .map(str::to_owned)
            .ok_or_else(|| {
                ApiError::NotFound(format!("no wb_network username for {account_id}"))
            })?;
        Ok(User {
            account_id: account_id.to_owned(),
            username,
            account_data,
            profile_data,
        })
    }

    pub async fn from_username(api: &MvsApi, username: &str) -> ApiResult<User> {
        let account_id = api.id_from_username(username, DEFAULT_SEARCH_LIMIT).await?;
        Self::from_id(api, &account_id).await
    }

    pub async fn refresh_profile(&mut self, api: &MvsApi) -> ApiResult<()> {
        self.profile_data = api.profile(&self.account_id).await?;
        Ok(())
    }

    /// The player's most recently played match, fully parsed.
    pub async fn most_recent_match(&self, api: &MvsApi) -> ApiResult<Match> {
        let match_id = api.most_recent_match_id(&self.account_id).await?;
        Match::from_id(api, &match_id).await
    }

    /// Current ranked rating for a mode. `character` is "all" for the
    /// mode-wide leaderboard.
    pub async fn elo(&self, api: &MvsApi, mode: &str, character: &str) -> ApiResult<f64> {
        let rank = api
            .rank_data(&self.account_id, mode, character, CURRENT_RANKED_SEASON)
            .await?;
        rank.score.ok_or_else(|| {
            ApiError::NotFound(format!(
                "no leaderboard score for {} in {mode}/{character}",
                self.account_id
            ))
        })
    }

    /// Human-readable rank tier, e.g. "Gold 3".
    pub async fn rank_label(&self, api: &MvsApi, mode: &str, character: &str) -> ApiResult<String> {
        Ok(elo_to_rank(self.elo(api, mode, character).await?))
    }
}
