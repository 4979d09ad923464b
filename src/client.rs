use crate::Match;
use crate::dokken::{AccessResponse, AccountResponse, MatchRecord, RankResponse, SearchResponse};
use crate::parse::parse_match;
use crate::registry::{CharacterRegistry, MapRegistry};
use log::debug;
use reqwest::Client;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DOKKEN_BASE: &str = "https://dokken-api.wbagora.com/";
const HYDRA_API_KEY: &str = "51586fdcbd214feb84b0e475b130fce0";
const HYDRA_USER_AGENT: &str = "Hydra-Cpp/1.132.0";
const HYDRA_CLIENT_ID: &str = "47201f31-a35f-498a-ae5b-e9915ecb411e";
const TOKEN_ENV: &str = "MULTIVERSUS_TOKEN";

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Auth(String),
    MalformedMatch(String),
    NotFound(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Auth(msg) => write!(f, "Auth error: {msg}"),
            ApiError::MalformedMatch(msg) => write!(f, "Malformed match: {msg}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// MultiVersus API client backed by the dokken backend.
///
/// Call `refresh_token` once before issuing requests; the exchanged access
/// token is sent as `x-hydra-access-token` on every subsequent call. The
/// registries are loaded once at construction and shared read-only across
/// all parses.
#[derive(Debug, Clone)]
pub struct MvsApi {
    http: Client,
    base_url: String,
    timeout: Duration,
    steam_token: Option<String>,
    access_token: Option<String>,
    characters: CharacterRegistry,
    maps: MapRegistry,
}

impl Default for MvsApi {
    fn default() -> Self {
        // Best-effort .env load so MULTIVERSUS_TOKEN can live in a dotfile.
        let _ = dotenvy::dotenv();
        Self {
            http: Client::builder()
                .user_agent(HYDRA_USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: DOKKEN_BASE.to_owned(),
            timeout: Duration::from_secs(10),
            steam_token: std::env::var(TOKEN_ENV).ok(),
            access_token: None,
            characters: CharacterRegistry::default(),
            maps: MapRegistry::default(),
        }
    }
}

impl MvsApi {
    /// Client with the steam token taken from the `MULTIVERSUS_TOKEN`
    /// environment variable (a `.env` file is honored).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_steam_token(token: impl Into<String>) -> Self {
        Self { steam_token: Some(token.into()), ..Self::default() }
    }

    /// Point the client at a different base URL. Used by tests to target a
    /// local mock server; the URL must end with a slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn characters(&self) -> &CharacterRegistry {
        &self.characters
    }

    pub fn maps(&self) -> &MapRegistry {
        &self.maps
    }

    /// Exchange the steam token for a hydra access token.
    pub async fn refresh_token(&mut self) -> ApiResult<()> {
        let steam_token = self
            .steam_token
            .as_deref()
            .ok_or_else(|| ApiError::Auth(format!("no steam token; set {TOKEN_ENV}")))?;

        let url = format!("{}access", self.base_url);
        let body = json!({
            "auth": {"fail_on_missing": 1, "steam": steam_token},
            "options": ["wb_network"],
        });

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .header("x-hydra-api-key", HYDRA_API_KEY)
            .header("x-hydra-user-agent", HYDRA_USER_AGENT)
            .header("x-hydra-client-id", HYDRA_CLIENT_ID)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        let access: AccessResponse = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.clone()))?
            .json()
            .await
            .map_err(|e| ApiError::Parsing(e, url.clone()))?;

        match access.token {
            Some(token) if !token.is_empty() => {
                debug!("access token refreshed");
                self.access_token = Some(token);
                Ok(())
            }
            _ => Err(ApiError::Auth("access response carried no token".into())),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| ApiError::Auth("call refresh_token before issuing requests".into()))?;

        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .header("x-hydra-api-key", HYDRA_API_KEY)
            .header("x-hydra-user-agent", HYDRA_USER_AGENT)
            .header("x-hydra-access-token", token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.clone())),
            Err(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND) => {
                Err(ApiError::NotFound(url))
            }
            Err(e) => Err(ApiError::Api(e, url)),
        }
    }

    /// Raw profile payload for an account. Kept opaque; the backend's
    /// profile shape is large and mostly uninteresting here.
    pub async fn profile(&self, account_id: &str) -> ApiResult<Value> {
        self.get(&format!("profiles/{account_id}")).await
    }

    pub async fn account(&self, account_id: &str) -> ApiResult<AccountResponse> {
        self.get(&format!("accounts/{account_id}")).await
    }

    /// WB network display name for an account id.
    pub async fn username_from_id(&self, account_id: &str) -> ApiResult<String> {
        let account = self.account(account_id).await?;
        account
            .identity
            .as_ref()
            .and_then(|i| i.wb_username())
            .map(str::to_owned)
            .ok_or_else(|| ApiError::NotFound(format!("no wb_network username for {account_id}")))
    }

    /// Username search resolving to an account id. A single hit is taken
    /// as-is; multiple hits are disambiguated by fetching each account and
    /// matching the exact name case-insensitively.
    pub async fn id_from_username(&self, username: &str, limit: u32) -> ApiResult<String> {
        let endpoint = format!(
            "profiles/search_queries/get-by-username/run?username={username}&limit={limit}"
        );
        let search: SearchResponse = self.get(&endpoint).await?;
        let results = search.results.unwrap_or_default();

        let ids: Vec<String> = results
            .iter()
            .filter_map(|r| r.result.as_ref()?.account_id.clone())
            .collect();

        if let [only] = ids.as_slice() {
            return Ok(only.clone());
        }
        for account_id in ids {
            let name = self.username_from_id(&account_id).await?;
            if name.eq_ignore_ascii_case(username) {
                return Ok(account_id);
            }
        }
        Err(ApiError::NotFound(format!("no account matching username {username:?}")))
    }

    /// Raw match-history payload for an account, newest first.
    pub async fn matches(&self, account_id: &str, count: Option<u32>) -> ApiResult<Value> {
        let mut endpoint = format!("matches/all/{account_id}");
        if let Some(count) = count {
            endpoint.push_str(&format!("?count={count}"));
        }
        self.get(&endpoint).await
    }

    /// Id of the most recently played match for an account.
    pub async fn most_recent_match_id(&self, account_id: &str) -> ApiResult<String> {
        let history = self.matches(account_id, Some(1)).await?;
        history
            .pointer("/matches/0/id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| ApiError::NotFound(format!("no match history for {account_id}")))
    }

    /// Unparsed match record, exactly as the backend returned it.
    pub async fn raw_match(&self, match_id: &str) -> ApiResult<MatchRecord> {
        self.get(&format!("matches/{match_id}")).await
    }

    /// Fetch and fully parse one match. One network fetch per call;
    /// transport errors propagate unchanged.
    pub async fn match_by_id(&self, match_id: &str) -> ApiResult<Match> {
        let raw = self.raw_match(match_id).await?;
        parse_match(&raw, &self.characters, &self.maps)
    }

    /// Leaderboard score and rank for one account in one ranked mode.
    /// `character` is "all" for the mode-wide board.
    pub async fn rank_data(
        &self,
        account_id: &str,
        mode: &str,
        character: &str,
        season: u32,
    ) -> ApiResult<RankResponse> {
        let endpoint = format!(
            "leaderboards/ranked_season{season}_{mode}_{character}/score-and-rank/{account_id}"
        );
        self.get(&endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn authed_client(server: &mut mockito::ServerGuard) -> MvsApi {
        let mut api = MvsApi::with_steam_token("steam-xyz")
            .with_base_url(format!("{}/", server.url()));
        let _mock = server
            .mock("POST", "/access")
            .with_body(json!({"token": "hydra-access"}).to_string())
            .create_async()
            .await;
        api.refresh_token().await.expect("token refresh");
        api
    }

    #[tokio::test]
    async fn refresh_token_sends_hydra_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/access")
            .match_header("x-hydra-api-key", HYDRA_API_KEY)
            .match_header("x-hydra-client-id", HYDRA_CLIENT_ID)
            .match_body(mockito::Matcher::PartialJson(json!({
                "auth": {"fail_on_missing": 1, "steam": "steam-xyz"}
            })))
            .with_body(json!({"token": "hydra-access"}).to_string())
            .create_async()
            .await;

        let mut api = MvsApi::with_steam_token("steam-xyz")
            .with_base_url(format!("{}/", server.url()));
        api.refresh_token().await.expect("token refresh");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn requests_before_refresh_fail_with_auth_error() {
        let api = MvsApi::with_steam_token("steam-xyz")
            .with_base_url("http://127.0.0.1:9/".to_owned());
        match api.profile("acct-a").await {
            Err(ApiError::Auth(_)) => {}
            other => panic!("expected Auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn access_token_is_attached_to_requests() {
        let mut server = mockito::Server::new_async().await;
        let api = authed_client(&mut server).await;

        let mock = server
            .mock("GET", "/accounts/acct-a")
            .match_header("x-hydra-access-token", "hydra-access")
            .with_body(
                json!({"identity": {"alternate": {"wb_network": [{"username": "taetae"}]}}})
                    .to_string(),
            )
            .create_async()
            .await;

        let name = api.username_from_id("acct-a").await.expect("username");
        assert_eq!(name, "taetae");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn match_by_id_fetches_and_parses() {
        let mut server = mockito::Server::new_async().await;
        let api = authed_client(&mut server).await;

        let _mock = server
            .mock("GET", "/matches/match-123")
            .with_body(
                json!({
                    "id": "match-123",
                    "state": "complete",
                    "server_data": {
                        "GameplayConfig": {
                            "Map": "Map_BatCave",
                            "ModeString": "1v1",
                            "Players": {"acct-a": {"CharacterSlug": "character_taz", "TeamIndex": 0}}
                        }
                    },
                    "players": {"all": [
                        {"account_id": "acct-a",
                         "data": {"EndOfMatchStats": {"Score": [2, 0], "WinningTeamIndex": 0}}}
                    ]}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let m = api.match_by_id("match-123").await.expect("parsed match");
        assert_eq!(m.map, "Batcave");
        assert_eq!(m.winning_team_index, Some(0));
        assert!(m.players[0].is_winner);
    }

    #[tokio::test]
    async fn server_errors_propagate_as_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let api = authed_client(&mut server).await;

        let _mock = server
            .mock("GET", "/matches/match-500")
            .with_status(500)
            .create_async()
            .await;

        match api.match_by_id("match-500").await {
            Err(ApiError::Api(_, url)) => assert!(url.ends_with("matches/match-500")),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_resources_map_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        let api = authed_client(&mut server).await;

        let _mock = server
            .mock("GET", "/matches/match-404")
            .with_status(404)
            .create_async()
            .await;

        assert!(matches!(
            api.match_by_id("match-404").await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn most_recent_match_id_reads_the_history_head() {
        let mut server = mockito::Server::new_async().await;
        let api = authed_client(&mut server).await;

        let _mock = server
            .mock("GET", "/matches/all/acct-a?count=1")
            .with_body(json!({"matches": [{"id": "match-777"}]}).to_string())
            .create_async()
            .await;

        let id = api.most_recent_match_id("acct-a").await.expect("recent id");
        assert_eq!(id, "match-777");
    }

    #[tokio::test]
    async fn username_search_disambiguates_by_exact_name() {
        let mut server = mockito::Server::new_async().await;
        let api = authed_client(&mut server).await;

        let _search = server
            .mock(
                "GET",
                "/profiles/search_queries/get-by-username/run?username=taetae&limit=5",
            )
            .with_body(
                json!({"results": [
                    {"result": {"account_id": "acct-other"}},
                    {"result": {"account_id": "acct-a"}}
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let _other = server
            .mock("GET", "/accounts/acct-other")
            .with_body(
                json!({"identity": {"alternate": {"wb_network": [{"username": "taetae2"}]}}})
                    .to_string(),
            )
            .create_async()
            .await;
        let _exact = server
            .mock("GET", "/accounts/acct-a")
            .with_body(
                json!({"identity": {"alternate": {"wb_network": [{"username": "TaeTae"}]}}})
                    .to_string(),
            )
            .create_async()
            .await;

        let id = api.id_from_username("taetae", 5).await.expect("account id");
        assert_eq!(id, "acct-a");
    }
}
