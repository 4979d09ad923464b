/// Fetch a player's most recent match and print both renderings.
///
/// Usage: recent-match <username>
/// Requires MULTIVERSUS_TOKEN in the environment or a .env file.
use versus_api::format::{format_match_summary, format_player_summary};
use versus_api::user::User;
use versus_api::{ApiResult, MvsApi};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let username = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: recent-match <username>");
        std::process::exit(2);
    });

    let mut api = MvsApi::new();
    api.refresh_token().await?;

    let user = User::from_username(&api, &username).await?;
    println!("{} ({})", user.username, user.account_id);

    let m = user.most_recent_match(&api).await?;
    println!("{}", format_match_summary(&m));
    println!("{}", format_player_summary(&m));
    Ok(())
}
