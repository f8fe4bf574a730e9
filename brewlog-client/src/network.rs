use crate::api_client::SyncClient;
use crate::settings::Settings;
use std::time::Duration;
use tokio::net::TcpStream;

const LINK_TIMEOUT: Duration = Duration::from_secs(2);

/// Reachability probe: link state first, then a live round trip, because a
/// socket that connects does not guarantee the service answers. Any failure
/// along the way reads as offline so callers fall to the local path.
pub async fn is_online(settings: &Settings, client: &SyncClient) -> bool {
    if settings.offline {
        return false;
    }

    if !link_up(client.address()).await {
        return false;
    }

    client.check_connection().await
}

async fn link_up(address: &str) -> bool {
    let url = match reqwest::Url::parse(address) {
        Ok(v) => v,
        Err(_) => return false,
    };
    let host = match url.host_str() {
        Some(v) => v.to_string(),
        None => return false,
    };
    let port = match url.port_or_known_default() {
        Some(v) => v,
        None => return false,
    };

    matches!(
        tokio::time::timeout(LINK_TIMEOUT, TcpStream::connect((host.as_str(), port))).await,
        Ok(Ok(_))
    )
}
