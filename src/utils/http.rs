use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::Client;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client")
});

/// Shared client; request deadlines differ per endpoint and are set at the
/// call sites.
pub fn get_http_client() -> &'static Client {
    &HTTP_CLIENT
}
