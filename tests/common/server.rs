//! Fake movie catalog and song preview providers on a local port.

use super::constants::{TAMIL_TITLES, TEST_API_KEY};
use cinequiz::audio::{AudioResolver, ItunesClient};
use cinequiz::catalog::{CatalogFetcher, TmdbClient};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Serves discover pages and song searches, recording every request
/// line it receives.
pub struct FakeProviders {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeProviders {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake provider port");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(stream, recorded).await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn catalog_fetcher(&self) -> Arc<CatalogFetcher> {
        self.catalog_fetcher_with_key(Some(TEST_API_KEY))
    }

    pub fn catalog_fetcher_with_key(&self, key: Option<&str>) -> Arc<CatalogFetcher> {
        let client = TmdbClient::new(self.base_url(), key.map(str::to_string), 5)
            .expect("Failed to build catalog client");
        Arc::new(CatalogFetcher::new(Arc::new(client)))
    }

    pub fn audio_resolver(&self) -> AudioResolver {
        let client = ItunesClient::new(format!("{}/search", self.base_url()), 5)
            .expect("Failed to build song search client");
        AudioResolver::new(Arc::new(client))
    }

    /// Request targets (path and query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|target| target.starts_with(path))
            .collect()
    }
}

pub fn query_param(target: &str, name: &str) -> Option<String> {
    let (_, query) = target.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| {
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
    })
}

/// Every page holds the same six Tamil movies, with ids offset by page.
fn discover_page(target: &str) -> Value {
    let page: u64 = query_param(target, "page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let results: Vec<Value> = TAMIL_TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| {
            json!({
                "id": page * 100 + i as u64,
                "title": title,
                "original_title": title,
                "overview": format!("{} is a film with a long and twisty plot that keeps going on and on well past the clue limit, with songs, fights, a wedding and one very big reveal at the end.", title),
                "poster_path": format!("/{}.jpg", title.to_lowercase()),
                "release_date": "2023-10-19",
                "original_language": "ta",
                "genre_ids": [28],
                "vote_average": 7.5
            })
        })
        .collect();
    json!({ "page": page, "results": results })
}

/// One song per search, from an album named after the searched title.
fn song_search(target: &str) -> Value {
    let term = query_param(target, "term").unwrap_or_default();
    let title = term
        .trim_end_matches(" soundtrack")
        .split(" tamil movie songs")
        .next()
        .unwrap_or_default()
        .to_string();
    json!({
        "resultCount": 1,
        "results": [{
            "trackName": format!("{} Theme", title),
            "artistName": "Anirudh Ravichander",
            "collectionName": format!("{} (Original Motion Picture Soundtrack)", title),
            "previewUrl": format!("https://audio.example/{}.m4a", title.to_lowercase()),
            "artworkUrl100": "https://art.example/100x100bb.jpg"
        }]
    })
}

fn respond(target: &str) -> (u16, Value) {
    if target.starts_with("/discover/movie") {
        if query_param(target, "api_key").as_deref() != Some(TEST_API_KEY) {
            return (401, json!({ "status_message": "Invalid API key" }));
        }
        (200, discover_page(target))
    } else if target.starts_with("/search") {
        (200, song_search(target))
    } else {
        (404, json!({ "status_message": "Not found" }))
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    recorded: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    recorded.lock().unwrap().push(target.clone());

    let (status, body) = respond(&target);
    let body = body.to_string();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        if status == 200 { "OK" } else { "Error" },
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
