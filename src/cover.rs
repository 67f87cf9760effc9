use reqwest::blocking::Client;
use std::sync::OnceLock;

use crate::error::FetchError;
use crate::models::cover_image_url;

const HTTP_USER_AGENT: &str = "shelf-notes/0.1 (+https://openlibrary.org/dev/docs/api/covers)";
// Open Library answers unknown ISBNs with a tiny placeholder and a 200.
pub const MIN_COVER_BYTES: usize = 1024;
const FETCH_SIZE: &str = "L";
static COVER_DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The only thing the cover lookup needs from an HTTP client.
pub trait HttpGet {
    fn get(&self, url: &str) -> Result<HttpReply, FetchError>;
}

impl<H: HttpGet + ?Sized> HttpGet for &H {
    fn get(&self, url: &str) -> Result<HttpReply, FetchError> {
        (**self).get(url)
    }
}

/// `reqwest` blocking client with library-default timeouts and no retries.
pub struct BlockingHttp {
    client: Client,
}

impl BlockingHttp {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(HTTP_USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl HttpGet for BlockingHttp {
    fn get(&self, url: &str) -> Result<HttpReply, FetchError> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let bytes = response.bytes()?.to_vec();
        Ok(HttpReply { status, bytes })
    }
}

/// Looks up cover art on Open Library by ISBN, isbn13 first.
pub struct CoverResolver<H> {
    http: H,
    min_bytes: usize,
}

impl<H: HttpGet> CoverResolver<H> {
    pub fn new(http: H) -> Self {
        Self {
            http,
            min_bytes: MIN_COVER_BYTES,
        }
    }

    pub fn with_min_bytes(mut self, min_bytes: usize) -> Self {
        self.min_bytes = min_bytes;
        self
    }

    /// First acceptable image wins; every failure just moves on to the next ISBN.
    pub fn resolve(&self, isbn10: Option<&str>, isbn13: Option<&str>) -> Option<Vec<u8>> {
        let debug_enabled = cover_debug_enabled();
        for isbn in [isbn13, isbn10].into_iter().flatten() {
            match self.fetch_isbn(isbn) {
                Ok(bytes) => {
                    log::info!("cover fetched for isbn {} ({} bytes)", isbn, bytes.len());
                    return Some(bytes);
                }
                Err(FetchError::Undersized(len)) => {
                    log::info!(
                        "cover too small ({} bytes) for isbn {}, likely a placeholder",
                        len,
                        isbn
                    );
                }
                Err(err) => {
                    log::warn!("cover fetch failed for isbn {}: {}", isbn, err);
                }
            }
            if debug_enabled {
                log::info!("[cover-debug] isbn miss isbn={}", isbn);
            }
        }
        None
    }

    fn fetch_isbn(&self, isbn: &str) -> Result<Vec<u8>, FetchError> {
        let url = cover_image_url(isbn, FETCH_SIZE);
        if cover_debug_enabled() {
            log::info!("[cover-debug] http start url={}", url);
        }
        let reply = self.http.get(&url)?;
        if !reply.is_success() {
            return Err(FetchError::Status(reply.status));
        }
        if reply.bytes.len() < self.min_bytes {
            return Err(FetchError::Undersized(reply.bytes.len()));
        }
        Ok(reply.bytes)
    }
}

fn cover_debug_enabled() -> bool {
    *COVER_DEBUG_ENABLED.get_or_init(|| {
        std::env::var("SHELF_NOTES_DEBUG")
            .map(|value| {
                let lowered = value.trim().to_ascii_lowercase();
                lowered == "1" || lowered == "true" || lowered == "yes" || lowered == "on"
            })
            .unwrap_or(false)
    })
}
