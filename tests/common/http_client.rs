//! HTTP client utilities for testing.
//!
//! This module provides helper functions for making HTTP requests to the meteoport server during tests.

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;

/// Default timeout for HTTP requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a default test client
pub fn create_test_client() -> Client {
    Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .expect("Failed to build test HTTP client")
}

/// Build a URL for a meteoport server endpoint
pub fn build_url(addr: &SocketAddr, path: &str) -> Url {
    format!("http://{}{}", addr, path)
        .parse()
        .expect("Failed to parse URL")
}

/// Make a GET request to the meteoport server
pub async fn get(addr: &SocketAddr, path: &str) -> Result<Response, Box<dyn Error>> {
    let client = create_test_client();
    Ok(client.get(build_url(addr, path)).send().await?)
}

/// Make a HEAD request to the meteoport server
pub async fn head(addr: &SocketAddr, path: &str) -> Result<Response, Box<dyn Error>> {
    let client = create_test_client();
    Ok(client.head(build_url(addr, path)).send().await?)
}

/// Make a DELETE request to the meteoport server
pub async fn delete(addr: &SocketAddr, path: &str) -> Result<Response, Box<dyn Error>> {
    let client = create_test_client();
    Ok(client.delete(build_url(addr, path)).send().await?)
}

/// POST a raw JSON body
pub async fn post_json(
    addr: &SocketAddr,
    path: &str,
    body: &str,
) -> Result<Response, Box<dyn Error>> {
    let client = create_test_client();
    Ok(client
        .post(build_url(addr, path))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await?)
}

/// PUT a raw JSON body
pub async fn put_json(
    addr: &SocketAddr,
    path: &str,
    body: &str,
) -> Result<Response, Box<dyn Error>> {
    let client = create_test_client();
    Ok(client
        .put(build_url(addr, path))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await?)
}

/// Make a GET request and parse the JSON response
pub async fn get_json<T: DeserializeOwned>(
    addr: &SocketAddr,
    path: &str,
) -> Result<T, Box<dyn Error>> {
    let response = get(addr, path).await?;

    if response.status() != StatusCode::OK {
        return Err(format!(
            "Unexpected status code: {}, body: {:?}",
            response.status(),
            response.text().await
        )
        .into());
    }

    Ok(response.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let addr: SocketAddr = ([127, 0, 0, 1], 8080).into();
        let url = build_url(&addr, "/airports/JFK/weather/0");
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/airports/JFK/weather/0");
    }
}
