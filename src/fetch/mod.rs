// src/fetch/mod.rs

use reqwest::blocking::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

pub mod export;

/// Something that can hand back the text of a page, given a path relative to the site root.
pub trait PageSource {
    fn get(&self, path: &str) -> Result<String>;
}

/// Blocking HTTP client for the builds site.
pub struct Fetcher {
    client: Client,
    base: Url,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(Error::Client)?;
        Ok(Self {
            client,
            base: config.base_url.clone(),
        })
    }
}

impl PageSource for Fetcher {
    #[instrument(level = "debug", skip(self))]
    fn get(&self, path: &str) -> Result<String> {
        let url = self.base.join(path)?;
        debug!("fetching text from {}", url);

        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| Error::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = resp.bytes().map_err(|source| Error::Request {
            url: url.to_string(),
            source,
        })?;
        debug!(%url, bytes = bytes.len(), "fetched");

        String::from_utf8(bytes.to_vec()).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn config_for(server: &mockito::Server) -> Config {
        Config {
            base_url: Url::parse(&server.url()).unwrap(),
            ..Config::default()
        }
    }

    #[test]
    fn get_sends_user_agent_and_returns_body() -> Result<()> {
        crate::test_logging::init();
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/builds")
            .match_header("user-agent", "libprocessable")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create();

        let fetcher = Fetcher::new(&config_for(&server))?;
        assert_eq!(fetcher.get("builds")?, "<html>ok</html>");
        mock.assert();
        Ok(())
    }

    #[test]
    fn non_success_status_is_an_error() -> Result<()> {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/builds").with_status(503).create();

        let fetcher = Fetcher::new(&config_for(&server))?;
        let err = fetcher.get("builds").unwrap_err();
        match err {
            Error::Status { status, .. } => assert_eq!(status.as_u16(), 503),
            other => panic!("expected status error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn invalid_utf8_body_is_an_error() -> Result<()> {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/builds")
            .with_status(200)
            .with_body(vec![0x66, 0x6f, 0xff, 0xfe])
            .create();

        let fetcher = Fetcher::new(&config_for(&server))?;
        assert!(matches!(fetcher.get("builds"), Err(Error::Decode { .. })));
        Ok(())
    }

    #[test]
    fn bad_user_agent_fails_client_build() {
        let config = Config {
            user_agent: "lib\nprocessable".into(),
            ..Config::default()
        };
        assert!(matches!(Fetcher::new(&config), Err(Error::Client(_))));
    }

    #[test]
    fn unreachable_host_is_a_request_error() -> Result<()> {
        let config = Config {
            base_url: Url::parse("http://127.0.0.1:1/")?,
            ..Config::default()
        };
        let fetcher = Fetcher::new(&config)?;
        assert!(matches!(fetcher.get("builds"), Err(Error::Request { .. })));
        Ok(())
    }
}
