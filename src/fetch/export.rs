// src/fetch/export.rs

use tracing::{info, instrument};

use super::PageSource;
use crate::error::Result;

/// Path of the CSV export of `table` for a given build.
pub fn export_path(table: &str, build: &str) -> String {
    format!("dbc/api/export/?name={}&build={}", table, build)
}

/// Download the CSV export of `table` at `build`. The text is returned unparsed.
#[instrument(level = "info", skip(source))]
pub fn fetch_export(source: &impl PageSource, table: &str, build: &str) -> Result<String> {
    let csv = source.get(&export_path(table, build))?;
    info!(bytes = csv.len(), "downloaded export");
    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fetch::Fetcher;
    use anyhow::Result;
    use mockito::Matcher;
    use url::Url;

    #[test]
    fn export_path_carries_table_and_build() {
        assert_eq!(
            export_path("itemsparse", "10.1"),
            "dbc/api/export/?name=itemsparse&build=10.1"
        );
    }

    #[test]
    fn fetch_export_queries_by_name_and_build() -> Result<()> {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/dbc/api/export/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "itemsparse".into()),
                Matcher::UrlEncoded("build".into(), "10.1".into()),
            ]))
            .with_status(200)
            .with_body("1,a,b\n")
            .create();

        let config = Config {
            base_url: Url::parse(&server.url())?,
            ..Config::default()
        };
        let fetcher = Fetcher::new(&config)?;
        assert_eq!(fetch_export(&fetcher, "itemsparse", "10.1")?, "1,a,b\n");
        mock.assert();
        Ok(())
    }
}
