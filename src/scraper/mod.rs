pub mod download;
pub mod extract;
pub mod latest_versions;
pub mod locate;
pub mod pep;
pub mod whats_new;

use crate::cli::Mode;
use crate::client::Fetch;
use crate::config::Config;
use crate::error::Result;
use crate::progress::{progress_for, Progress};
use crate::table::ResultTable;

/// Everything a scraper needs, built once in `main` and lent to each run.
pub struct ScrapeContext<'a> {
    pub session: &'a dyn Fetch,
    pub config: &'a Config,
    pub show_progress: bool,
}

impl<'a> ScrapeContext<'a> {
    pub fn new(session: &'a dyn Fetch, config: &'a Config) -> Self {
        Self {
            session,
            config,
            show_progress: config.http.progress,
        }
    }

    pub(crate) fn progress(&self, label: &'static str) -> Box<dyn Progress> {
        progress_for(label, self.show_progress)
    }
}

/// Runs one mode. `None` means there is nothing for the output stage.
pub async fn run_mode(mode: Mode, ctx: &ScrapeContext<'_>) -> Result<Option<ResultTable>> {
    match mode {
        Mode::WhatsNew => whats_new::scrape(ctx).await.map(Some),
        Mode::LatestVersions => latest_versions::scrape(ctx).await,
        Mode::Download => {
            download::scrape(ctx).await?;
            Ok(None)
        }
        Mode::Pep => pep::scrape(ctx).await.map(Some),
    }
}
