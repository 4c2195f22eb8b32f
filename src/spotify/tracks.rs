use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;

use crate::{
    Res,
    spotify::{SpotifyClient, read_json},
    types::{Credential, RawTrackEntry, TracksPage},
};

impl SpotifyClient {
    /// Downloads every item reachable from `start_url` by following `next` links.
    ///
    /// Items keep the order of the pages and, within a page, the order the API
    /// returned them in.
    ///
    /// # Errors
    ///
    /// - [`Error::CredentialExpired`] when any page answers `401`. Pages already
    ///   received are dropped; the caller has to re-authorize and start over.
    /// - [`Error::Remote`] / [`Error::Request`] for any other failed page.
    /// - [`Error::Parse`] when a page body is not a tracks page.
    ///
    /// [`Error::CredentialExpired`]: crate::Error::CredentialExpired
    /// [`Error::Remote`]: crate::Error::Remote
    /// [`Error::Request`]: crate::Error::Request
    /// [`Error::Parse`]: crate::Error::Parse
    pub async fn fetch_all(
        &self,
        start_url: &str,
        credential: &Credential,
    ) -> Res<Vec<RawTrackEntry>> {
        let pb = ProgressBar::new_spinner();
        pb.set_message("Fetching tracks...");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }

        let mut items: Vec<RawTrackEntry> = Vec::new();
        let mut cursor = Some(start_url.to_string());

        while let Some(url) = cursor {
            let page = match self.fetch_page(&url, credential).await {
                Ok(page) => page,
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(e);
                }
            };

            items.extend(page.items);
            pb.set_message(format!("Fetching tracks... {} received", items.len()));
            cursor = page.next;
        }

        pb.finish_and_clear();
        Ok(items)
    }

    async fn fetch_page(&self, url: &str, credential: &Credential) -> Res<TracksPage> {
        let response = self
            .send_authorized(self.http.get(url), credential, StatusCode::OK)
            .await?;
        read_json::<TracksPage>(response).await
    }
}
