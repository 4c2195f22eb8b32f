use reqwest::{StatusCode, header::CONTENT_TYPE};

use crate::{
    Res, info,
    spotify::{SpotifyClient, cover, expect_status, read_json},
    success,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, Credential, CurrentUser, PlaylistDetails, PlaylistResponse,
    },
    warning,
};

/// Most URIs the add-tracks endpoint accepts per call.
pub const TRACK_BATCH_SIZE: usize = 100;

pub const SORTED_SUFFIX: &str = " (Sorted)";

impl SpotifyClient {
    /// Republishes `sorted_uris` as a new private playlist modelled on the source.
    ///
    /// Steps run strictly one after another, each with its own status check:
    /// user lookup, source details, cover download and re-encode, playlist
    /// creation, cover upload, then track batches of at most
    /// [`TRACK_BATCH_SIZE`] in order. A cover that cannot be decoded fails the
    /// run before anything is created.
    ///
    /// Returns the id of the new playlist.
    pub async fn publish(
        &self,
        sorted_uris: &[String],
        source_playlist_id: &str,
        credential: &Credential,
    ) -> Res<String> {
        let user_id = self.current_user_id(credential).await?;
        let details = self.playlist_details(source_playlist_id, credential).await?;

        let cover = match &details.cover_image_url {
            Some(url) => {
                let raw = self.cover_image(url).await?;
                Some(cover::encode_cover(&raw)?)
            }
            None => {
                warning!("Source playlist has no cover image, skipping cover upload");
                None
            }
        };

        info!("Creating playlist:");
        let playlist_id = self.create_playlist(&user_id, &details, credential).await?;
        success!("Created playlist {}{}", details.name, SORTED_SUFFIX);

        if let Some(body) = cover {
            info!("Uploading cover image to playlist:");
            self.upload_cover(&playlist_id, body, credential).await?;
        }

        info!("Adding tracks to playlist:");
        for (i, batch) in sorted_uris.chunks(TRACK_BATCH_SIZE).enumerate() {
            self.add_tracks(&playlist_id, batch, credential).await?;
            tracing::debug!(batch = i, size = batch.len(), "track batch accepted");
        }
        success!("Added {} tracks", sorted_uris.len());

        Ok(playlist_id)
    }

    pub async fn current_user_id(&self, credential: &Credential) -> Res<String> {
        let request = self.http.get(self.endpoint("me"));
        let response = self
            .send_authorized(request, credential, StatusCode::OK)
            .await?;
        Ok(read_json::<CurrentUser>(response).await?.id)
    }

    pub async fn playlist_details(
        &self,
        playlist_id: &str,
        credential: &Credential,
    ) -> Res<PlaylistDetails> {
        let request = self
            .http
            .get(self.endpoint(&format!("playlists/{}", playlist_id)));
        let response = self
            .send_authorized(request, credential, StatusCode::OK)
            .await?;
        let playlist = read_json::<PlaylistResponse>(response).await?;

        Ok(PlaylistDetails {
            name: playlist.name,
            description: playlist.description.unwrap_or_default(),
            cover_image_url: playlist
                .images
                .and_then(|images| images.into_iter().next())
                .map(|image| image.url),
        })
    }

    /// Downloads cover bytes. Image CDN URLs are public, no token is sent.
    pub async fn cover_image(&self, url: &str) -> Res<Vec<u8>> {
        let response = self.http.get(url).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn create_playlist(
        &self,
        user_id: &str,
        details: &PlaylistDetails,
        credential: &Credential,
    ) -> Res<String> {
        let body = CreatePlaylistRequest {
            name: format!("{}{}", details.name, SORTED_SUFFIX),
            description: details.description.clone(),
            public: false,
            collaborative: false,
        };
        let request = self
            .http
            .post(self.endpoint(&format!("users/{}/playlists", user_id)))
            .json(&body);
        let response = self
            .send_authorized(request, credential, StatusCode::CREATED)
            .await?;
        Ok(read_json::<CreatePlaylistResponse>(response).await?.id)
    }

    /// Uploads a base64 encoded JPEG as the playlist cover.
    pub async fn upload_cover(
        &self,
        playlist_id: &str,
        base64_jpeg: String,
        credential: &Credential,
    ) -> Res<()> {
        let request = self
            .http
            .put(self.endpoint(&format!("playlists/{}/images", playlist_id)))
            .header(CONTENT_TYPE, "image/jpeg")
            .body(base64_jpeg);
        self.send_authorized(request, credential, StatusCode::ACCEPTED)
            .await?;
        Ok(())
    }

    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
        credential: &Credential,
    ) -> Res<AddTrackToPlaylistResponse> {
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let request = self
            .http
            .post(self.endpoint(&format!("playlists/{}/tracks", playlist_id)))
            .json(&body);
        let response = self
            .send_authorized(request, credential, StatusCode::CREATED)
            .await?;
        read_json::<AddTrackToPlaylistResponse>(response).await
    }
}
