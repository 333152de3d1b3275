//! Asynchronous asset fetch and decode

use image::GenericImageView;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::assets::{AssetKey, AssetRequest, ImageResource};

/// A finished load, delivered back to the client loop
#[derive(Debug, Clone, PartialEq)]
pub struct AssetLoaded {
    pub key: AssetKey,
    pub image: ImageResource,
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Fetches images over HTTP(S) or from local paths and decodes them.
/// Failed loads are logged and never complete.
#[derive(Clone)]
pub struct AssetLoader {
    client: reqwest::Client,
    completions: mpsc::UnboundedSender<AssetLoaded>,
}

impl AssetLoader {
    pub fn new(completions: mpsc::UnboundedSender<AssetLoaded>) -> Self {
        Self {
            client: reqwest::Client::new(),
            completions,
        }
    }

    pub fn request(&self, request: AssetRequest) {
        let client = self.client.clone();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            match load_image(&client, &request.url).await {
                Ok(image) => {
                    debug!(url = %image.url, width = image.width, height = image.height, "Asset loaded");
                    let _ = completions.send(AssetLoaded {
                        key: request.key,
                        image,
                    });
                }
                Err(e) => {
                    warn!(url = %request.url, error = %e, "Asset load failed");
                }
            }
        });
    }
}

async fn load_image(client: &reqwest::Client, url: &str) -> Result<ImageResource, AssetError> {
    let bytes = fetch_bytes(client, url).await?;
    let (width, height) = image::load_from_memory(&bytes)?.dimensions();
    Ok(ImageResource {
        url: url.to_string(),
        width,
        height,
    })
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, AssetError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AssetError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    } else {
        Ok(tokio::fs::read(url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::assert_err;

    use crate::ws::protocol::Direction;

    fn write_png(name: &str, width: u32, height: u32) -> String {
        let path = std::env::temp_dir().join(format!(
            "world_client_{}_{name}.png",
            std::process::id()
        ));
        image::RgbaImage::new(width, height).save(&path).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn local_png_loads_with_intrinsic_size() {
        let url = write_png("sprite", 12, 20);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = AssetLoader::new(tx);
        let key = AssetKey::Frame {
            avatar: "knight".to_string(),
            facing: Direction::Up,
            frame: 0,
        };

        loader.request(AssetRequest {
            key: key.clone(),
            url: url.clone(),
        });

        let loaded = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.key, key);
        assert_eq!(
            loaded.image,
            ImageResource {
                url,
                width: 12,
                height: 20
            }
        );
    }

    #[tokio::test]
    async fn missing_file_never_completes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = AssetLoader::new(tx);
        loader.request(AssetRequest {
            key: AssetKey::Map,
            url: "/definitely/not/here/map.png".to_string(),
        });

        assert_err!(tokio::time::timeout(Duration::from_millis(200), rx.recv()).await);
    }
}
