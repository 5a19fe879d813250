use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

/// Checks whether an image URL is currently being served.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn is_available(&self, url: &str) -> bool;
}

pub type DynProbe = Arc<dyn ImageProbe>;

/// HEAD request with a fixed timeout; only a 200 counts.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageProbe for HttpProbe {
    async fn is_available(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!(error = %e, url, "image probe failed");
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSlot {
    pub keyword: String,
    pub url: String,
    pub caption: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSection {
    /// No keywords at all: one notice, nothing probed.
    Unavailable,
    Slots(Vec<ImageSlot>),
}

#[derive(Debug, Clone)]
pub struct ImageSettings {
    pub base: String,
    pub width: u32,
    pub height: u32,
    pub max_images: usize,
}

impl From<&Config> for ImageSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            base: cfg.image_base.clone(),
            width: cfg.image_width,
            height: cfg.image_height,
            max_images: cfg.max_images,
        }
    }
}

/// `<base>/prompt/<keyword>?width=..&height=..&nologo=true`, keyword percent-encoded.
pub fn image_url(settings: &ImageSettings, keyword: &str) -> String {
    let fallback = || {
        format!(
            "{}/prompt/{}?width={}&height={}&nologo=true",
            settings.base.trim_end_matches('/'),
            keyword.replace(' ', "%20"),
            settings.width,
            settings.height
        )
    };
    let Ok(mut url) = Url::parse(&settings.base) else {
        return fallback();
    };
    match url.path_segments_mut() {
        Ok(mut segs) => {
            segs.pop_if_empty().push("prompt").push(keyword);
        }
        Err(()) => return fallback(),
    }
    url.query_pairs_mut()
        .append_pair("width", &settings.width.to_string())
        .append_pair("height", &settings.height.to_string())
        .append_pair("nologo", "true");
    url.into()
}

/// First letter upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Hard ceiling on image slots; `max_images` can only lower it.
pub const MAX_IMAGE_SLOTS: usize = 4;

/// Probe up to `max_images` keywords (1..=4) one after another. A failed slot
/// never affects the others.
pub async fn resolve_images(
    keywords: Option<&[String]>,
    probe: &dyn ImageProbe,
    settings: &ImageSettings,
) -> ImageSection {
    let keywords = match keywords {
        Some(k) if !k.is_empty() => k,
        _ => return ImageSection::Unavailable,
    };
    let mut slots = Vec::new();
    let limit = settings.max_images.clamp(1, MAX_IMAGE_SLOTS);
    for keyword in keywords.iter().take(limit) {
        let url = image_url(settings, keyword);
        let available = probe.is_available(&url).await;
        slots.push(ImageSlot {
            keyword: keyword.clone(),
            caption: capitalize(keyword),
            url,
            available,
        });
    }
    ImageSection::Slots(slots)
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingProbe;
    use super::*;

    fn settings() -> ImageSettings {
        ImageSettings::from(&Config::default())
    }

    fn kw(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn url_is_deterministic_and_encoded() {
        assert_eq!(
            image_url(&settings(), "solar panel"),
            "https://image.pollinations.ai/prompt/solar%20panel?width=400&height=300&nologo=true"
        );
        assert_eq!(image_url(&settings(), "leaf"), image_url(&settings(), "leaf"));
    }

    #[test]
    fn url_encodes_path_separators() {
        let url = image_url(&settings(), "a/b");
        assert!(url.starts_with("https://image.pollinations.ai/prompt/a%2Fb?"), "{url}");
    }

    #[test]
    fn capitalize_matches_sentence_case() {
        assert_eq!(capitalize("sUNLIGHT rays"), "Sunlight rays");
        assert_eq!(capitalize(""), "");
    }

    #[tokio::test]
    async fn only_first_four_keywords_are_probed() {
        let probe = RecordingProbe::default();
        let keywords = kw(&["x", "y", "z", "w", "v"]);
        let section = resolve_images(Some(keywords.as_slice()), &probe, &settings()).await;
        assert_eq!(probe.count(), 4);
        match section {
            ImageSection::Slots(slots) => {
                let names: Vec<_> = slots.iter().map(|s| s.keyword.as_str()).collect();
                assert_eq!(names, ["x", "y", "z", "w"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn configured_limit_is_clamped_to_slot_range() {
        let keywords = kw(&["a", "b", "c", "d", "e", "f"]);

        let probe = RecordingProbe::default();
        let wide = ImageSettings { max_images: 10, ..settings() };
        let ImageSection::Slots(slots) = resolve_images(Some(keywords.as_slice()), &probe, &wide).await else {
            panic!("expected slots");
        };
        assert_eq!(slots.len(), MAX_IMAGE_SLOTS);
        assert_eq!(probe.count(), MAX_IMAGE_SLOTS);

        let probe = RecordingProbe::default();
        let zero = ImageSettings { max_images: 0, ..settings() };
        let ImageSection::Slots(slots) = resolve_images(Some(keywords.as_slice()), &probe, &zero).await else {
            panic!("expected slots");
        };
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].keyword, "a");

        let probe = RecordingProbe::default();
        let two = ImageSettings { max_images: 2, ..settings() };
        resolve_images(Some(keywords.as_slice()), &probe, &two).await;
        assert_eq!(probe.count(), 2);
    }

    #[tokio::test]
    async fn empty_or_absent_keywords_probe_nothing() {
        let probe = RecordingProbe::default();
        assert_eq!(resolve_images(Some(&[] as &[String]), &probe, &settings()).await, ImageSection::Unavailable);
        assert_eq!(resolve_images(None, &probe, &settings()).await, ImageSection::Unavailable);
        assert_eq!(probe.count(), 0);
    }

    #[tokio::test]
    async fn one_failed_slot_leaves_others_intact() {
        let probe = RecordingProbe::default();
        let keywords = kw(&["leaf", "broken", "sun"]);
        let ImageSection::Slots(slots) = resolve_images(Some(keywords.as_slice()), &probe, &settings()).await else {
            panic!("expected slots");
        };
        assert_eq!(slots.iter().map(|s| s.available).collect::<Vec<_>>(), [true, false, true]);
        assert_eq!(slots[2].caption, "Sun");
    }

    #[tokio::test]
    async fn http_probe_treats_non_200_as_missing() {
        use axum::http::StatusCode as Code;
        use axum::routing::get;
        use axum::Router;

        let app = Router::new()
            .route("/prompt/{kw}", get(|axum::extract::Path(kw): axum::extract::Path<String>| async move {
                if kw == "leaf" { Code::OK } else { Code::NOT_FOUND }
            }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let probe = HttpProbe::new(3).unwrap();
        let s = ImageSettings { base, ..settings() };
        assert!(probe.is_available(&image_url(&s, "leaf")).await);
        assert!(!probe.is_available(&image_url(&s, "rock")).await);
    }
}
