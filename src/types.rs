use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of media served by the Klipy API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Gif,
    Sticker,
    Clip,
    Meme,
}

impl MediaKind {
    /// Path segment used in API URLs.
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Gif => "gifs",
            MediaKind::Sticker => "stickers",
            MediaKind::Clip => "clips",
            MediaKind::Meme => "static-memes",
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gif" => Ok(MediaKind::Gif),
            "sticker" => Ok(MediaKind::Sticker),
            "clip" => Ok(MediaKind::Clip),
            "meme" => Ok(MediaKind::Meme),
            other => Err(format!("unknown media kind: {}", other)),
        }
    }
}

/// Tab shown in the tray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Gifs,
    Stickers,
    Clips,
    Memes,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Gifs, Tab::Stickers, Tab::Clips, Tab::Memes];

    pub fn kind(&self) -> MediaKind {
        match self {
            Tab::Gifs => MediaKind::Gif,
            Tab::Stickers => MediaKind::Sticker,
            Tab::Clips => MediaKind::Clip,
            Tab::Memes => MediaKind::Meme,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Gifs => write!(f, "GIFs"),
            Tab::Stickers => write!(f, "Stickers"),
            Tab::Clips => write!(f, "Clips"),
            Tab::Memes => write!(f, "Memes"),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gifs" | "gif" => Ok(Tab::Gifs),
            "stickers" | "sticker" => Ok(Tab::Stickers),
            "clips" | "clip" => Ok(Tab::Clips),
            "memes" | "meme" => Ok(Tab::Memes),
            other => Err(format!("unknown tab: {}", other)),
        }
    }
}

/// Category chip. Identity is the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub display_name: String,
    pub query: String,
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl Category {
    pub fn new(display_name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            query: query.into(),
            preview_url: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.query
    }
}

/// `data` payload of the categories endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPayload {
    #[serde(default)]
    pub locale: Option<String>,
    pub categories: Vec<Category>,
}

/// Every Klipy response is wrapped as `{ "result": bool, "data": ... }`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub result: bool,
    pub data: T,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T = MediaItem> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Terminal empty page, used when there is no feed to show.
    pub fn empty(per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            per_page,
            has_next: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListPayload {
    pub data: Vec<MediaItem>,
}

/// Selector for the items endpoint: exactly one of ids or slugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemsSelector {
    Ids(Vec<String>),
    Slugs(Vec<String>),
}

/// Single asset inside the rendition tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileAsset {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, rename = "size")]
    pub size_bytes: Option<u64>,
}

/// Resolution bucket (hd, md, sm, xs) holding several formats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileBucket {
    pub gif: Option<FileAsset>,
    pub webp: Option<FileAsset>,
    pub jpg: Option<FileAsset>,
    pub mp4: Option<FileAsset>,
    pub webm: Option<FileAsset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaFile {
    pub hd: Option<FileBucket>,
    pub md: Option<FileBucket>,
    pub sm: Option<FileBucket>,
    pub xs: Option<FileBucket>,
}

type Format = fn(&FileBucket) -> Option<&FileAsset>;

fn gif(b: &FileBucket) -> Option<&FileAsset> {
    b.gif.as_ref()
}

fn webp(b: &FileBucket) -> Option<&FileAsset> {
    b.webp.as_ref()
}

fn jpg(b: &FileBucket) -> Option<&FileAsset> {
    b.jpg.as_ref()
}

fn mp4(b: &FileBucket) -> Option<&FileAsset> {
    b.mp4.as_ref()
}

impl MediaFile {
    fn pick<'a>(candidates: &[(&'a Option<FileBucket>, Format)]) -> Option<&'a FileAsset> {
        candidates
            .iter()
            .find_map(|&(bucket, format)| bucket.as_ref().and_then(format))
    }

    /// Small asset for grid cells: sm.gif, xs.gif, sm.webp, xs.webp, sm.jpg.
    pub fn preview(&self) -> Option<&FileAsset> {
        Self::pick(&[
            (&self.sm, gif),
            (&self.xs, gif),
            (&self.sm, webp),
            (&self.xs, webp),
            (&self.sm, jpg),
        ])
    }

    pub fn gif(&self) -> Option<&FileAsset> {
        Self::pick(&[(&self.md, gif), (&self.hd, gif), (&self.sm, gif), (&self.xs, gif)])
    }

    pub fn mp4(&self) -> Option<&FileAsset> {
        Self::pick(&[(&self.md, mp4), (&self.hd, mp4), (&self.sm, mp4), (&self.xs, mp4)])
    }

    pub fn webp(&self) -> Option<&FileAsset> {
        Self::pick(&[
            (&self.md, webp),
            (&self.hd, webp),
            (&self.sm, webp),
            (&self.xs, webp),
        ])
    }
}

/// A media item (GIF, sticker, clip, meme). Equality is by `id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawMediaItem")]
pub struct MediaItem {
    pub id: String,
    pub slug: String,
    pub kind: MediaKind,
    pub title: Option<String>,
    pub file: Option<MediaFile>,
    pub blur_preview: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PartialEq for MediaItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MediaItem {}

impl MediaItem {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            kind,
            title: None,
            file: None,
            blur_preview: None,
            tags: None,
        }
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.file.as_ref()?.preview().map(|a| a.url.as_str())
    }

    pub fn gif_url(&self) -> Option<&str> {
        self.file.as_ref()?.gif().map(|a| a.url.as_str())
    }

    pub fn mp4_url(&self) -> Option<&str> {
        self.file.as_ref()?.mp4().map(|a| a.url.as_str())
    }

    pub fn webp_url(&self) -> Option<&str> {
        self.file.as_ref()?.webp().map(|a| a.url.as_str())
    }

    /// Playback dimensions: GIF asset first, then the preview.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let file = self.file.as_ref()?;
        [file.gif(), file.preview()]
            .into_iter()
            .flatten()
            .find_map(|a| Some((a.width?, a.height?)))
    }

    /// Best URL to hand to a share sheet or clipboard.
    pub fn share_url(&self) -> Option<&str> {
        match self.kind {
            MediaKind::Clip => self.mp4_url().or_else(|| self.gif_url()),
            _ => self.gif_url().or_else(|| self.webp_url()),
        }
        .or_else(|| self.preview_url())
    }

    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.slug)
    }
}

// Wire shape: `id` may be a string or an integer, `type` may be missing or unknown.
#[derive(Deserialize)]
struct RawMediaItem {
    #[serde(default)]
    id: Option<serde_json::Value>,
    slug: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    file: Option<MediaFile>,
    #[serde(default)]
    blur_preview: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

impl From<RawMediaItem> for MediaItem {
    fn from(raw: RawMediaItem) -> Self {
        let id = match raw.id {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => raw.slug.clone(),
        };
        let kind = raw
            .kind
            .and_then(|k| k.parse().ok())
            .unwrap_or(MediaKind::Gif);

        Self {
            id,
            slug: raw.slug,
            kind,
            title: raw.title,
            file: raw.file,
            blur_preview: raw.blur_preview,
            tags: raw.tags,
        }
    }
}
