use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, info, warn};

const PLACEHOLDER_SIZE_PX: u32 = 16;
const PLACEHOLDER_CELL_PX: u32 = 4;
const PLACEHOLDER_LIGHT: [u8; 4] = [255, 0, 255, 255];
const PLACEHOLDER_DARK: [u8; 4] = [20, 20, 20, 255];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetKeyError {
    #[error("asset key must not be empty")]
    Empty,
    #[error("asset key must not start with '/'")]
    LeadingSlash,
    #[error("asset key must not contain '\\\\'")]
    Backslash,
    #[error("asset key must not contain '..'")]
    ParentTraversal,
    #[error("asset key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("invalid asset key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: AssetKeyError,
    },
    #[error("sprite '{key}' was never registered with the asset manager")]
    MissingSprite { key: String },
    #[error("audio '{key}' was never registered with the asset manager")]
    MissingAudio { key: String },
}

pub(crate) fn validate_asset_key(key: &str) -> Result<(), AssetKeyError> {
    if key.is_empty() {
        return Err(AssetKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(AssetKeyError::LeadingSlash);
    }
    if key.contains('\\') {
        return Err(AssetKeyError::Backslash);
    }
    if key.contains("..") {
        return Err(AssetKeyError::ParentTraversal);
    }
    for ch in key.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-' | '.') {
            continue;
        }
        return Err(AssetKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub placeholder: bool,
}

impl LoadedImage {
    fn placeholder() -> Self {
        let mut rgba = Vec::with_capacity((PLACEHOLDER_SIZE_PX * PLACEHOLDER_SIZE_PX * 4) as usize);
        for y in 0..PLACEHOLDER_SIZE_PX {
            for x in 0..PLACEHOLDER_SIZE_PX {
                let light = ((x / PLACEHOLDER_CELL_PX) + (y / PLACEHOLDER_CELL_PX)) % 2 == 0;
                rgba.extend_from_slice(if light {
                    &PLACEHOLDER_LIGHT
                } else {
                    &PLACEHOLDER_DARK
                });
            }
        }
        Self {
            width: PLACEHOLDER_SIZE_PX,
            height: PLACEHOLDER_SIZE_PX,
            rgba,
            placeholder: true,
        }
    }

    /// RGBA of the pixel at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let bytes = self.rgba.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundHandle {
    pub key: String,
    pub path: PathBuf,
}

/// Registration phase: collects every key the game will ask for.
#[derive(Debug, Clone)]
pub struct AssetManager {
    root: PathBuf,
    images: BTreeSet<String>,
    sounds: BTreeSet<String>,
}

impl AssetManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: BTreeSet::new(),
            sounds: BTreeSet::new(),
        }
    }

    pub fn add_image(&mut self, key: &str) -> Result<&mut Self, AssetError> {
        validate(key)?;
        self.images.insert(key.to_string());
        Ok(self)
    }

    pub fn add_audio(&mut self, key: &str) -> Result<&mut Self, AssetError> {
        validate(key)?;
        self.sounds.insert(key.to_string());
        Ok(self)
    }

    /// Loads everything registered. Files that fail to open or decode are
    /// replaced by a placeholder so a missing file never blocks startup.
    pub fn load_assets(self) -> Assets {
        let mut sprites = BTreeMap::new();
        for key in &self.images {
            let path = self.root.join(key);
            let image = match load_image_rgba(&path) {
                Ok(image) => image,
                Err(reason) => {
                    warn!(
                        asset_key = %key,
                        path = %path.display(),
                        reason = %reason,
                        "asset_load_failed_using_placeholder"
                    );
                    LoadedImage::placeholder()
                }
            };
            sprites.insert(key.clone(), image);
        }

        let mut audio = BTreeMap::new();
        for key in &self.sounds {
            let path = self.root.join(key);
            if !path.is_file() {
                debug!(asset_key = %key, path = %path.display(), "audio_file_missing");
            }
            audio.insert(
                key.clone(),
                SoundHandle {
                    key: key.clone(),
                    path,
                },
            );
        }

        info!(
            root = %self.root.display(),
            sprite_count = sprites.len(),
            audio_count = audio.len(),
            "assets_loaded"
        );
        Assets {
            sprites: SpriteStore { images: sprites },
            audio: AudioStore { sounds: audio },
        }
    }
}

fn validate(key: &str) -> Result<(), AssetError> {
    validate_asset_key(key).map_err(|source| AssetError::InvalidKey {
        key: key.to_string(),
        source,
    })
}

fn load_image_rgba(path: &Path) -> Result<LoadedImage, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
        placeholder: false,
    })
}

/// Fully loaded, immutable assets. Holding one proves loading finished.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    sprites: SpriteStore,
    audio: AudioStore,
}

impl Assets {
    pub fn sprites(&self) -> &SpriteStore {
        &self.sprites
    }

    pub fn audio(&self) -> &AudioStore {
        &self.audio
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpriteStore {
    images: BTreeMap<String, LoadedImage>,
}

impl SpriteStore {
    pub fn get(&self, key: &str) -> Result<&LoadedImage, AssetError> {
        self.images
            .get(key)
            .ok_or_else(|| AssetError::MissingSprite {
                key: key.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AudioStore {
    sounds: BTreeMap<String, SoundHandle>,
}

impl AudioStore {
    pub fn get(&self, key: &str) -> Result<&SoundHandle, AssetError> {
        self.sounds.get(key).ok_or_else(|| AssetError::MissingAudio {
            key: key.to_string(),
        })
    }
}

pub trait AudioSink {
    fn play(&mut self, sound: &SoundHandle, volume: f64);
}

/// Records requested sounds in the log instead of playing them.
#[derive(Debug, Default)]
pub struct LogAudioSink {
    played: u64,
}

impl LogAudioSink {
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, sound: &SoundHandle, volume: f64) {
        self.played += 1;
        debug!(sound = %sound.key, volume, "audio_play");
    }
}
