//! Candidate-list asset loading.

use crate::decode;
use crate::error::LoadError;
use crate::scene::Asset;
use fnv::FnvHashMap;
use futures::future::LocalBoxFuture;

/// Byte source for assets and their external buffers.
pub trait AssetSource {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'_, Result<Vec<u8>, LoadError>>;
}

#[derive(Debug)]
pub struct LoadedAsset {
    pub url: String,
    pub asset: Asset,
}

/// Progress notifications emitted by [`load_first`].
#[derive(Debug)]
pub enum LoadEvent<'a> {
    Attempt {
        url: &'a str,
        index: usize,
        total: usize,
    },
    Failed {
        url: &'a str,
        error: &'a LoadError,
    },
    Loaded {
        url: &'a str,
    },
}

/// Fetch and decode a single glTF/GLB, pulling external buffers relative to
/// `url`.
pub async fn load_asset<S: AssetSource + ?Sized>(source: &S, url: &str) -> Result<Asset, LoadError> {
    let bytes = source.fetch(url).await?;
    let gltf = decode::parse(&bytes)?;
    let mut external = FnvHashMap::default();
    for (index, uri) in decode::external_buffer_uris(&gltf) {
        let resolved = resolve_relative(url, &uri);
        external.insert(index, source.fetch(&resolved).await?);
    }
    decode::build_asset(&gltf, &external)
}

/// Try each candidate in order and return the first that loads.
///
/// Per-candidate failures are reported through `on_event` and skipped; only
/// running out of candidates is an error.
pub async fn load_first<S, F>(
    source: &S,
    candidates: &[String],
    mut on_event: F,
) -> Result<LoadedAsset, LoadError>
where
    S: AssetSource + ?Sized,
    F: FnMut(LoadEvent<'_>),
{
    if candidates.is_empty() {
        return Err(LoadError::NoCandidates);
    }
    let total = candidates.len();
    for (index, url) in candidates.iter().enumerate() {
        on_event(LoadEvent::Attempt { url, index, total });
        log::info!("[loader] trying model url {}", url);
        match load_asset(source, url).await {
            Ok(asset) => {
                log::info!("[loader] loaded {}", url);
                on_event(LoadEvent::Loaded { url });
                return Ok(LoadedAsset {
                    url: url.clone(),
                    asset,
                });
            }
            Err(error) => {
                log::warn!("[loader] failed {}: {}", url, error);
                on_event(LoadEvent::Failed { url, error: &error });
            }
        }
    }
    log::error!("[loader] could not load model from any known path: {:?}", candidates);
    Err(LoadError::Exhausted {
        tried: candidates.to_vec(),
    })
}

/// Resolve `uri` against the directory of `base`.
pub fn resolve_relative(base: &str, uri: &str) -> String {
    if uri.contains("://") || uri.starts_with('/') {
        return uri.to_owned();
    }
    match base.rfind('/') {
        Some(i) => format!("{}{}", &base[..=i], uri),
        None => uri.to_owned(),
    }
}
