use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("glTF decode failed: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("buffer {index} has no data")]
    MissingBuffer { index: usize },
    #[error("unsupported buffer uri {0:?}")]
    UnsupportedUri(String),
    #[error("mesh {mesh} primitive {primitive} has no readable positions")]
    MissingPositions { mesh: usize, primitive: usize },
    #[error("node {node} is reachable more than once (cyclic or shared hierarchy)")]
    NodeCycle { node: usize },
    #[error("asset has no scene")]
    NoScene,
    #[error("no asset candidates configured")]
    NoCandidates,
    #[error("could not load model from any of {tried:?}")]
    Exhausted { tried: Vec<String> },
}

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("counter request failed: {0}")]
    Request(String),
    #[error("counter service returned status {0}")]
    Status(u16),
    #[error("unexpected counter response: {0}")]
    Response(String),
    #[error("local storage unavailable: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid viewer config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid viewer config: {0}")]
    Invalid(String),
}
