/// Errors surfaced to hosts
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("drawing surface has no 2d context")]
    SurfaceUnavailable,

    #[error("render loop is already mounted")]
    AlreadyMounted,

    #[error("frame scheduling failed: {0}")]
    Schedule(String),

    #[error("invalid {kind} definition: {source}")]
    Definition {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
