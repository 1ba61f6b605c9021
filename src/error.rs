use std::io;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write SVG output: {0}")]
    Io(#[from] io::Error),
}
