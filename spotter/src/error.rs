use terrain::TerrainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpotterError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("observer is outside elevation coverage")]
    NotCovered,

    #[error("{0}")]
    Terrain(#[from] TerrainError),
}
