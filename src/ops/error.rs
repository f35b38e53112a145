use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("bond graph still has {fragments} disconnected fragments after stitching")]
    DisconnectedGraph { fragments: usize },

    #[error("degenerate geometry between atoms {first} and {second}")]
    DegenerateGeometry { first: usize, second: usize },

    #[error("singular value decomposition produced non-finite values")]
    NumericalFailure,
}

impl Error {
    pub fn degenerate_geometry(first: usize, second: usize) -> Self {
        if first <= second {
            Self::DegenerateGeometry { first, second }
        } else {
            Self::DegenerateGeometry {
                first: second,
                second: first,
            }
        }
    }
}
