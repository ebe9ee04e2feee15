pub mod divergence;
pub mod normalize;
pub mod scan;
pub mod segment;

pub use divergence::first_divergence;
pub use normalize::{normalize, strip_tags};
pub use scan::{Piece, Scanner};
pub use segment::{Lines, lines};
