mod split;
mod trim;

pub use split::SplitEdge;
pub use trim::Trim;
