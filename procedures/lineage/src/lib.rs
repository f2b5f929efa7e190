pub mod family;
pub mod growth;
pub mod rng;
pub mod tree;

pub use family::FamilyMap;
pub use growth::{build_tree, BranchGrower, GrowthError, GrowthParams};
pub use rng::BranchRng;
pub use tree::BranchNode;
