pub mod policy;
pub mod traits;

mod top_tree;

pub use top_tree::TopTree;

pub use traits::{Aggregate, DynamicForest, Kids, KidsMut};
