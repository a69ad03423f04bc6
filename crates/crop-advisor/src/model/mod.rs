mod forest;

pub use forest::{ForestParams, RandomForest};
