pub mod recommendation;

pub use recommendation::{RecommenderService, TrainingReport};
