mod training;

pub use training::TrainingConfig;
