pub mod error;
pub mod gateway;
pub mod labels;
pub mod util;

pub use error::EvaluateError;
pub use gateway::{EvalGateway, HttpInferenceClient, InferenceClient};
pub use labels::LabelTable;
