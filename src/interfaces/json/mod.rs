pub mod request_reader;

pub use request_reader::{OperationEnvelope, RequestReader};
