pub mod predictor;
pub mod tensor_conversion;
pub mod torch_predictor;

pub use predictor::{mask_prior, Prediction, Predictor, UniformPredictor};
pub use tensor_conversion::{board_to_tensor, boards_to_tensor};
pub use torch_predictor::TorchPredictor;
