mod optimizer;
mod sign_descent;

pub use optimizer::Optimizer;
pub use sign_descent::{SignDescent, loss_sign};
