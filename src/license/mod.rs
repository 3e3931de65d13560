pub mod activation;
pub mod otp;
pub mod remote;

pub use activation::{ActivationSource, ActivationStatus};
pub use otp::OtpCache;
pub use remote::{ActivationClient, CodeSender, HttpCodeSender};
