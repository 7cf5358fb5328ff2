// Adapters layer: the AWS SDK clients behind the domain ports.

pub mod kms;
pub mod s3;
pub mod session;
