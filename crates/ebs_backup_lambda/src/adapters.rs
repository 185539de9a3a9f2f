pub mod aws;
pub mod ec2;
pub mod notify;
