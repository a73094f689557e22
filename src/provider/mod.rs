// ABOUTME: Provider capability traits and their production bindings.
// ABOUTME: AWS services through the official SDK, Snowflake through its HTTP API.

pub mod aws;
pub mod snowflake;
pub mod traits;

pub use aws::AwsClients;
pub use snowflake::SnowflakeClient;
pub use traits::*;
