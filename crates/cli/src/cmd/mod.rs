mod build;
mod plan;
mod status;

pub use build::cmd_build;
pub use plan::cmd_plan;
pub use status::cmd_status;
pub use test::cmd_test;
