mod spec;
pub use spec::CommandSpec;

mod runner;
pub use runner::run_captured;
