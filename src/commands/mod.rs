mod batch;
mod fixed;
mod pyramid;

pub use batch::Batch;
pub use fixed::Fixed;
pub use pyramid::Pyramid;

pub trait Command {
    fn identifier(&self) -> &'static str;
    fn register(&self) -> clap::App<'static>;
    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()>;
}
