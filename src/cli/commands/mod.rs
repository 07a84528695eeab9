//! One module per subcommand, each exposing `execute`.

pub mod add;
pub mod change_secret;
pub mod completions;
pub mod del;
pub mod gen;
pub mod get;
pub mod list;
pub mod requirements;
pub mod set;
