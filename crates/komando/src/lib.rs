//! Declarative command trees: resolve subcommands, bind flags and positionals,
//! render help.
//!
//! A tree is built from [`Command`] values, normalized once, and dispatched
//! against argv:
//!
//! ```no_run
//! use komando::{Arg, Command, Flag};
//!
//! let root = Command::new("greet")
//!     .version("v1.0.0")
//!     .flag("loud", Flag::boolean().short('l'))
//!     .arg("name", Arg::optional())
//!     .run(|args, flags| {
//!         let name = args.get_str("name").unwrap_or("world");
//!         if flags.get_bool("loud") {
//!             println!("HELLO, {}!", name.to_uppercase());
//!         } else {
//!             println!("hello, {name}");
//!         }
//!         Ok(())
//!     });
//!
//! let _code = komando::run(&root);
//! ```

pub mod bind;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod normalize;
pub mod resolve;
pub mod schema;
pub mod terminal;
pub mod tokenize;
pub mod value;

pub use bind::{ParsedArgs, ParsedFlags};
pub use command::{Arg, Command, Flag, Nargs};
pub use dispatch::{Dispatcher, Outcome, dispatch, report, run, run_from};
pub use error::{ArityError, DefinitionError, Error, Result, UnknownFlags};
pub use help::HelpScreen;
pub use normalize::normalize;
pub use schema::CommandSchema;
pub use terminal::{Console, Recorder, Stdio};
pub use value::{FlagType, Value};
