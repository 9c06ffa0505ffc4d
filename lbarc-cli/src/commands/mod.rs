//! Command implementations for the lbarc CLI.

pub mod codec;
pub mod edit;
pub mod extract;
pub mod list;

pub use codec::{cmd_compress, cmd_decompress};
pub use edit::{cmd_add, cmd_add_child, cmd_delete};
pub use extract::cmd_extract;
pub use list::cmd_list;
pub use test::cmd_test;
