mod body;
mod cell;
mod traversal;
mod tree;

pub use body::*;
pub use cell::*;
pub use traversal::*;
pub use tree::*;

#[cfg(test)]
mod traversal_tests;
