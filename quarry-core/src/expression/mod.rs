mod binary_op;
mod expr;
mod fold;
mod operand;
mod ordered;
mod tuple;
mod unary_op;

pub use binary_op::*;
pub use expr::*;
pub use fold::*;
pub use operand::*;
pub use ordered::*;
pub use tuple::*;
pub use unary_op::*;

pub(crate) use expr::{binary, in_list, in_query, is_null};
