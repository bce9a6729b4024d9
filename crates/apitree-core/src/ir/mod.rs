pub mod field;
pub mod grouping;
pub mod interface;

pub use field::{FieldNode, FieldType, Members};
pub use grouping::{GroupAccumulator, GroupRecord, KeyGenerator};
pub use interface::{InterfaceRecord, Params, ResponseType};
