//! 核心逻辑：列表编辑与变量操作

pub mod list;
pub mod ops;

pub use list::{AddReport, EntryList, DELIMITER};
pub use ops::{Outcome, VariableOps};
