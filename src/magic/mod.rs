//! Magic rule database: grammar parser, byte evaluator, rule table and
//! continuation match engine.

pub mod eval;
pub mod matcher;
pub mod parser;
pub mod table;

pub use eval::{compare, decode, evaluate, Value};
pub use parser::parse_line;
pub use table::{LineWarning, LoadReport, RuleTable, TableStats};
