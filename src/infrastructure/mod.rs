pub mod terminal_operator;

pub use terminal_operator::{parse_answer, run_terminal_operator, Answer};
