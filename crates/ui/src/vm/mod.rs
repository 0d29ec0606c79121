mod result_vm;
mod time_fmt;

pub use result_vm::{BoardRowVm, ResultSummaryVm, map_board_rows};
