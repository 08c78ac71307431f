// 运行时执行引擎模块

mod executor;
pub mod handlers;
mod types;

pub use executor::FlowExecutor;
pub use types::FlowExecution;
