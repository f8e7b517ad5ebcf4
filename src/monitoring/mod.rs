/*!
 * Monitoring
 * Tracing subscriber setup and syscall spans
 */

mod tracer;

pub use tracer::{init_tracing, next_trace_id, SyscallSpan};
