use serde_json::Value;

/// Observer invoked with each port name and its JSON arguments.
///
/// Hooks run synchronously inside the operation they observe and cannot
/// fail it: the return type is `()`. Implementations must not block and
/// must not panic. A panic is not caught; it unwinds through the storage
/// operation that invoked the hook.
pub trait DiagnosticHook: Send + Sync {
    fn log(&self, port: &str, args: &[Value]);
}

impl<F> DiagnosticHook for F
where
    F: Fn(&str, &[Value]) + Send + Sync,
{
    fn log(&self, port: &str, args: &[Value]) {
        self(port, args)
    }
}

/// Hook that discards every call. The default.
pub struct NoOpHook;

impl DiagnosticHook for NoOpHook {
    fn log(&self, _port: &str, _args: &[Value]) {}
}

/// Hook that forwards every call to `tracing` at debug level.
pub struct TracingHook;

impl DiagnosticHook for TracingHook {
    fn log(&self, port: &str, args: &[Value]) {
        let args = Value::Array(args.to_vec());
        tracing::debug!(port, args = %args, "storage port");
    }
}
