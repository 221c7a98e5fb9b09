use super::Dispatcher;

/// Thread configuration applied to every worker the dispatcher spawns.
#[derive(Debug, Clone)]
pub struct DispatcherBuilder {
    pub(crate) thread_name: String,
    pub(crate) stack_size: Option<usize>,
    pub(crate) pin_cores: bool,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            thread_name: "cycle-worker".to_string(),
            stack_size: None, // std default
            pin_cores: false,
        }
    }
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for worker thread names; slot `i` runs on `"{prefix}-{i}"`.
    pub fn with_thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Pin slot `i` to core `i % available_cores()`. Linux only; elsewhere
    /// the request is logged and ignored.
    pub fn with_core_pinning(mut self, enabled: bool) -> Self {
        self.pin_cores = enabled;
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher::with_config(self)
    }
}
