//! Tool registry mapping tool names to callable handlers.

use super::message::ToolArguments;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A callable tool handler: arguments in, text out, may fail.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: &ToolArguments) -> Result<String>;
}

/// Adapter for plain synchronous functions.
struct FnTool<F>(F);

#[async_trait]
impl<F> ToolHandler for FnTool<F>
where
    F: Fn(&ToolArguments) -> Result<String> + Send + Sync,
{
    async fn call(&self, arguments: &ToolArguments) -> Result<String> {
        (self.0)(arguments)
    }
}

/// Mapping from tool name to handler.
///
/// Built once before resolution starts and not modified during it. A
/// tool name the model requests but the registry lacks is not an error
/// here; the resolver reports it back to the model as conversation text.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a tool name, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    /// Register a plain function as a handler.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&ToolArguments) -> Result<String> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnTool(f)));
    }

    /// Look up a handler by tool name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.get(name)
    }

    /// Whether a tool name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered tool names, in arbitrary order.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TolkError;

    #[tokio::test]
    async fn test_register_and_call_fn_handler() {
        let mut registry = ToolRegistry::new();
        registry.register_fn("echo", |args| {
            Ok(format!("echo: {}", serde_json::to_string(args)?))
        });

        assert!(registry.contains("echo"));
        assert!(!registry.contains("missing"));

        let mut args = ToolArguments::new();
        args.insert("name".into(), serde_json::json!("Brian"));

        let handler = registry.get("echo").unwrap();
        let result = handler.call(&args).await.unwrap();
        assert_eq!(result, r#"echo: {"name":"Brian"}"#);
    }

    #[tokio::test]
    async fn test_handler_failure_is_an_error() {
        let mut registry = ToolRegistry::new();
        registry.register_fn("broken", |_args| {
            Err(TolkError::InvalidInput("missing argument".into()))
        });

        let handler = registry.get("broken").unwrap();
        let err = handler.call(&ToolArguments::new()).await.unwrap_err();
        assert!(err.to_string().contains("missing argument"));
    }
}
