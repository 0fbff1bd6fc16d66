use crate::{
    error::{MapperError, Result},
    statement::MappedStatement,
};
use binding::BoundTemplate;
use model::core::value::Value;
use std::sync::Arc;
use tracing::trace;

/// Hook into statement preparation.
///
/// `on_render` sees each bound template before any value is bound and may
/// rewrite it, `on_bind` observes the final template and may veto the call.
/// Returning `Err` aborts the call with the given message.
pub trait Interceptor: Send + Sync {
    fn name(&self) -> &str;

    fn on_render(
        &self,
        _statement: &MappedStatement,
        bound: BoundTemplate,
        _argument: &Value,
    ) -> std::result::Result<BoundTemplate, String> {
        Ok(bound)
    }

    fn on_bind(
        &self,
        _statement: &MappedStatement,
        _bound: &BoundTemplate,
        _argument: &Value,
    ) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Interceptors in registration order.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.push(Arc::new(interceptor));
        self
    }

    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn apply_render(
        &self,
        statement: &MappedStatement,
        bound: BoundTemplate,
        argument: &Value,
    ) -> Result<BoundTemplate> {
        self.interceptors.iter().try_fold(bound, |bound, interceptor| {
            trace!("Interceptor '{}' on render of '{}'", interceptor.name(), statement.id);
            interceptor
                .on_render(statement, bound, argument)
                .map_err(|message| rejected(interceptor.as_ref(), statement, message))
        })
    }

    pub fn apply_bind(&self, statement: &MappedStatement, bound: &BoundTemplate, argument: &Value) -> Result<()> {
        for interceptor in &self.interceptors {
            trace!("Interceptor '{}' on bind of '{}'", interceptor.name(), statement.id);
            interceptor
                .on_bind(statement, bound, argument)
                .map_err(|message| rejected(interceptor.as_ref(), statement, message))?;
        }
        Ok(())
    }
}

fn rejected(interceptor: &dyn Interceptor, statement: &MappedStatement, message: String) -> MapperError {
    MapperError::Interceptor {
        interceptor: interceptor.name().to_string(),
        statement: statement.id.clone(),
        message,
    }
}
