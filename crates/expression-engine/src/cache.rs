use crate::{error::Result, expression::Expression};
use lazy_static::lazy_static;
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, trace};

lazy_static! {
    static ref GLOBAL_CACHE: ExpressionCache = ExpressionCache::new();
}

/// Parsed expressions keyed by their source text.
///
/// Concurrent misses on the same text may parse twice; the first insert wins
/// and both callers get an equivalent expression.
#[derive(Default)]
pub struct ExpressionCache {
    entries: RwLock<HashMap<String, Arc<Expression>>>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static ExpressionCache {
        &GLOBAL_CACHE
    }

    pub fn get_or_parse(&self, source: &str) -> Result<Arc<Expression>> {
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
        {
            trace!("Expression cache hit: {}", source);
            return Ok(hit.clone());
        }

        let parsed = Arc::new(Expression::parse(source)?);
        debug!("Parsed expression: {}", source);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries
            .entry(source.to_string())
            .or_insert(parsed)
            .clone())
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
