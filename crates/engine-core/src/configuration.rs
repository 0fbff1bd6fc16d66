use crate::{
    error::{MapperError, Result},
    loader::StatementDefinition,
    plugin::{Interceptor, InterceptorChain},
    settings::Settings,
    statement::{MappedStatement, SqlSource},
};
use binding::{ParameterBinder, TypeAliasRegistry, TypeHandlerRegistry};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};
use template::{ElementDescriptor, TemplateBuilder};
use tracing::{debug, info};

/// Everything statement preparation needs, assembled once and shared
/// read-only between threads.
pub struct Configuration {
    settings: Settings,
    type_handlers: Arc<TypeHandlerRegistry>,
    type_aliases: TypeAliasRegistry,
    statements: HashMap<String, Arc<MappedStatement>>,
    // Short id to full id; `None` when two namespaces share the short id.
    short_ids: HashMap<String, Option<String>>,
    interceptors: InterceptorChain,
    binder: ParameterBinder,
}

impl Configuration {
    pub fn builder(settings: Settings) -> ConfigurationBuilder {
        ConfigurationBuilder::new(settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn type_handlers(&self) -> &TypeHandlerRegistry {
        &self.type_handlers
    }

    pub fn type_aliases(&self) -> &TypeAliasRegistry {
        &self.type_aliases
    }

    pub fn interceptors(&self) -> &InterceptorChain {
        &self.interceptors
    }

    pub fn binder(&self) -> &ParameterBinder {
        &self.binder
    }

    /// Looks a statement up by full id, or by short id when that is unique.
    pub fn statement(&self, id: &str) -> Result<Arc<MappedStatement>> {
        if let Some(statement) = self.statements.get(id) {
            return Ok(statement.clone());
        }
        match self.short_ids.get(id) {
            Some(Some(full_id)) => self
                .statements
                .get(full_id)
                .cloned()
                .ok_or_else(|| MapperError::UnknownStatement(id.to_string())),
            Some(None) => Err(MapperError::AmbiguousStatement(id.to_string())),
            None => Err(MapperError::UnknownStatement(id.to_string())),
        }
    }

    pub fn has_statement(&self, id: &str) -> bool {
        self.statement(id).is_ok()
    }

    /// Fully qualified ids, sorted.
    pub fn statement_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.statements.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("settings", &self.settings)
            .field("statements", &self.statement_ids())
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

pub struct ConfigurationBuilder {
    settings: Settings,
    type_handlers: TypeHandlerRegistry,
    type_aliases: TypeAliasRegistry,
    templates: TemplateBuilder,
    statements: BTreeMap<String, MappedStatement>,
    interceptors: InterceptorChain,
}

impl ConfigurationBuilder {
    pub fn new(settings: Settings) -> Self {
        let templates = TemplateBuilder::new().with_variables(settings.variables.clone());
        Self {
            settings,
            type_handlers: TypeHandlerRegistry::with_defaults(),
            type_aliases: TypeAliasRegistry::new(),
            templates,
            statements: BTreeMap::new(),
            interceptors: InterceptorChain::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn type_handlers_mut(&mut self) -> &mut TypeHandlerRegistry {
        &mut self.type_handlers
    }

    pub fn type_aliases_mut(&mut self) -> &mut TypeAliasRegistry {
        &mut self.type_aliases
    }

    pub fn add_interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Registers a fragment under its fully qualified id.
    pub fn add_fragment(&mut self, id: &str, body: Vec<ElementDescriptor>) {
        self.templates.add_fragment(id, body);
    }

    pub(crate) fn templates(&self) -> &TemplateBuilder {
        &self.templates
    }

    /// Builds and registers one statement of `namespace` using `templates`
    /// to expand its body. Returns `false` when the statement targets
    /// another database and was skipped.
    pub(crate) fn add_statement(
        &mut self,
        namespace: &str,
        definition: &StatementDefinition,
        templates: &TemplateBuilder,
    ) -> Result<bool> {
        let id = format!("{namespace}.{}", definition.id);
        if !self.database_id_matches(&id, definition.database_id.as_deref()) {
            debug!("Skipping '{}' for database id {:?}", id, definition.database_id);
            return Ok(false);
        }
        let replaces_generic = self
            .statements
            .get(&id)
            .is_some_and(|existing| existing.database_id.is_none() && definition.database_id.is_some());
        if self.statements.contains_key(&id) && !replaces_generic {
            return Err(MapperError::DuplicateStatement(id));
        }

        let parameter_type = definition
            .parameter_type
            .as_deref()
            .map(|alias| self.type_aliases.resolve(alias))
            .transpose()
            .map_err(MapperError::binding(&id))?;
        let tree = templates.build(&definition.body).map_err(MapperError::template(&id))?;
        let source = SqlSource::new(
            &id,
            tree,
            parameter_type.as_ref(),
            &self.type_handlers,
            &self.type_aliases,
        )?;

        debug!(
            "Registered {} '{}' ({})",
            definition.kind,
            id,
            if source.is_dynamic() { "dynamic" } else { "static" }
        );
        self.statements.insert(
            id.clone(),
            MappedStatement {
                id,
                command: definition.kind,
                parameter_type,
                database_id: definition.database_id.clone(),
                source,
            },
        );
        Ok(true)
    }

    /// A statement with a database id is kept only for that database; one
    /// without is kept unless a vendor-specific version already exists.
    fn database_id_matches(&self, id: &str, database_id: Option<&str>) -> bool {
        match (self.settings.database_id.as_deref(), database_id) {
            (Some(required), Some(declared)) => required == declared,
            (None, Some(_)) => false,
            (_, None) => !self
                .statements
                .get(id)
                .is_some_and(|existing| existing.database_id.is_some()),
        }
    }

    pub fn build(self) -> Arc<Configuration> {
        let mut short_ids: HashMap<String, Option<String>> = HashMap::new();
        for statement in self.statements.values() {
            short_ids
                .entry(statement.short_id().to_string())
                .and_modify(|full| *full = None)
                .or_insert_with(|| Some(statement.id.clone()));
        }

        let type_handlers = Arc::new(self.type_handlers);
        let binder = ParameterBinder::new(type_handlers.clone(), self.settings.jdbc_type_for_null);
        info!(
            "Configuration ready: {} statements, {} interceptors",
            self.statements.len(),
            self.interceptors.len()
        );

        Arc::new(Configuration {
            settings: self.settings,
            type_handlers,
            type_aliases: self.type_aliases,
            statements: self
                .statements
                .into_iter()
                .map(|(id, statement)| (id, Arc::new(statement)))
                .collect(),
            short_ids,
            interceptors: self.interceptors,
            binder,
        })
    }
}
