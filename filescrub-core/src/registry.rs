// filescrub-core/src/registry.rs
//! The pattern registry: named, compiled, validated pattern definitions.
//!
//! A registry is built once, before any text is processed, and then shared by
//! reference. Every expression is compiled exactly once, at registration, and
//! every rejection (bad syntax, over-long expression, zero-length matches,
//! duplicate id) is reported there rather than during matching.
//!
//! Registration order is significant: [`PatternRegistry::resolve`] returns
//! definitions in that order and the matcher uses the position as tie-break
//! priority. Overwriting an id keeps its original position.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::{PatternConfig, PatternSpec};
use crate::engine::{CompiledPattern, PatternCompiler, PatternFlags};
use crate::engines::regex_engine::RegexCompiler;
use crate::errors::ScrubError;
use crate::validators::Validator;

/// A compiled, registered pattern.
#[derive(Debug)]
pub struct PatternDefinition {
    id: String,
    expression: String,
    description: String,
    flags: PatternFlags,
    preserve_suffix: Option<usize>,
    validator: Option<Validator>,
    builtin: bool,
    compiled: Box<dyn CompiledPattern>,
}

impl PatternDefinition {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The expression source as registered.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    pub fn preserve_suffix(&self) -> Option<usize> {
        self.preserve_suffix
    }

    pub fn validator(&self) -> Option<Validator> {
        self.validator
    }

    /// `true` for the detectors registered by [`PatternRegistry::with_builtins`].
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    pub fn compiled(&self) -> &dyn CompiledPattern {
        self.compiled.as_ref()
    }

    /// Whether a regex candidate passes this definition's validator.
    pub fn accepts(&self, candidate: &str) -> bool {
        self.validator.map_or(true, |v| v.accepts(candidate))
    }
}

/// How [`PatternRegistry::register_all`] treats a spec that fails to register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationMode {
    /// Stop at the first failure and return it.
    #[default]
    FailFast,
    /// Log the failure, remember it, and continue with the remaining specs.
    SkipInvalid,
}

/// Owns every pattern definition known to a run.
pub struct PatternRegistry {
    definitions: Vec<PatternDefinition>,
    index: HashMap<String, usize>,
    compiler: Arc<dyn PatternCompiler>,
}

impl fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRegistry")
            .field("compiler", &self.compiler.name())
            .field("ids", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRegistry {
    /// An empty registry backed by [`RegexCompiler`].
    pub fn new() -> Self {
        Self::with_compiler(Arc::new(RegexCompiler::new()))
    }

    /// An empty registry backed by a custom matching backend.
    pub fn with_compiler(compiler: Arc<dyn PatternCompiler>) -> Self {
        Self {
            definitions: Vec::new(),
            index: HashMap::new(),
            compiler,
        }
    }

    /// A registry with the built-in detectors (`credit_card`, `email`,
    /// `us_ssn`) already registered, in that priority order.
    pub fn with_builtins() -> anyhow::Result<Self> {
        let mut registry = Self::new();
        registry.register_builtins()?;
        Ok(registry)
    }

    /// Registers the built-in detectors into this registry.
    pub fn register_builtins(&mut self) -> anyhow::Result<()> {
        let builtins = PatternConfig::load_builtin()?;
        for spec in builtins.patterns {
            self.insert(spec, false, true)?;
        }
        Ok(())
    }

    /// Registers a plain expression under `id`.
    ///
    /// Fails with [`ScrubError::DuplicateId`] if `id` is taken and with
    /// [`ScrubError::InvalidPattern`] if the expression is rejected.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        expression: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), ScrubError> {
        self.register_spec(PatternSpec::new(id, expression, description), false)
    }

    /// Registers a full spec. With `overwrite` an existing definition with the
    /// same id is replaced in place.
    pub fn register_spec(&mut self, spec: PatternSpec, overwrite: bool) -> Result<(), ScrubError> {
        self.insert(spec, overwrite, false)
    }

    /// Registers many specs in order and returns the failures that were
    /// skipped. In [`RegistrationMode::FailFast`] the first failure is returned
    /// as an error instead, and later specs are not attempted.
    pub fn register_all<I>(
        &mut self,
        specs: I,
        mode: RegistrationMode,
        overwrite: bool,
    ) -> Result<Vec<ScrubError>, ScrubError>
    where
        I: IntoIterator<Item = PatternSpec>,
    {
        let mut skipped = Vec::new();
        for spec in specs {
            if let Err(e) = self.register_spec(spec, overwrite) {
                match mode {
                    RegistrationMode::FailFast => return Err(e),
                    RegistrationMode::SkipInvalid => {
                        warn!("Skipping pattern: {}", e);
                        skipped.push(e);
                    }
                }
            }
        }
        Ok(skipped)
    }

    fn insert(&mut self, spec: PatternSpec, overwrite: bool, builtin: bool) -> Result<(), ScrubError> {
        let id = spec.id.trim().to_string();
        if id.is_empty() {
            return Err(ScrubError::invalid(spec.id, "pattern id must not be empty"));
        }

        let existing = self.index.get(&id).copied();
        if existing.is_some() && !overwrite {
            return Err(ScrubError::DuplicateId(id));
        }

        let compiled = self
            .compiler
            .compile(&spec.expression, spec.flags)
            .map_err(|reason| ScrubError::invalid(id.as_str(), reason))?;

        let definition = PatternDefinition {
            id: id.clone(),
            expression: spec.expression,
            description: spec.description,
            flags: spec.flags,
            preserve_suffix: spec.preserve_suffix,
            validator: spec.validator,
            builtin,
            compiled,
        };

        match existing {
            Some(slot) => {
                debug!("Pattern '{}' replaced at priority {}.", id, slot);
                self.definitions[slot] = definition;
            }
            None => {
                debug!("Pattern '{}' registered at priority {}.", id, self.definitions.len());
                self.index.insert(id, self.definitions.len());
                self.definitions.push(definition);
            }
        }
        Ok(())
    }

    /// Returns the definitions for `active_ids` in registration order.
    ///
    /// Duplicate ids collapse. Fails with [`ScrubError::UnknownPattern`] naming
    /// the first id (in the order given) that is not registered.
    pub fn resolve<S: AsRef<str>>(&self, active_ids: &[S]) -> Result<Vec<&PatternDefinition>, ScrubError> {
        let mut slots = HashSet::with_capacity(active_ids.len());
        for id in active_ids {
            let id = id.as_ref();
            let slot = self
                .index
                .get(id)
                .ok_or_else(|| ScrubError::UnknownPattern(id.to_string()))?;
            slots.insert(*slot);
        }

        let mut slots: Vec<usize> = slots.into_iter().collect();
        slots.sort_unstable();
        Ok(slots.into_iter().map(|slot| &self.definitions[slot]).collect())
    }

    /// Every definition in registration order.
    pub fn resolve_all(&self) -> Vec<&PatternDefinition> {
        self.definitions.iter().collect()
    }

    pub fn get(&self, id: &str) -> Option<&PatternDefinition> {
        self.index.get(id).map(|slot| &self.definitions[*slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
