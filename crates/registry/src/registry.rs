//! Capability-checked operation registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::OperationHandler;

/// Resolves object names to their registered handles.
///
/// The engine consumes this interface; [`StaticRegistry`] is the provided
/// implementation. `resolve` returning `None` is an internal inconsistency
/// (a route pointing at an object that was removed), distinct from an
/// unmapped transaction code.
pub trait OperationRegistry: Send + Sync {
    fn resolve(&self, object_name: &str) -> Option<Arc<ObjectHandle>>;
}

impl<R> OperationRegistry for Arc<R>
where
    R: OperationRegistry + ?Sized,
{
    fn resolve(&self, object_name: &str) -> Option<Arc<ObjectHandle>> {
        (**self).resolve(object_name)
    }
}

/// A named object and its explicitly invokable methods.
///
/// The method map is the allow-list: constructors and internal helpers are
/// simply never registered, so no grant string can reach them.
pub struct ObjectHandle {
    name: String,
    methods: HashMap<String, Arc<dyn OperationHandler>>,
}

impl ObjectHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, method_name: &str) -> Option<Arc<dyn OperationHandler>> {
        self.methods.get(method_name).cloned()
    }

    /// Sorted list of invokable method names (inspection/ops tooling).
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl core::fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("name", &self.name)
            .field("methods", &self.method_names())
            .finish()
    }
}

/// Immutable registry built once at composition time.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    objects: HashMap<String, Arc<ObjectHandle>>,
}

impl StaticRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Sorted list of registered object names.
    pub fn object_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.objects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl OperationRegistry for StaticRegistry {
    fn resolve(&self, object_name: &str) -> Option<Arc<ObjectHandle>> {
        self.objects.get(object_name).cloned()
    }
}

/// Builder assembling the allow-list before the registry goes immutable.
#[derive(Default)]
pub struct RegistryBuilder {
    objects: HashMap<String, HashMap<String, Arc<dyn OperationHandler>>>,
}

impl RegistryBuilder {
    /// Register one invokable method. Re-registering the same
    /// `(object, method)` pair replaces the previous handler.
    pub fn register(
        mut self,
        object_name: impl Into<String>,
        method_name: impl Into<String>,
        handler: Arc<dyn OperationHandler>,
    ) -> Self {
        self.objects
            .entry(object_name.into())
            .or_default()
            .insert(method_name.into(), handler);
        self
    }

    pub fn build(self) -> StaticRegistry {
        let objects = self
            .objects
            .into_iter()
            .map(|(name, methods)| {
                let handle = Arc::new(ObjectHandle {
                    name: name.clone(),
                    methods,
                });
                (name, handle)
            })
            .collect();
        StaticRegistry { objects }
    }
}
