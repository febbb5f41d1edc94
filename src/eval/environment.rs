use ::gc::{Finalize, Trace};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt::{Debug, Error as FmtError, Formatter};

use super::gc::GcShared;

/// A scope of bindings, chained to the scope enclosing it
pub struct Environment<V: Trace + 'static> {
    pub(super) parent: Option<GcShared<Environment<V>>>,
    pub(super) bindings: HashMap<String, V>,
}

impl<V: Trace> Default for Environment<V> {
    fn default() -> Environment<V> {
        Environment {
            parent: None,
            bindings: HashMap::new(),
        }
    }
}

#[derive(Debug)]
struct FmtEnvironment<'a, V: Trace + Debug + 'static> {
    parent: Option<&'a GcShared<Environment<V>>>,
    bindings: hash_map::Keys<'a, String, V>,
}

impl<V: Trace + Debug> Debug for Environment<V> {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), FmtError> {
        FmtEnvironment {
            parent: self.parent.as_ref(),
            bindings: self.bindings.keys(),
        }.fmt(fmt)
    }
}

impl<V: Trace> Finalize for Environment<V> {}
unsafe impl<V: Trace> Trace for Environment<V> {
    custom_trace!(this, {
        if let Some(ref env) = this.parent {
            mark(env);
        }
        for v in this.bindings.values() {
            mark(v);
        }
    });
}

impl<V: Trace + Clone> Environment<V> {
    /// An empty scope nested inside `parent`
    #[cfg(test)]
    pub fn child(parent: &GcShared<Environment<V>>) -> Environment<V> {
        Environment {
            parent: Some(parent.clone()),
            bindings: HashMap::new(),
        }
    }

    /// Rebinds the nearest existing binding of `name`. Returns false when
    /// no scope in the chain binds it.
    pub fn set(&mut self, name: &str, value: V) -> bool {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            return true;
        }

        let mut env = match self.parent {
            Some(ref parent) => parent.clone(),
            None => return false,
        };

        loop {
            env = {
                let mut envref = env.borrow_mut();

                if let Some(slot) = envref.bindings.get_mut(name) {
                    *slot = value;
                    return true;
                }

                match envref.parent {
                    Some(ref parent) => parent.clone(),
                    None => return false,
                }
            }
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding
    pub fn define(&mut self, name: String, value: V) {
        self.bindings.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<V> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }

        let mut environment = self.parent.clone()?;
        loop {
            environment = {
                let borrowed = environment.borrow();
                if let Some(value) = borrowed.bindings.get(name) {
                    return Some(value.clone());
                }
                borrowed.parent.clone()?
            }
        }
    }
}
