//! Lexical scope stack
//!
//! [`Environment`] holds one [`FxHashMap`] per open scope. The bottom scope is
//! the program's top level; blocks and loops push and pop scopes around their
//! bodies. Lookups walk from the innermost scope outwards, declarations always
//! land in the innermost one.

use crate::interpreter::errors::RuntimeFault;
use crate::interpreter::value::Value;
use rustc_hash::FxHashMap;

/// A declared name
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub mutable: bool,
}

#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<FxHashMap<String, Binding>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Enter a new scope
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Exit the current scope. The top-level scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn declare(&mut self, name: &str, value: Value, mutable: bool) -> Result<(), RuntimeFault> {
        let Some(scope) = self.scopes.last_mut() else {
            return Err(RuntimeFault::UndefinedVariable {
                name: name.to_string(),
            });
        };

        if scope.contains_key(name) {
            return Err(RuntimeFault::Redeclaration {
                name: name.to_string(),
            });
        }

        scope.insert(name.to_string(), Binding { value, mutable });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Value, RuntimeFault> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map(|binding| &binding.value)
            .ok_or_else(|| RuntimeFault::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Overwrite the innermost binding of `name`
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeFault> {
        let binding = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .ok_or_else(|| RuntimeFault::UndefinedVariable {
                name: name.to_string(),
            })?;

        if !binding.mutable {
            return Err(RuntimeFault::ConstAssignment {
                name: name.to_string(),
            });
        }

        binding.value = value;
        Ok(())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut env = Environment::new();
        env.declare("a", Value::Number(1.0), true).unwrap();
        assert_eq!(env.get("a").unwrap(), &Value::Number(1.0));
        assert_eq!(
            env.get("b").unwrap_err(),
            RuntimeFault::UndefinedVariable {
                name: "b".to_string()
            }
        );
    }

    #[test]
    fn test_shadowing_and_scope_exit() {
        let mut env = Environment::new();
        env.declare("a", Value::Number(1.0), true).unwrap();
        env.push_scope();
        env.declare("a", Value::Str("inner".to_string()), true).unwrap();
        assert_eq!(env.get("a").unwrap(), &Value::Str("inner".to_string()));
        env.pop_scope();
        assert_eq!(env.get("a").unwrap(), &Value::Number(1.0));
    }

    #[test]
    fn test_assignment_reaches_outer_scope() {
        let mut env = Environment::new();
        env.declare("a", Value::Number(1.0), true).unwrap();
        env.push_scope();
        env.assign("a", Value::Number(2.0)).unwrap();
        env.pop_scope();
        assert_eq!(env.get("a").unwrap(), &Value::Number(2.0));
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let mut env = Environment::new();
        env.declare("a", Value::Null, true).unwrap();
        assert!(matches!(
            env.declare("a", Value::Null, false),
            Err(RuntimeFault::Redeclaration { .. })
        ));
    }

    #[test]
    fn test_constant_assignment() {
        let mut env = Environment::new();
        env.declare("c", Value::Number(1.0), false).unwrap();
        assert!(matches!(
            env.assign("c", Value::Number(2.0)),
            Err(RuntimeFault::ConstAssignment { .. })
        ));
        assert!(matches!(
            env.assign("missing", Value::Null),
            Err(RuntimeFault::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn test_top_level_scope_survives_pop() {
        let mut env = Environment::new();
        env.pop_scope();
        env.declare("a", Value::Null, true).unwrap();
        env.pop_scope();
        assert_eq!(env.get("a").unwrap(), &Value::Null);
    }
}
